use std::collections::BTreeMap;

use pmatch_core::db::Repository;
use pmatch_core::sync::{Acknowledgement, SyncSurface};

use crate::commands::common::{
    close_repository, format_history_lines, format_timestamp_ms, history_to_item,
    normalize_identifier, open_repository, print_matches, Context, HistoryItem,
};
use crate::error::CliError;

pub fn run_sync_pending(mine: bool, as_json: bool, ctx: &Context) -> Result<(), CliError> {
    let repo = open_repository(ctx)?;
    let pending = if mine {
        repo.unsynced_for_current_user()?
    } else {
        repo.pending_sync()?
    };
    close_repository(repo)?;

    print_matches(&pending, as_json)
}

pub fn run_sync_revisions(as_json: bool, ctx: &Context) -> Result<(), CliError> {
    let repo = open_repository(ctx)?;
    let revisions = repo
        .identities_and_revisions()?
        .into_iter()
        .collect::<BTreeMap<_, _>>();
    close_repository(repo)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&revisions)?);
    } else {
        for (id, revision) in &revisions {
            println!("{id}  {revision}");
        }
    }
    Ok(())
}

pub fn run_sync_mark(id: &str, revision: &str, ctx: &Context) -> Result<(), CliError> {
    let id = normalize_identifier(id, "Match ID")?;
    let revision = normalize_identifier(revision, "Revision")?;

    let repo = open_repository(ctx)?;
    let outcome = match repo.get(&id)? {
        Some(current) => repo.mark_synced(&current, &revision)?,
        None => Acknowledgement::Missing,
    };
    close_repository(repo)?;

    match outcome {
        Acknowledgement::Synced => {
            println!("{id} synced at {revision}");
            Ok(())
        }
        Acknowledgement::Changed => Err(CliError::ChangedSinceRead(id)),
        Acknowledgement::Missing => Err(CliError::MatchNotFound(id)),
    }
}

pub fn run_sync_deletes(as_json: bool, ctx: &Context) -> Result<(), CliError> {
    let repo = open_repository(ctx)?;
    let deletes = repo.pending_deletes()?;
    close_repository(repo)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&deletes)?);
    } else if deletes.is_empty() {
        println!("No pending deletes.");
    } else {
        for tombstone in &deletes {
            println!(
                "{}  {}  by={}  rev={}",
                format_timestamp_ms(tombstone.deleted_at),
                tombstone.id,
                tombstone.deleted_by,
                tombstone.revision
            );
        }
    }
    Ok(())
}

pub fn run_sync_mark_deleted(id: &str, ctx: &Context) -> Result<(), CliError> {
    let id = normalize_identifier(id, "Match ID")?;

    let repo = open_repository(ctx)?;
    let acknowledged = repo.mark_delete_synced(&id)?;
    close_repository(repo)?;

    if !acknowledged {
        return Err(CliError::DeleteNotPending(id));
    }
    println!("delete of {id} acknowledged");
    Ok(())
}

pub fn run_sync_mine(as_json: bool, ctx: &Context) -> Result<(), CliError> {
    let repo = open_repository(ctx)?;
    let created = repo.created_by_current_user()?;
    close_repository(repo)?;

    print_matches(&created, as_json)
}

pub fn run_sync_history(id: &str, as_json: bool, ctx: &Context) -> Result<(), CliError> {
    let id = normalize_identifier(id, "Match ID")?;
    let repo = open_repository(ctx)?;
    let history = repo.history(&id)?;
    close_repository(repo)?;

    if as_json {
        let json_items = history
            .iter()
            .map(history_to_item)
            .collect::<Vec<HistoryItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("No local changes recorded for {id}.");
        return Ok(());
    }

    for line in format_history_lines(&history) {
        println!("{line}");
    }
    Ok(())
}
