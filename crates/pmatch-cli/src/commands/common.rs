use std::path::PathBuf;

use pmatch_core::db::{Repository, Session, SqlitePotentialMatchRepository};
use pmatch_core::{HistoryEntry, PotentialMatch, SyncStatus};
use serde::Serialize;

use crate::error::CliError;

/// Database location and acting user shared by every storage command
#[derive(Debug, Clone)]
pub struct Context {
    pub db_path: PathBuf,
    pub user_name: String,
}

#[derive(Debug, Serialize)]
pub struct MatchListItem {
    pub id: String,
    pub enquiry_id: String,
    pub child_id: String,
    pub created_at: String,
    pub revision: String,
    pub confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_status: Option<SyncStatus>,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub action: String,
    pub revision: String,
    pub changed_by: String,
    pub changed_at: i64,
    pub changed_at_iso: String,
}

pub fn open_repository(ctx: &Context) -> Result<SqlitePotentialMatchRepository, CliError> {
    let session = Session::open(&ctx.db_path)?;
    Ok(SqlitePotentialMatchRepository::new(
        session,
        ctx.user_name.clone(),
    ))
}

/// Release the repository, reporting a failed release instead of dropping it silently
pub fn close_repository(mut repo: SqlitePotentialMatchRepository) -> Result<(), CliError> {
    repo.close()?;
    Ok(())
}

pub fn require_match(
    repo: &SqlitePotentialMatchRepository,
    id: &str,
) -> Result<PotentialMatch, CliError> {
    repo.get(id)?
        .ok_or_else(|| CliError::MatchNotFound(id.to_string()))
}

pub fn list_all_matches(
    repo: &SqlitePotentialMatchRepository,
) -> Result<Vec<PotentialMatch>, CliError> {
    const PAGE_SIZE: usize = 500;

    let mut matches = Vec::new();
    let mut offset = 0usize;

    loop {
        let batch = repo.list(PAGE_SIZE, offset)?;
        let count = batch.len();
        matches.extend(batch);

        if count < PAGE_SIZE {
            break;
        }
        offset += count;
    }

    Ok(matches)
}

pub fn normalize_identifier(value: &str, field: &'static str) -> Result<String, CliError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyIdentifier(field))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn match_to_list_item(record: &PotentialMatch, sync_status: Option<SyncStatus>) -> MatchListItem {
    MatchListItem {
        id: record.id.clone(),
        enquiry_id: record.enquiry_id.clone(),
        child_id: record.child_id.clone(),
        created_at: record.created_at.clone(),
        revision: record.revision.clone(),
        confirmed: record.confirmed,
        sync_status,
    }
}

pub fn history_to_item(entry: &HistoryEntry) -> HistoryItem {
    HistoryItem {
        action: entry.action.to_string(),
        revision: entry.revision.clone(),
        changed_by: entry.changed_by.clone(),
        changed_at: entry.changed_at,
        changed_at_iso: format_timestamp_ms(entry.changed_at),
    }
}

pub fn format_match_lines(matches: &[PotentialMatch]) -> Vec<String> {
    matches
        .iter()
        .map(|record| {
            let short_id = record.id.chars().take(13).collect::<String>();
            let state = if record.confirmed {
                "confirmed"
            } else {
                "candidate"
            };
            let revision = if record.revision.is_empty() {
                "-"
            } else {
                record.revision.as_str()
            };
            format!(
                "{short_id:<13}  enquiry={:<13}  child={:<13}  {state:<9}  rev={revision}",
                record.enquiry_id, record.child_id
            )
        })
        .collect()
}

pub fn format_history_lines(entries: &[HistoryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}  {:<6}  by={}  rev={}",
                format_timestamp_ms(entry.changed_at),
                entry.action,
                entry.changed_by,
                entry.revision
            )
        })
        .collect()
}

pub fn format_timestamp_ms(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn print_matches(matches: &[PotentialMatch], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let json_items = matches
            .iter()
            .map(|record| match_to_list_item(record, None))
            .collect::<Vec<MatchListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if matches.is_empty() {
        println!("No potential matches.");
    } else {
        for line in format_match_lines(matches) {
            println!("{line}");
        }
    }

    Ok(())
}
