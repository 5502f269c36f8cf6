use std::path::PathBuf;

use pmatch_core::db::{Repository, Session, SqlitePotentialMatchRepository};
use pmatch_core::sync::SyncSurface;
use pmatch_core::{HistoryEntry, PotentialMatch, SyncStatus};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::cli::{CompletionShell, ExportFormat};
use crate::commands::add::run_add;
use crate::commands::common::{
    format_history_lines, format_match_lines, format_timestamp_ms, match_to_list_item,
    normalize_identifier, Context,
};
use crate::commands::completions::run_completions;
use crate::commands::config::{set_db_path, set_user};
use crate::commands::confirm::run_set_confirmed;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::list::{list_matches, ListFilter};
use crate::commands::sync::{run_sync_mark, run_sync_mark_deleted};
use crate::config::CliConfig;
use crate::error::CliError;

fn test_context(user: &str) -> (TempDir, Context) {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = Context {
        db_path: tmp.path().join("pmatch.db"),
        user_name: user.to_string(),
    };
    (tmp, ctx)
}

fn open(ctx: &Context) -> SqlitePotentialMatchRepository {
    SqlitePotentialMatchRepository::new(Session::open(&ctx.db_path).unwrap(), &ctx.user_name)
}

fn seed(ctx: &Context, records: &[PotentialMatch]) {
    let mut repo = open(ctx);
    for record in records {
        repo.upsert(record).unwrap();
    }
    repo.close().unwrap();
}

#[test]
fn normalize_identifier_rejects_empty() {
    assert!(matches!(
        normalize_identifier("  ", "Match ID"),
        Err(CliError::EmptyIdentifier("Match ID"))
    ));
    assert_eq!(normalize_identifier(" p1 ", "Match ID").unwrap(), "p1");
}

#[test]
fn run_add_stores_pending_match_owned_by_user() {
    let (_tmp, ctx) = test_context("alice");

    let id = run_add("e1", "c1", None, Some("r0"), false, &ctx).unwrap();

    let repo = open(&ctx);
    let stored = repo.get(&id).unwrap().unwrap();
    assert_eq!(stored.enquiry_id, "e1");
    assert_eq!(stored.child_id, "c1");
    assert_eq!(stored.revision, "r0");
    assert!(!stored.confirmed);
    assert_eq!(repo.sync_status(&id).unwrap(), Some(SyncStatus::Pending));
    assert_eq!(repo.record_ids_by_owner().unwrap(), vec![id]);
}

#[test]
fn run_add_refuses_to_overwrite_existing_id() {
    let (_tmp, ctx) = test_context("alice");
    run_add("e1", "c1", Some("p1"), None, false, &ctx).unwrap();

    let error = run_add("e2", "c2", Some("p1"), None, true, &ctx).unwrap_err();
    assert!(matches!(error, CliError::MatchExists(id) if id == "p1"));

    let repo = open(&ctx);
    assert_eq!(repo.get("p1").unwrap().unwrap().enquiry_id, "e1");
}

#[test]
fn list_matches_filters_by_association() {
    let (_tmp, ctx) = test_context("alice");
    seed(
        &ctx,
        &[
            PotentialMatch::with_id("p1", "e1", "c1"),
            PotentialMatch::with_id("p2", "e1", "c2"),
            PotentialMatch::with_id("p3", "e2", "c1"),
        ],
    );

    let mut by_enquiry = list_matches(&ListFilter::Enquiry("e1".into()), &ctx)
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect::<Vec<_>>();
    by_enquiry.sort();
    assert_eq!(by_enquiry, vec!["p1", "p2"]);

    let mut by_child = list_matches(&ListFilter::Child("c1".into()), &ctx)
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect::<Vec<_>>();
    by_child.sort();
    assert_eq!(by_child, vec!["p1", "p3"]);

    assert!(list_matches(&ListFilter::Enquiry(String::new()), &ctx)
        .unwrap()
        .is_empty());
    assert_eq!(list_matches(&ListFilter::Recent(2), &ctx).unwrap().len(), 2);
}

#[test]
fn list_filter_prefers_enquiry_then_child() {
    assert_eq!(
        ListFilter::from_args(Some(" e1 ".into()), None, 5),
        ListFilter::Enquiry("e1".into())
    );
    assert_eq!(
        ListFilter::from_args(None, Some("c1".into()), 5),
        ListFilter::Child("c1".into())
    );
    assert_eq!(ListFilter::from_args(None, None, 5), ListFilter::Recent(5));
}

#[test]
fn run_set_confirmed_updates_flag_and_revision() {
    let (_tmp, ctx) = test_context("alice");
    seed(&ctx, &[PotentialMatch::with_id("p1", "e1", "c1").revision("r0")]);

    run_set_confirmed("p1", true, Some("r1"), &ctx).unwrap();

    let repo = open(&ctx);
    let stored = repo.get("p1").unwrap().unwrap();
    assert!(stored.confirmed);
    assert_eq!(stored.revision, "r1");
}

#[test]
fn run_set_confirmed_rejects_missing_match() {
    let (_tmp, ctx) = test_context("alice");
    let error = run_set_confirmed("ghost", true, None, &ctx).unwrap_err();
    assert!(matches!(error, CliError::MatchNotFound(id) if id == "ghost"));
}

#[test]
fn run_delete_removes_match_and_records_history() {
    let (_tmp, ctx) = test_context("alice");
    seed(
        &ctx,
        &[
            PotentialMatch::with_id("p1", "e1", "c1"),
            PotentialMatch::with_id("p2", "e1", "c1"),
        ],
    );

    run_delete("p1", &ctx).unwrap();

    let repo = open(&ctx);
    assert!(!repo.exists("p1").unwrap());
    assert!(repo.exists("p2").unwrap());
    let actions = repo
        .history("p1")
        .unwrap()
        .iter()
        .map(|entry| entry.action.to_string())
        .collect::<Vec<_>>();
    assert_eq!(actions, vec!["upsert", "delete"]);
}

#[test]
fn run_delete_missing_match_is_reported() {
    let (_tmp, ctx) = test_context("alice");
    let error = run_delete("ghost", &ctx).unwrap_err();
    assert!(matches!(error, CliError::MatchNotFound(_)));
}

#[test]
fn run_sync_mark_acknowledges_match() {
    let (_tmp, ctx) = test_context("alice");
    seed(&ctx, &[PotentialMatch::with_id("p1", "e1", "c1")]);

    run_sync_mark("p1", "r9", &ctx).unwrap();

    let repo = open(&ctx);
    assert!(repo.pending_sync().unwrap().is_empty());
    assert_eq!(repo.get("p1").unwrap().unwrap().revision, "r9");

    let error = run_sync_mark("ghost", "r1", &ctx).unwrap_err();
    assert!(matches!(error, CliError::MatchNotFound(_)));
}

#[test]
fn run_export_writes_json_file() {
    let (tmp, ctx) = test_context("alice");
    seed(
        &ctx,
        &[PotentialMatch::with_id("p1", "e1", "c1")
            .revision("r0")
            .confirmed(true)],
    );
    let output_path = tmp.path().join("export.json");

    run_export(ExportFormat::Json, Some(&output_path), &ctx).unwrap();

    let exported = std::fs::read_to_string(&output_path).unwrap();
    let parsed: Vec<PotentialMatch> = serde_json::from_str(&exported).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].id, "p1");
    assert!(parsed[0].confirmed);
}

#[test]
fn run_completions_writes_bash_script_file() {
    let tmp = tempfile::tempdir().unwrap();
    let output_path = tmp.path().join("pmatch.bash");

    run_completions(CompletionShell::Bash, Some(&output_path)).unwrap();

    let script = std::fs::read_to_string(&output_path).unwrap();
    assert!(script.contains("_pmatch()"));
    assert!(script.contains("complete -F _pmatch"));
}

#[test]
fn config_setters_persist_values() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");

    set_user(CliConfig::default(), " bob ", &path).unwrap();
    let loaded = CliConfig::load_from_path(&path).unwrap();
    assert_eq!(loaded.user_name.as_deref(), Some("bob"));

    set_db_path(loaded, PathBuf::from("/data/pmatch.db"), &path).unwrap();
    let loaded = CliConfig::load_from_path(&path).unwrap();
    assert_eq!(loaded.user_name.as_deref(), Some("bob"));
    assert_eq!(loaded.db_path, Some(PathBuf::from("/data/pmatch.db")));

    assert!(matches!(
        set_user(CliConfig::default(), "  ", &path),
        Err(CliError::Config(_))
    ));
}

#[test]
fn format_match_lines_include_key_fields() {
    let record = PotentialMatch::with_id("p1", "e1", "c1")
        .revision("r2")
        .confirmed(true);
    let lines = format_match_lines(&[record, PotentialMatch::with_id("p2", "e2", "c2")]);

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("p1"));
    assert!(lines[0].contains("enquiry=e1"));
    assert!(lines[0].contains("child=c1"));
    assert!(lines[0].contains("confirmed"));
    assert!(lines[0].ends_with("rev=r2"));
    assert!(lines[1].contains("candidate"));
    assert!(lines[1].ends_with("rev=-"));
}

#[test]
fn format_history_lines_include_actor() {
    let entry = HistoryEntry {
        id: 1,
        match_id: "p1".to_string(),
        action: pmatch_core::models::HistoryAction::Delete,
        revision: "r3".to_string(),
        changed_by: "alice".to_string(),
        changed_at: 1_704_067_200_000,
    };

    let lines = format_history_lines(&[entry]);
    assert_eq!(
        lines,
        vec!["2024-01-01 00:00:00 UTC  delete  by=alice  rev=r3".to_string()]
    );
}

#[test]
fn format_timestamp_ms_returns_utc_label() {
    assert_eq!(format_timestamp_ms(0), "1970-01-01 00:00:00 UTC");
}

#[test]
fn match_list_item_serializes_sync_status() {
    let record = PotentialMatch::with_id("p1", "e1", "c1");

    let with_status =
        serde_json::to_value(match_to_list_item(&record, Some(SyncStatus::Pending))).unwrap();
    assert_eq!(with_status["sync_status"], "pending");

    let without_status = serde_json::to_value(match_to_list_item(&record, None)).unwrap();
    assert!(without_status.get("sync_status").is_none());
}

#[test]
fn run_export_into_directory_uses_suggested_name() {
    let (tmp, ctx) = test_context("alice");
    seed(&ctx, &[PotentialMatch::with_id("p1", "e1", "c1")]);
    let out_dir = tmp.path().join("exports");
    std::fs::create_dir(&out_dir).unwrap();

    run_export(ExportFormat::Markdown, Some(&out_dir), &ctx).unwrap();

    let written = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("pmatch-export-"));
    assert!(written[0].ends_with(".md"));
}

#[test]
fn storage_failures_exit_with_distinct_code() {
    assert_eq!(CliError::Core(pmatch_core::Error::SessionClosed).exit_code(), 2);
    assert_eq!(CliError::MatchNotFound("p1".into()).exit_code(), 1);
}

#[test]
fn run_sync_mark_deleted_acknowledges_pending_delete() {
    let (_tmp, ctx) = test_context("alice");
    seed(&ctx, &[PotentialMatch::with_id("p1", "e1", "c1")]);
    run_delete("p1", &ctx).unwrap();

    {
        let repo = open(&ctx);
        let pending = repo.pending_deletes().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "p1");
    }

    run_sync_mark_deleted("p1", &ctx).unwrap();
    assert!(open(&ctx).pending_deletes().unwrap().is_empty());

    let error = run_sync_mark_deleted("p1", &ctx).unwrap_err();
    assert!(matches!(error, CliError::DeleteNotPending(id) if id == "p1"));
}
