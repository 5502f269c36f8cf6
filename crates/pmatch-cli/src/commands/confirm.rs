use pmatch_core::db::Repository;

use crate::commands::common::{
    close_repository, normalize_identifier, open_repository, require_match, Context,
};
use crate::error::CliError;

pub fn run_set_confirmed(
    id: &str,
    confirmed: bool,
    revision: Option<&str>,
    ctx: &Context,
) -> Result<(), CliError> {
    let id = normalize_identifier(id, "Match ID")?;
    let repo = open_repository(ctx)?;

    let mut record = require_match(&repo, &id)?.confirmed(confirmed);
    if let Some(revision) = revision {
        record = record.revision(revision.trim());
    }
    repo.upsert(&record)?;
    close_repository(repo)?;

    println!(
        "{} {}",
        record.id,
        if confirmed { "confirmed" } else { "unconfirmed" }
    );
    Ok(())
}
