use pmatch_core::db::Repository;

use crate::commands::common::{
    close_repository, normalize_identifier, open_repository, require_match, Context,
};
use crate::error::CliError;

pub fn run_delete(id: &str, ctx: &Context) -> Result<(), CliError> {
    let id = normalize_identifier(id, "Match ID")?;
    let repo = open_repository(ctx)?;
    let record = require_match(&repo, &id)?;

    repo.upsert(&record.mark_deleted())?;
    close_repository(repo)?;

    println!("{}", record.id);
    Ok(())
}
