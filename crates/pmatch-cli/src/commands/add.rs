use pmatch_core::db::Repository;
use pmatch_core::PotentialMatch;

use crate::commands::common::{close_repository, normalize_identifier, open_repository, Context};
use crate::error::CliError;

pub fn run_add(
    enquiry: &str,
    child: &str,
    id: Option<&str>,
    revision: Option<&str>,
    confirmed: bool,
    ctx: &Context,
) -> Result<String, CliError> {
    let enquiry_id = normalize_identifier(enquiry, "Enquiry ID")?;
    let child_id = normalize_identifier(child, "Child ID")?;

    let mut record = match id {
        Some(id) => {
            PotentialMatch::with_id(normalize_identifier(id, "Match ID")?, enquiry_id, child_id)
        }
        None => PotentialMatch::new(enquiry_id, child_id),
    }
    .confirmed(confirmed);
    if let Some(revision) = revision {
        record = record.revision(revision.trim());
    }

    let repo = open_repository(ctx)?;
    if repo.exists(&record.id)? {
        return Err(CliError::MatchExists(record.id));
    }
    repo.upsert(&record)?;
    close_repository(repo)?;

    println!("{}", record.id);
    Ok(record.id)
}
