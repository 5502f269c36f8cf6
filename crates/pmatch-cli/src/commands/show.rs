use crate::commands::common::{
    close_repository, format_match_lines, match_to_list_item, normalize_identifier,
    open_repository, require_match, Context,
};
use crate::error::CliError;

pub fn run_show(id: &str, as_json: bool, ctx: &Context) -> Result<(), CliError> {
    let id = normalize_identifier(id, "Match ID")?;
    let repo = open_repository(ctx)?;
    let record = require_match(&repo, &id)?;
    let status = repo.sync_status(&id)?;
    close_repository(repo)?;

    if as_json {
        let item = match_to_list_item(&record, status);
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        for line in format_match_lines(std::slice::from_ref(&record)) {
            println!("{line}");
        }
        println!("created_at: {}", record.created_at);
        if let Some(status) = status {
            println!("sync: {}", status.as_str());
        }
    }

    Ok(())
}
