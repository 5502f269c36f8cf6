//! pmatch CLI - Command-line interface for the potential match store
//!
//! Records, inspects and acknowledges child/enquiry potential matches in a
//! local database.

mod cli;
mod commands;
mod config;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, SyncCommands};
use crate::commands::add::run_add;
use crate::commands::common::Context;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::confirm::run_set_confirmed;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::list::{run_list, ListFilter};
use crate::commands::show::run_show;
use crate::commands::sync::{
    run_sync_deletes, run_sync_history, run_sync_mark, run_sync_mark_deleted, run_sync_mine,
    run_sync_pending, run_sync_revisions,
};
use crate::config::CliConfig;
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(error.exit_code());
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pmatch=info,pmatch_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load().map_err(CliError::Config)?;
    let context = || -> Result<Context, CliError> {
        let ctx = Context {
            db_path: config.resolve_db_path(cli.db_path.clone()),
            user_name: config.resolve_user_name(cli.user.clone())?,
        };
        tracing::debug!("Using database {}", ctx.db_path.display());
        Ok(ctx)
    };

    match cli.command {
        Commands::Add {
            enquiry,
            child,
            id,
            revision,
            confirmed,
        } => {
            run_add(
                &enquiry,
                &child,
                id.as_deref(),
                revision.as_deref(),
                confirmed,
                &context()?,
            )?;
        }
        Commands::Show { id, json } => run_show(&id, json, &context()?)?,
        Commands::List {
            enquiry,
            child,
            limit,
            json,
        } => run_list(
            &ListFilter::from_args(enquiry, child, limit),
            json,
            &context()?,
        )?,
        Commands::Confirm { id, revision } => {
            run_set_confirmed(&id, true, revision.as_deref(), &context()?)?;
        }
        Commands::Unconfirm { id, revision } => {
            run_set_confirmed(&id, false, revision.as_deref(), &context()?)?;
        }
        Commands::Delete { id } => run_delete(&id, &context()?)?,
        Commands::Sync { command } => match command {
            SyncCommands::Pending { mine, json } => run_sync_pending(mine, json, &context()?)?,
            SyncCommands::Revisions { json } => run_sync_revisions(json, &context()?)?,
            SyncCommands::Mark { id, revision } => run_sync_mark(&id, &revision, &context()?)?,
            SyncCommands::Deletes { json } => run_sync_deletes(json, &context()?)?,
            SyncCommands::MarkDeleted { id } => run_sync_mark_deleted(&id, &context()?)?,
            SyncCommands::Mine { json } => run_sync_mine(json, &context()?)?,
            SyncCommands::History { id, json } => run_sync_history(&id, json, &context()?)?,
        },
        Commands::Export { format, output } => {
            run_export(format, output.as_deref(), &context()?)?;
        }
        Commands::Config { command } => {
            run_config(command, &config, cli.db_path.clone(), cli.user.clone())?;
        }
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}
