use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pmatch")]
#[command(about = "Manage child/enquiry potential matches from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Acting user recorded as the owner of new matches
    #[arg(long, global = true, value_name = "NAME")]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new potential match
    #[command(alias = "new")]
    Add {
        /// Local identity of the enquiry
        #[arg(long, value_name = "ID")]
        enquiry: String,
        /// Local identity of the child
        #[arg(long, value_name = "ID")]
        child: String,
        /// Explicit match ID (generated when omitted)
        #[arg(long, value_name = "ID")]
        id: Option<String>,
        /// Initial revision token
        #[arg(long, value_name = "REV")]
        revision: Option<String>,
        /// Store the match as already confirmed
        #[arg(long)]
        confirmed: bool,
    },
    /// Show a single potential match
    Show {
        /// Match ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List potential matches
    List {
        /// Only matches for this enquiry
        #[arg(long, value_name = "ID", conflicts_with = "child")]
        enquiry: Option<String>,
        /// Only matches for this child
        #[arg(long, value_name = "ID")]
        child: Option<String>,
        /// Number of matches to show when not filtering
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a potential match as confirmed
    Confirm {
        /// Match ID
        id: String,
        /// New revision token
        #[arg(long, value_name = "REV")]
        revision: Option<String>,
    },
    /// Clear the confirmation flag of a potential match
    Unconfirm {
        /// Match ID
        id: String,
        /// New revision token
        #[arg(long, value_name = "REV")]
        revision: Option<String>,
    },
    /// Delete a potential match
    Delete {
        /// Match ID
        id: String,
    },
    /// Inspect and acknowledge sync bookkeeping
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Export all potential matches
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure persistent CLI defaults
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// List matches not yet acknowledged by the server
    Pending {
        /// Only matches created by the acting user
        #[arg(long)]
        mine: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the id -> revision map of every stored match
    Revisions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Acknowledge a match with the revision assigned by the server
    Mark {
        /// Match ID
        id: String,
        /// Server revision
        #[arg(long, value_name = "REV")]
        revision: String,
    },
    /// List local deletes not yet acknowledged by the server
    Deletes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Acknowledge a local delete
    MarkDeleted {
        /// Match ID
        id: String,
    },
    /// List matches created by the acting user
    Mine {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the local change history of a match
    History {
        /// Match ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Persist the default acting user
    SetUser {
        /// User name
        name: String,
    },
    /// Persist the default database path
    SetDbPath {
        /// Database file path
        path: PathBuf,
    },
}
