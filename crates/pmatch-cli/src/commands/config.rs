use std::path::{Path, PathBuf};

use crate::cli::ConfigCommands;
use crate::config::{default_config_path, normalize_text_option, CliConfig};
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    config: &CliConfig,
    explicit_db_path: Option<PathBuf>,
    explicit_user: Option<String>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            print_effective_config(config, explicit_db_path, explicit_user);
            Ok(())
        }
        ConfigCommands::SetUser { name } => {
            let path = set_user(config.clone(), &name, &default_config_path())?;
            println!("Saved default user to {}", path.display());
            Ok(())
        }
        ConfigCommands::SetDbPath { path } => {
            let saved = set_db_path(config.clone(), path, &default_config_path())?;
            println!("Saved default database path to {}", saved.display());
            Ok(())
        }
    }
}

pub fn set_user(mut config: CliConfig, name: &str, path: &Path) -> Result<PathBuf, CliError> {
    let name = normalize_text_option(Some(name.to_string()))
        .ok_or_else(|| CliError::Config("user name must not be empty".to_string()))?;
    config.user_name = Some(name);
    config.save_to_path(path).map_err(CliError::Config)?;
    Ok(path.to_path_buf())
}

pub fn set_db_path(
    mut config: CliConfig,
    db_path: PathBuf,
    path: &Path,
) -> Result<PathBuf, CliError> {
    if db_path.as_os_str().is_empty() {
        return Err(CliError::Config(
            "database path must not be empty".to_string(),
        ));
    }
    config.db_path = Some(db_path);
    config.save_to_path(path).map_err(CliError::Config)?;
    Ok(path.to_path_buf())
}

fn print_effective_config(
    config: &CliConfig,
    explicit_db_path: Option<PathBuf>,
    explicit_user: Option<String>,
) {
    println!("config: {}", default_config_path().display());
    println!(
        "db_path: {}",
        config.resolve_db_path(explicit_db_path).display()
    );
    match config.resolve_user_name(explicit_user) {
        Ok(user) => println!("user: {user}"),
        Err(_) => println!("user: (not configured)"),
    }
}
