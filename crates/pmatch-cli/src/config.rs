//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";
const DB_FILE_NAME: &str = "pmatch.db";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("PMATCH_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pmatch")
        .join(CONFIG_FILE_NAME)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pmatch")
        .join(DB_FILE_NAME)
}

pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    pmatch_core::util::normalize_text_option(value)
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Acting user: explicit flag, then `PMATCH_USER`, then config, then the OS login name
    pub fn resolve_user_name(&self, explicit: Option<String>) -> Result<String, CliError> {
        normalize_text_option(explicit)
            .or_else(|| normalize_text_option(std::env::var("PMATCH_USER").ok()))
            .or_else(|| normalize_text_option(self.user_name.clone()))
            .or_else(|| normalize_text_option(std::env::var("USER").ok()))
            .or_else(|| normalize_text_option(std::env::var("USERNAME").ok()))
            .ok_or(CliError::UserNotConfigured)
    }

    /// Database path: explicit flag, then `PMATCH_DB_PATH`, then config, then the data directory
    pub fn resolve_db_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os("PMATCH_DB_PATH").map(PathBuf::from))
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(default_db_path)
    }

    fn normalize(&mut self) {
        self.user_name = normalize_text_option(self.user_name.clone());
        self.db_path = self
            .db_path
            .take()
            .filter(|path| !path.as_os_str().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_roundtrip_normalizes_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join(CONFIG_FILE_NAME);

        let config = CliConfig {
            version: 1,
            user_name: Some("  caseworker  ".to_string()),
            db_path: Some(PathBuf::new()),
        };

        config.save_to_path(&path).unwrap();
        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.user_name.as_deref(), Some("caseworker"));
        assert_eq!(loaded.db_path, None);
    }

    #[test]
    fn load_missing_file_returns_default() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded = CliConfig::load_from_path(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(loaded, CliConfig::default());
    }

    #[test]
    fn load_rejects_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let error = CliConfig::load_from_path(&path).unwrap_err();
        assert!(error.contains("Failed to parse config"));
    }

    #[test]
    fn resolve_user_name_prefers_explicit() {
        let config = CliConfig {
            user_name: Some("configured".to_string()),
            ..CliConfig::default()
        };
        assert_eq!(
            config
                .resolve_user_name(Some(" explicit ".to_string()))
                .unwrap(),
            "explicit"
        );
    }

    #[test]
    fn resolve_db_path_prefers_explicit() {
        let config = CliConfig {
            db_path: Some(PathBuf::from("/configured/pmatch.db")),
            ..CliConfig::default()
        };
        assert_eq!(
            config.resolve_db_path(Some(PathBuf::from("/explicit/pmatch.db"))),
            PathBuf::from("/explicit/pmatch.db")
        );
    }
}
