//! Connection configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// How to reach and authenticate against the Grafana server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Base URL of the Grafana server
    pub url: String,

    /// Basic-auth user
    pub user: String,

    /// Basic-auth password
    pub password: String,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            user: "admin".to_string(),
            password: "admin".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ConnectionConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content).map_err(|e| {
                Error::InvalidConfig(format!("{}: {}", path.display(), e))
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject URLs the HTTP layer cannot use
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "{} is not a valid URL",
                self.url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".grafsync")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConnectionConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ConnectionConfig::default());
    }

    #[test]
    fn test_save_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ConnectionConfig {
            url: "https://grafana.example.com/".to_string(),
            user: "ops".to_string(),
            password: "secret".to_string(),
            timeout_secs: 5,
        };
        config.save(&path).unwrap();
        let loaded = ConnectionConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.base_url(), "https://grafana.example.com");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "url = \"http://grafana:3000\"\n").unwrap();
        let config = ConnectionConfig::load(&path).unwrap();
        assert_eq!(config.url, "http://grafana:3000");
        assert_eq!(config.user, "admin");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_unparsable_file_is_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "url = [unterminated\n").unwrap();
        match ConnectionConfig::load(&path) {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("config.toml")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_save_into_file_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let err = ConnectionConfig::default()
            .save(&blocker.join("config.toml"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_validate_url_scheme() {
        let mut config = ConnectionConfig::default();
        assert!(config.validate().is_ok());
        config.url = "grafana:3000".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
