//! Configuration management for termgate

mod app;
mod screen;
pub mod serde_utils;

pub use app::{AppConfig, ServerConfig};
pub use screen::{Capability, LoginParams, ScreenSlot};

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termgate")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = load_config::<AppConfig>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
log_level = "debug"

[server]
port = 2022
tick_interval = 2

[[screens]]
id = "login"

[screens.login]
banner = "welcome"
selected = "basic"

[[screens.login.tabs]]
name = "basic"

[screens.login.tabs.basic_auth]
users = ["alice:hunter2"]
"#
        )
        .unwrap();

        let config: AppConfig = load_config(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.server.port, 2022);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.tick_interval.as_secs(), 2);
        assert_eq!(config.screens.len(), 1);

        let login = config.screens[0].login.as_ref().unwrap();
        assert_eq!(login.banner, "welcome");
        assert_eq!(login.tabs.names().collect::<Vec<_>>(), vec!["basic"]);
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server\nport = ").unwrap();
        let err = load_config::<AppConfig>(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
