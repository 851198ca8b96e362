//! Core error types for termgate

use std::path::PathBuf;
use tg_protocol::ProtocolError;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Credential entry that is not exactly `identity:secret`
    ///
    /// Only the position is reported so the secret never reaches a log line.
    #[error("Malformed credential entry #{index}: expected \"identity:secret\"")]
    MalformedEntry { index: usize },

    /// Credential entry naming an identity already listed earlier
    #[error("Duplicate credential entry #{index}: identity already listed")]
    DuplicateEntry { index: usize },

    /// A strategy declaration failed to prepare
    #[error("Strategy '{name}': {source}")]
    Strategy {
        name: String,
        #[source]
        source: Box<ConfigError>,
    },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Login attempt failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Validator used before its credential set was prepared
    #[error("Login failed: basic auth not prepared")]
    NotPrepared,

    /// Unknown identity or wrong secret
    #[error("Login failed: invalid username or password")]
    InvalidCredentials,

    /// Selected strategy is not declared or has no backend
    #[error("No authentication method selected")]
    NoSelection,
}

/// Session-related errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// The remote end is gone
    #[error("Transport closed")]
    TransportClosed,

    /// Navigation ran past the last screen
    #[error("No further screens")]
    Exhausted,

    /// Output could not be encoded
    #[error("Encoding failed: {0}")]
    Encode(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_entry_hides_secret() {
        let err = ConfigError::MalformedEntry { index: 2 };
        assert_eq!(
            err.to_string(),
            "Malformed credential entry #2: expected \"identity:secret\""
        );
    }

    #[test]
    fn test_duplicate_entry_hides_identity() {
        let err = ConfigError::DuplicateEntry { index: 3 };
        assert_eq!(
            err.to_string(),
            "Duplicate credential entry #3: identity already listed"
        );
    }

    #[test]
    fn test_strategy_error_wraps_source() {
        let err = ConfigError::Strategy {
            name: "basic".to_string(),
            source: Box::new(ConfigError::MalformedEntry { index: 0 }),
        };
        assert!(err.to_string().starts_with("Strategy 'basic': Malformed"));
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Login failed: invalid username or password"
        );
        assert_eq!(
            AuthError::NoSelection.to_string(),
            "No authentication method selected"
        );
    }
}
