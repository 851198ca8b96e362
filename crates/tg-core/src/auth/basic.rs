//! Username/password credential validation
//!
//! Credentials are declared as `"identity:secret"` strings. [`BasicAuth::prepare`]
//! parses them once into a map of identity to SHA-256 digest; after that the
//! set is immutable and shared between sessions behind an `Arc`.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{AuthError, ConfigError};

/// Realm used when none is configured
pub const DEFAULT_REALM: &str = "termgate";

type SecretDigest = [u8; 32];

/// Basic username/password backend
#[derive(Clone, Default, Deserialize)]
pub struct BasicAuth {
    /// Raw `"identity:secret"` entries
    #[serde(default)]
    pub users: Vec<String>,

    /// Realm name
    #[serde(default)]
    pub realm: String,

    #[serde(skip)]
    credentials: Option<Arc<CredentialSet>>,
}

struct CredentialSet {
    realm: String,
    secrets: HashMap<String, SecretDigest>,
}

impl BasicAuth {
    /// Create an unprepared backend from raw entries
    pub fn new(users: Vec<String>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    /// Parse `users` into the credential set
    ///
    /// Every entry must split on `:` into exactly two parts, and each identity
    /// may be listed once. Calling this again replaces the previous set.
    pub fn prepare(&mut self) -> Result<(), ConfigError> {
        let mut secrets = HashMap::with_capacity(self.users.len());

        for (index, entry) in self.users.iter().enumerate() {
            let mut parts = entry.split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(identity), Some(secret), None) => {
                    if secrets.insert(identity.to_string(), digest(secret)).is_some() {
                        return Err(ConfigError::DuplicateEntry { index });
                    }
                }
                _ => return Err(ConfigError::MalformedEntry { index }),
            }
        }

        let realm = if self.realm.is_empty() {
            DEFAULT_REALM.to_string()
        } else {
            self.realm.clone()
        };

        self.credentials = Some(Arc::new(CredentialSet { realm, secrets }));
        Ok(())
    }

    /// Whether [`prepare`](Self::prepare) has run
    pub fn is_prepared(&self) -> bool {
        self.credentials.is_some()
    }

    /// Effective realm, available once prepared
    pub fn realm(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.realm.as_str())
    }

    /// Check an identity/secret pair against the prepared set
    pub fn validate(&self, identity: &str, secret: &str) -> Result<(), AuthError> {
        let credentials = self.credentials.as_ref().ok_or(AuthError::NotPrepared)?;

        let provided = digest(secret);
        // Unknown identities still pay for a full comparison
        let (expected, known) = match credentials.secrets.get(identity) {
            Some(expected) => (*expected, true),
            None => (digest(""), false),
        };

        if digests_equal(&provided, &expected) && known {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("users", &self.users.len())
            .field("realm", &self.realm)
            .field("prepared", &self.is_prepared())
            .finish()
    }
}

fn digest(secret: &str) -> SecretDigest {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(secret.as_bytes()));
    out
}

fn digests_equal(a: &SecretDigest, b: &SecretDigest) -> bool {
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
