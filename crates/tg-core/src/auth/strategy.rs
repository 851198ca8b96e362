//! Named credential strategies offered by a login form

use serde::Deserialize;
use std::collections::HashSet;

use super::BasicAuth;
use crate::error::{AuthError, ConfigError};

/// A named strategy and its backend
#[derive(Debug, Clone, Deserialize)]
pub struct Strategy {
    /// Tab label, also the selection key
    pub name: String,

    /// Username/password backend
    #[serde(default)]
    pub basic_auth: Option<BasicAuth>,
}

impl Strategy {
    /// Prepare the backend, if any
    pub fn prepare(&mut self) -> Result<(), ConfigError> {
        if let Some(basic) = &mut self.basic_auth {
            basic.prepare().map_err(|source| ConfigError::Strategy {
                name: self.name.clone(),
                source: Box::new(source),
            })?;
        }
        Ok(())
    }

    /// Validate a login against this strategy's backend
    pub fn login(&self, identity: &str, secret: &str) -> Result<(), AuthError> {
        match &self.basic_auth {
            Some(basic) => basic.validate(identity, secret),
            None => Err(AuthError::NoSelection),
        }
    }
}

/// Ordered list of strategies
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Strategies(Vec<Strategy>);

impl From<Vec<Strategy>> for Strategies {
    fn from(strategies: Vec<Strategy>) -> Self {
        Self(strategies)
    }
}

impl Strategies {
    /// Number of declared strategies
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no strategy is declared
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Strategy names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.name.as_str())
    }

    /// Find a strategy by name
    pub fn find(&self, name: &str) -> Option<&Strategy> {
        self.0.iter().find(|s| s.name == name)
    }

    /// Prepare every backend; names must be unique
    pub fn prepare(&mut self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for strategy in &mut self.0 {
            if !seen.insert(strategy.name.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate strategy name '{}'",
                    strategy.name
                )));
            }
            strategy.prepare()?;
        }
        Ok(())
    }

    /// Resolve `selected` by name and validate against it
    pub fn login(&self, selected: &str, identity: &str, secret: &str) -> Result<(), AuthError> {
        self.find(selected)
            .ok_or(AuthError::NoSelection)?
            .login(identity, secret)
    }

    /// The name one step from `current`, wrapping at both ends
    ///
    /// With fewer than two strategies the selection does not change. An
    /// unknown `current` is treated as the first strategy.
    pub fn cycle<'a>(&'a self, current: &'a str, forward: bool) -> &'a str {
        let len = self.0.len();
        if len < 2 {
            return current;
        }

        let index = self.0.iter().position(|s| s.name == current).unwrap_or(0);
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        &self.0[next].name
    }
}
