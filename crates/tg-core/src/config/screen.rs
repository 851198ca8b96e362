//! Screen slot configuration

use serde::Deserialize;

use crate::auth::Strategies;
use crate::error::ConfigError;

/// One entry of the ordered screen list
///
/// A slot names at most one capability. A slot naming none produces no screen.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenSlot {
    /// Identifier used in logs
    pub id: String,

    /// Login form parameters
    #[serde(default)]
    pub login: Option<LoginParams>,
}

/// What a slot turns into when a session builds its screen set
#[derive(Debug, Clone, Copy)]
pub enum Capability<'a> {
    /// A login form
    Login(&'a LoginParams),
}

impl ScreenSlot {
    /// The built-in login slot used when no config file is present
    pub fn default_login() -> Self {
        Self {
            id: "login".to_string(),
            login: Some(LoginParams::default()),
        }
    }

    /// The capability this slot declares, if any
    pub fn capability(&self) -> Option<Capability<'_>> {
        self.login.as_ref().map(Capability::Login)
    }

    pub(crate) fn prepare(&mut self) -> Result<(), ConfigError> {
        if let Some(login) = &mut self.login {
            login.tabs.prepare()?;
        }
        Ok(())
    }
}

/// Parameters of a login form
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoginParams {
    /// Text shown above the form
    pub banner: String,

    /// Strategies offered as tabs, in declaration order
    pub tabs: Strategies,

    /// Name of the strategy selected when the form first opens
    pub selected: String,
}

impl Default for LoginParams {
    fn default() -> Self {
        Self {
            banner: "termgate".to_string(),
            tabs: Strategies::default(),
            selected: String::new(),
        }
    }
}

impl LoginParams {
    /// Initial strategy selection: the configured name, else the first tab
    pub fn default_selection(&self) -> &str {
        if !self.selected.is_empty() {
            return &self.selected;
        }
        self.tabs.names().next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_without_capability() {
        let slot: ScreenSlot = toml::from_str("id = \"empty\"").unwrap();
        assert!(slot.capability().is_none());
    }

    #[test]
    fn test_default_selection_falls_back_to_first_tab() {
        let params: LoginParams = toml::from_str(
            r#"
[[tabs]]
name = "first"
[[tabs]]
name = "second"
"#,
        )
        .unwrap();
        assert_eq!(params.default_selection(), "first");
    }

    #[test]
    fn test_default_selection_uses_configured_name() {
        let params: LoginParams = toml::from_str(
            r#"
selected = "second"
[[tabs]]
name = "first"
[[tabs]]
name = "second"
"#,
        )
        .unwrap();
        assert_eq!(params.default_selection(), "second");
    }

    #[test]
    fn test_default_selection_without_tabs() {
        assert_eq!(LoginParams::default().default_selection(), "");
    }
}
