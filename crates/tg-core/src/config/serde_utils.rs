//! Shared deserialization utilities for configuration

/// Durations read from a plain integer number of seconds
///
/// Reads naturally in TOML: `tick_interval = 1`.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Config {
///     #[serde(deserialize_with = "tg_core::config::serde_utils::duration_secs::deserialize")]
///     tick_interval: Duration,
/// }
/// ```
pub mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    /// Deserialize a Duration from seconds (u64)
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
