//! Back-office configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or
//! no file at all) yields a working configuration:
//!
//! ```toml
//! [timeouts]
//! role_check_secs = 3
//!
//! [collections]
//! cards = "project_cards"
//! sponsors = "sponsor_logos"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use vitrine_session::SessionConfig;

/// Top-level configuration for the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Timeout tuning.
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Remote collection names.
    #[serde(default)]
    pub collections: CollectionsConfig,
}

/// Timeout tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Ceiling on the admin role lookup, in seconds. A lookup that
    /// exceeds it is treated as a denial.
    #[serde(default = "default_role_check_secs")]
    pub role_check_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            role_check_secs: default_role_check_secs(),
        }
    }
}

fn default_role_check_secs() -> u64 {
    3
}

/// Names of the remote collections the back-office manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionsConfig {
    /// Project card collection.
    #[serde(default = "default_cards")]
    pub cards: String,

    /// Sponsor logo collection.
    #[serde(default = "default_sponsors")]
    pub sponsors: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            cards: default_cards(),
            sponsors: default_sponsors(),
        }
    }
}

fn default_cards() -> String {
    "project_cards".to_string()
}

fn default_sponsors() -> String {
    "sponsor_logos".to_string()
}

impl AdminConfig {
    /// Parses a TOML document. Missing sections and fields take their
    /// defaults.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Serializes to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// The session-layer view of this configuration.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            role_check_timeout: Duration::from_secs(self.timeouts.role_check_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AdminConfig::from_toml("").expect("parse");
        assert_eq!(config.timeouts.role_check_secs, 3);
        assert_eq!(config.collections.cards, "project_cards");
        assert_eq!(config.collections.sponsors, "sponsor_logos");
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = AdminConfig::from_toml(
            r#"
            [timeouts]
            role_check_secs = 10
            "#,
        )
        .expect("parse");
        assert_eq!(config.timeouts.role_check_secs, 10);
        assert_eq!(config.collections.cards, "project_cards");
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = AdminConfig::default();
        config.collections.cards = "cards_v2".to_string();
        let text = config.to_toml().expect("serialize");
        let parsed = AdminConfig::from_toml(&text).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn session_config_carries_the_timeout() {
        let config = AdminConfig::from_toml("[timeouts]\nrole_check_secs = 7\n").expect("parse");
        assert_eq!(
            config.session_config().role_check_timeout,
            Duration::from_secs(7)
        );
    }
}
