//! Runtime configuration shared by every schema built from it.
//!
//! Configuration is plain data: it can be constructed in code or loaded
//! from a TOML document such as
//!
//! ```toml
//! missing_save_strategy = "succeed"
//!
//! [zone]
//! fixed = -300
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use time::UtcOffset;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("zone offset out of range: {minutes} minutes")]
    OffsetOutOfRange { minutes: i32 },
}

///
/// CoreConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// Zone every date-time is normalized to before it is formatted.
    pub zone: ZonePolicy,

    /// What `save` does when neither a record strategy nor a schema
    /// persist hook is registered.
    pub missing_save_strategy: MissingStrategyPolicy,
}

impl CoreConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.zone.offset()?;

        Ok(config)
    }

    #[must_use]
    pub const fn with_zone(mut self, zone: ZonePolicy) -> Self {
        self.zone = zone;
        self
    }

    #[must_use]
    pub const fn with_missing_save_strategy(mut self, policy: MissingStrategyPolicy) -> Self {
        self.missing_save_strategy = policy;
        self
    }
}

///
/// ZonePolicy
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZonePolicy {
    #[default]
    Utc,

    /// Fixed offset from UTC in minutes (east positive).
    Fixed(i32),
}

impl ZonePolicy {
    /// Resolve the policy into a concrete offset.
    pub fn offset(self) -> Result<UtcOffset, ConfigError> {
        match self {
            Self::Utc => Ok(UtcOffset::UTC),
            Self::Fixed(minutes) => minutes
                .checked_mul(60)
                .and_then(|seconds| UtcOffset::from_whole_seconds(seconds).ok())
                .ok_or(ConfigError::OffsetOutOfRange { minutes }),
        }
    }
}

///
/// MissingStrategyPolicy
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategyPolicy {
    /// Fail with `PersistError::NoStrategy`.
    #[default]
    Error,

    /// Treat the save as trivially successful.
    Succeed,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.zone, ZonePolicy::Utc);
        assert_eq!(config.missing_save_strategy, MissingStrategyPolicy::Error);
    }

    #[test]
    fn fixed_zone_and_policy_parse() {
        let config = CoreConfig::from_toml_str(
            "missing_save_strategy = \"succeed\"\n\n[zone]\nfixed = -300\n",
        )
        .unwrap();

        assert_eq!(config.zone, ZonePolicy::Fixed(-300));
        assert_eq!(config.missing_save_strategy, MissingStrategyPolicy::Succeed);
        assert_eq!(config.zone.offset().unwrap().whole_minutes(), -300);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CoreConfig::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let err = CoreConfig::from_toml_str("[zone]\nfixed = 100000\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OffsetOutOfRange { minutes: 100_000 }
        ));
    }
}
