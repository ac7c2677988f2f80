use crate::error::{CoreError, Result};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::player::{PlayMode, DEFAULT_VOLUME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Player configuration.
///
/// Every field has a default, so an empty document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Volume a fresh player starts with, in `[0, 1]`
    #[serde(default = "default_volume")]
    pub default_volume: f32,
    /// Number of entries the play history keeps
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Play mode a fresh player starts in
    #[serde(default)]
    pub default_mode: PlayMode,
}

const fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

const fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            history_limit: default_history_limit(),
            default_mode: PlayMode::default(),
        }
    }
}

impl PlayerConfig {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or fails validation.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_volume) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "default_volume must be within [0, 1], got {}",
                    self.default_volume
                ),
            });
        }
        if self.history_limit == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "history_limit must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = PlayerConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlayerConfig::default());
        assert!((config.default_volume - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.default_mode, PlayMode::ListLoop);
    }

    #[test]
    fn test_parse_fields() {
        let config = PlayerConfig::from_toml_str(
            "default_volume = 0.5\nhistory_limit = 20\ndefault_mode = \"random\"\n",
        )
        .unwrap();

        assert!((config.default_volume - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.default_mode, PlayMode::Random);
    }

    #[test]
    fn test_volume_out_of_range_rejected() {
        let err = PlayerConfig::from_toml_str("default_volume = 1.5").unwrap_err();
        assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_zero_history_limit_rejected() {
        let err = PlayerConfig::from_toml_str("history_limit = 0").unwrap_err();
        assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_garbage_rejected() {
        let err = PlayerConfig::from_toml_str("not toml at all [").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParseError(_)));
    }
}
