//! Engine configuration.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! # Example Configuration
//!
//! ```toml
//! # delay between press and release when Enter activates a Button
//! button_hold_ms = 70
//! # spaces inserted by Tab while editing
//! edit_tab_spaces = 4
//! # rows per wheel notch (Ctrl+wheel always moves a page)
//! wheel_step = 1
//! # undecodable bytes the decoder holds before dropping them
//! decoder_max_pending = 32
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::parser::{AnsiDecoder, DEFAULT_MAX_PENDING};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// EngineConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub button_hold_ms: u64,
    pub edit_tab_spaces: usize,
    pub wheel_step: u16,
    pub decoder_max_pending: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            button_hold_ms: 70,
            edit_tab_spaces: 4,
            wheel_step: 1,
            decoder_max_pending: DEFAULT_MAX_PENDING,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=16).contains(&self.edit_tab_spaces) {
            return Err(ConfigError::Invalid(format!(
                "edit_tab_spaces must be 1..=16, got {}",
                self.edit_tab_spaces
            )));
        }
        if self.wheel_step == 0 {
            return Err(ConfigError::Invalid("wheel_step must be at least 1".into()));
        }
        Ok(())
    }

    /// A decoder honoring `decoder_max_pending`.
    pub fn decoder(&self) -> AnsiDecoder {
        AnsiDecoder::with_max_pending(self.decoder_max_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let cfg = EngineConfig::from_toml_str("button_hold_ms = 0\nwheel_step = 3\n").unwrap();
        assert_eq!(cfg.button_hold_ms, 0);
        assert_eq!(cfg.wheel_step, 3);
        assert_eq!(cfg.edit_tab_spaces, 4);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            EngineConfig::from_toml_str("edit_tab_spaces = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("wheel_step = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("wheel_step = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = EngineConfig::load("/nonexistent/twidgets.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
