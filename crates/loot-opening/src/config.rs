//! Opening timeline configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timeline parameters for a roll opening.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpeningConfig {
    /// Number of spins before the reveal settles.
    pub spins_required: u32,
    /// Ticks between spins.
    pub spin_interval: u64,
    /// Ticks to linger on the final reveal before delivery.
    pub finish_delay: u64,
    /// Extra vertical offset of the reveal above an anchor block.
    pub display_y_offset: f64,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        Self {
            spins_required: 20,
            spin_interval: 2,
            finish_delay: 40,
            display_y_offset: 0.25,
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A timeline with zero spins never commits a reveal.
    #[error("spins_required must be positive")]
    ZeroSpins,

    /// A zero interval would spin on every tick forever.
    #[error("spin_interval must be positive")]
    ZeroInterval,
}

impl OpeningConfig {
    /// Validate the configuration before constructing a session.
    ///
    /// The session itself assumes validated inputs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spins_required == 0 {
            return Err(ConfigError::ZeroSpins);
        }
        if self.spin_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(OpeningConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_spins_rejected() {
        let config = OpeningConfig {
            spins_required: 0,
            ..OpeningConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSpins)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = OpeningConfig {
            spin_interval: 0,
            ..OpeningConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OpeningConfig = serde_json::from_str(r#"{"spins_required": 5}"#).unwrap();
        assert_eq!(config.spins_required, 5);
        assert_eq!(config.spin_interval, 2);
        assert_eq!(config.finish_delay, 40);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_str::<OpeningConfig>(r#"{"spin_speed": 3}"#);
        assert!(result.is_err());
    }
}
