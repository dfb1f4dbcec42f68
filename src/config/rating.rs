//! Rating system configuration

use serde::{Deserialize, Serialize};

use crate::error::RankingError;

/// Adaptive K-factor schedule
///
/// Items below `provisional_games` comparisons use `provisional_k`, items
/// below `stable_games` use `standard_k`, everything else `stable_k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub provisional_k: u32,
    pub standard_k: u32,
    pub stable_k: u32,
    pub provisional_games: u32,
    pub stable_games: u32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            provisional_k: 64,
            standard_k: 32,
            stable_k: 16,
            provisional_games: 5,
            stable_games: 20,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.stable_k == 0 {
            return Err(RankingError::ConfigurationError {
                message: "K-factors must be positive".to_string(),
            }
            .into());
        }

        if self.provisional_k < self.standard_k || self.standard_k < self.stable_k {
            return Err(RankingError::ConfigurationError {
                message: "K-factors must not increase with experience".to_string(),
            }
            .into());
        }

        if self.provisional_games > self.stable_games {
            return Err(RankingError::ConfigurationError {
                message: "Provisional game threshold must not exceed the stable threshold"
                    .to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_is_valid() {
        let config = RatingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provisional_k, 64);
        assert_eq!(config.standard_k, 32);
        assert_eq!(config.stable_k, 16);
    }

    #[test]
    fn test_rejects_zero_k() {
        let config = RatingConfig {
            stable_k: 0,
            ..RatingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_increasing_k() {
        let config = RatingConfig {
            standard_k: 80,
            ..RatingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_swapped_thresholds() {
        let config = RatingConfig {
            provisional_games: 30,
            stable_games: 20,
            ..RatingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
