use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};

/// Operating profile selecting a weight vector over the six scoring
/// objectives.
///
/// The set of modes is closed: an unrecognized mode is unrepresentable, so
/// the only remaining configuration error is a weight vector that does not
/// sum to 1 (checked by [`ModeWeights::validate`] before any scoring).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Economy,
    Diet,
    Celebration,
    Normal,
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Economy => "economy",
            Mode::Diet => "diet",
            Mode::Celebration => "celebration",
            Mode::Normal => "normal",
        }
    }

    /// Weight vector for this mode. Each row sums to 1.
    pub fn weights(&self) -> ModeWeights {
        match self {
            Mode::Economy => ModeWeights {
                cost: 0.35,
                nutrition: 0.15,
                pantry: 0.25,
                seasonality: 0.15,
                variety: 0.05,
                cultural: 0.05,
            },
            Mode::Diet => ModeWeights {
                cost: 0.10,
                nutrition: 0.40,
                pantry: 0.15,
                seasonality: 0.15,
                variety: 0.15,
                cultural: 0.05,
            },
            Mode::Celebration => ModeWeights {
                cost: 0.05,
                nutrition: 0.15,
                pantry: 0.10,
                seasonality: 0.10,
                variety: 0.25,
                cultural: 0.35,
            },
            Mode::Normal => ModeWeights {
                cost: 0.20,
                nutrition: 0.20,
                pantry: 0.20,
                seasonality: 0.15,
                variety: 0.15,
                cultural: 0.10,
            },
        }
    }

    /// Per-serving cost ceiling used to normalize the cost sub-score.
    /// Economy mode uses a stricter ceiling.
    pub fn cost_ceiling(&self) -> f32 {
        match self {
            Mode::Economy => 300.0,
            _ => 500.0,
        }
    }
}

/// Weights over the six scoring objectives. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeWeights {
    pub cost: f32,
    pub nutrition: f32,
    pub pantry: f32,
    pub seasonality: f32,
    pub variety: f32,
    pub cultural: f32,
}

impl ModeWeights {
    pub fn sum(&self) -> f32 {
        self.cost + self.nutrition + self.pantry + self.seasonality + self.variety + self.cultural
    }

    /// Reject weight vectors that do not sum to 1 (within float tolerance).
    /// Silently renormalizing would silently change optimization behavior.
    pub fn validate(&self, mode: Mode) -> Result<(), OptimizerError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-3 {
            return Err(OptimizerError::InvalidWeights {
                mode: mode.as_str().to_string(),
                sum,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_mode_weights_sum_to_one() {
        for mode in [Mode::Economy, Mode::Diet, Mode::Celebration, Mode::Normal] {
            let weights = mode.weights();
            assert!(
                weights.validate(mode).is_ok(),
                "weights for {} sum to {}",
                mode.as_str(),
                weights.sum()
            );
        }
    }

    #[test]
    fn test_economy_has_strictest_cost_ceiling() {
        assert_eq!(Mode::Economy.cost_ceiling(), 300.0);
        assert_eq!(Mode::Normal.cost_ceiling(), 500.0);
        assert_eq!(Mode::Diet.cost_ceiling(), 500.0);
        assert_eq!(Mode::Celebration.cost_ceiling(), 500.0);
    }

    #[test]
    fn test_malformed_weights_rejected() {
        let mut weights = Mode::Normal.weights();
        weights.cost = 0.9;
        let err = weights.validate(Mode::Normal).unwrap_err();
        assert!(err.to_string().contains("normal"));
    }
}
