//! Probability blending and the approve/reject decision.
//!
//! [`finalize`] is a pure function over the two probability estimates; the
//! blend weight and approval threshold are policy constants carried by
//! [`ScoreConfig`] rather than hard-coded.

use bon::Builder;
use serde::{Deserialize, Serialize};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Approval threshold must be a probability.
    #[error("approval_threshold must be in [0, 1], got {0}")]
    InvalidThreshold(f32),

    /// Blend weight must be a probability mass.
    #[error("calibrated_weight must be in [0, 1], got {0}")]
    InvalidBlendWeight(f32),
}

// =============================================================================
// ScoreConfig
// =============================================================================

/// Scoring policy configuration.
///
/// Defaults reproduce the production policy: an unweighted mean of the two
/// probability estimates and an approval cutoff at the exact midpoint.
///
/// # Example
///
/// ```
/// use underwrite::decision::ScoreConfig;
///
/// // Production defaults
/// let config = ScoreConfig::builder().build().unwrap();
/// assert_eq!(config.approval_threshold, 0.5);
///
/// // Stricter cutoff, leaning on the tree ensemble
/// let config = ScoreConfig::builder()
///     .approval_threshold(0.65)
///     .calibrated_weight(0.4)
///     .build()
///     .unwrap();
/// # let _ = config;
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct ScoreConfig {
    /// Minimum final probability for approval. Default: 0.5.
    ///
    /// A final probability exactly at the threshold approves.
    #[builder(default = 0.5)]
    pub approval_threshold: f32,

    /// Weight of the calibrated linear probability in the blend.
    /// The tree ensemble gets `1 - calibrated_weight`. Default: 0.5.
    #[builder(default = 0.5)]
    pub calibrated_weight: f32,
}

/// Custom finishing function that validates the config.
impl<S: score_config_builder::IsComplete> ScoreConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either policy constant lies outside
    /// `[0, 1]` or is not finite.
    pub fn build(self) -> Result<ScoreConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl ScoreConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.approval_threshold.is_finite() || !(0.0..=1.0).contains(&self.approval_threshold)
        {
            return Err(ConfigError::InvalidThreshold(self.approval_threshold));
        }
        if !self.calibrated_weight.is_finite() || !(0.0..=1.0).contains(&self.calibrated_weight) {
            return Err(ConfigError::InvalidBlendWeight(self.calibrated_weight));
        }
        Ok(())
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            approval_threshold: 0.5,
            calibrated_weight: 0.5,
        }
    }
}

// =============================================================================
// Decision & ScoreResult
// =============================================================================

/// Terminal eligibility decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

/// Terminal scoring output, immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Blended probability in `[0, 1]`.
    pub probability: f32,
    /// Approve/reject at the configured threshold.
    pub decision: Decision,
}

/// Blend the two probability estimates and decide.
///
/// `final = w * p_cal + (1 - w) * p_tree` with `w = calibrated_weight`;
/// approval iff `final >= approval_threshold` (ties approve). Pure function
/// over two floats.
pub fn finalize(p_cal: f32, p_tree: f32, config: &ScoreConfig) -> ScoreResult {
    let w = config.calibrated_weight;
    let probability = w * p_cal + (1.0 - w) * p_tree;

    let decision = if probability >= config.approval_threshold {
        Decision::Approved
    } else {
        Decision::Rejected
    };

    ScoreResult {
        probability,
        decision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn blend_is_unweighted_mean_by_default() {
        let result = finalize(0.8, 0.4, &ScoreConfig::default());
        assert_abs_diff_eq!(result.probability, 0.6, epsilon = 1e-6);
        assert_eq!(result.decision, Decision::Approved);
    }

    #[test]
    fn exact_threshold_approves() {
        let result = finalize(0.5, 0.5, &ScoreConfig::default());
        assert_abs_diff_eq!(result.probability, 0.5, epsilon = 1e-6);
        assert_eq!(result.decision, Decision::Approved);
    }

    #[test]
    fn below_threshold_rejects() {
        let result = finalize(0.3, 0.6, &ScoreConfig::default());
        assert_abs_diff_eq!(result.probability, 0.45, epsilon = 1e-6);
        assert_eq!(result.decision, Decision::Rejected);
    }

    #[test]
    fn blend_weight_shifts_the_mix() {
        let config = ScoreConfig::builder()
            .calibrated_weight(1.0)
            .build()
            .unwrap();
        let result = finalize(0.9, 0.1, &config);
        assert_abs_diff_eq!(result.probability, 0.9, epsilon = 1e-6);

        let config = ScoreConfig::builder()
            .calibrated_weight(0.0)
            .build()
            .unwrap();
        let result = finalize(0.9, 0.1, &config);
        assert_abs_diff_eq!(result.probability, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn custom_threshold_moves_the_cutoff() {
        let config = ScoreConfig::builder()
            .approval_threshold(0.7)
            .build()
            .unwrap();
        assert_eq!(finalize(0.65, 0.65, &config).decision, Decision::Rejected);
        assert_eq!(finalize(0.7, 0.7, &config).decision, Decision::Approved);
    }

    #[test]
    fn builder_rejects_out_of_range_policy() {
        let err = ScoreConfig::builder()
            .approval_threshold(1.5)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidThreshold(1.5));

        let err = ScoreConfig::builder()
            .calibrated_weight(-0.1)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidBlendWeight(-0.1));
    }

    #[test]
    fn decision_serializes_as_plain_strings() {
        let result = ScoreResult {
            probability: 0.6,
            decision: Decision::Approved,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"decision\":\"Approved\""));
    }

    #[test]
    fn blend_stays_in_unit_interval() {
        let config = ScoreConfig::default();
        for i in 0..=10 {
            for j in 0..=10 {
                let p = finalize(i as f32 / 10.0, j as f32 / 10.0, &config).probability;
                assert!((0.0..=1.0).contains(&p));
            }
        }
    }
}
