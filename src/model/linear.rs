//! Logistic model inference.
//!
//! The linear half of the calibrated linear scorer: a fitted weight vector
//! and intercept over the transformed feature columns. The raw probability
//! it produces is corrected by the isotonic calibrator downstream.

use ndarray::Array1;

use super::sigmoid;
use crate::error::ModelInferenceError;
use crate::features::TransformedFeatures;

/// Structural validation errors for fitted logistic parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinearValidationError {
    #[error("logistic model has no weights")]
    Empty,

    #[error("weight at index {index} is not finite")]
    NonFiniteWeight { index: usize },

    #[error("intercept is not finite")]
    NonFiniteIntercept,
}

/// Fitted logistic regression model.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: Array1<f32>,
    intercept: f32,
}

impl LogisticModel {
    /// Create a model from fitted weights and intercept.
    pub fn new(weights: Array1<f32>, intercept: f32) -> Self {
        Self { weights, intercept }
    }

    /// Create from deserialized parameters, validating finiteness.
    pub fn from_fitted(
        weights: Vec<f32>,
        intercept: f32,
    ) -> Result<Self, LinearValidationError> {
        if weights.is_empty() {
            return Err(LinearValidationError::Empty);
        }
        if let Some(index) = weights.iter().position(|w| !w.is_finite()) {
            return Err(LinearValidationError::NonFiniteWeight { index });
        }
        if !intercept.is_finite() {
            return Err(LinearValidationError::NonFiniteIntercept);
        }
        Ok(Self::new(Array1::from(weights), intercept))
    }

    /// Number of features the model was fitted on.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Fitted intercept.
    #[inline]
    pub fn intercept(&self) -> f32 {
        self.intercept
    }

    /// Raw (uncalibrated) probability for one transformed feature vector.
    ///
    /// Margin = `weights · x + intercept`, squashed through a numerically
    /// stable sigmoid. Output is in `[0, 1]`.
    pub fn raw_probability(
        &self,
        features: &TransformedFeatures,
    ) -> Result<f32, ModelInferenceError> {
        if features.len() != self.weights.len() {
            return Err(ModelInferenceError::DimensionMismatch {
                model: "logistic",
                expected: self.weights.len(),
                actual: features.len(),
            });
        }

        let margin = self.weights.dot(&features.view()) + self.intercept;
        let p = sigmoid(margin);
        if !p.is_finite() {
            return Err(ModelInferenceError::NonFiniteProbability { model: "logistic" });
        }
        Ok(p)
    }
}
