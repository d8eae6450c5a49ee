//! Error taxonomy for the scoring pipeline.
//!
//! Two failure classes exist and never mix:
//!
//! - [`ArtifactError`]: startup-time, fatal. Raised while loading the model
//!   artifact set; the process must not accept scoring requests afterwards.
//! - [`ScoreError`]: per-request, recoverable. Raised while scoring a single
//!   record and surfaced to the caller as a structured failure; the process
//!   keeps serving.
//!
//! Callers branch on error kind, not on message text.

use std::path::PathBuf;

// =============================================================================
// Startup errors
// =============================================================================

/// Fatal artifact loading error.
///
/// Any of these prevents the process from accepting scoring requests.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// An expected artifact file does not exist.
    #[error("artifact file not found: {}", path.display())]
    Missing { path: PathBuf },

    /// An artifact file exists but could not be read.
    #[error("failed to read artifact file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact file is not valid JSON for its schema.
    #[error("failed to parse artifact file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An artifact parsed but violates a structural invariant.
    #[error("invalid artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

// =============================================================================
// Per-request errors
// =============================================================================

/// A required input field carries a value of the wrong coarse type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}` expects a {expected} value, got {found}")]
pub struct InvalidInputError {
    pub field: String,
    pub expected: &'static str,
    pub found: &'static str,
}

/// Feature encoding failed against the fitted transformer state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreprocessingError {
    /// A field needed by the fitted encoding is absent from the record.
    #[error("field `{field}` is required by the fitted encoding but absent")]
    MissingField { field: String },

    /// A field encoded as numeric carries a non-numeric value.
    #[error("field `{field}` must be numeric for scaling, got {found}")]
    NonNumeric { field: String, found: &'static str },
}

/// A scorer failed to produce a probability.
///
/// Never substituted with a default probability; always surfaced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelInferenceError {
    /// Feature vector width does not match the fitted model.
    #[error("{model} model expects {expected} features, got {actual}")]
    DimensionMismatch {
        model: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The model produced NaN or infinity where a probability was required.
    #[error("{model} model produced a non-finite probability")]
    NonFiniteProbability { model: &'static str },
}

/// Umbrella for everything that can fail while scoring one record.
///
/// Each variant preserves the stage-specific error so the calling layer can
/// map kinds to response codes without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),

    #[error(transparent)]
    Inference(#[from] ModelInferenceError),
}

impl ScoreError {
    /// Stable category name for reporting to callers.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Preprocessing(_) => "preprocessing",
            Self::Inference(_) => "model_inference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_error_categories() {
        let err: ScoreError = InvalidInputError {
            field: "age".into(),
            expected: "number",
            found: "text",
        }
        .into();
        assert_eq!(err.category(), "invalid_input");

        let err: ScoreError = PreprocessingError::MissingField {
            field: "employment_type".into(),
        }
        .into();
        assert_eq!(err.category(), "preprocessing");

        let err: ScoreError = ModelInferenceError::DimensionMismatch {
            model: "logistic",
            expected: 8,
            actual: 5,
        }
        .into();
        assert_eq!(err.category(), "model_inference");
    }

    #[test]
    fn messages_name_the_field() {
        let err = PreprocessingError::MissingField {
            field: "credit_score".into(),
        };
        assert!(err.to_string().contains("credit_score"));

        let err = InvalidInputError {
            field: "age".into(),
            expected: "number",
            found: "text",
        };
        assert!(err.to_string().contains("expects a number"));
    }
}
