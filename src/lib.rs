//! underwrite: loan eligibility scoring via ensemble inference.
//!
//! Scores one loan application at a time by combining two fitted models
//! into a single calibrated probability and an approve/reject decision:
//!
//! 1. Normalize the raw [`FeatureRecord`] (fill defaults, check coarse types)
//! 2. Apply the fitted preprocessing transformer (scaling, one-hot)
//! 3. Score with the logistic model, corrected by isotonic calibration
//! 4. Score with the gradient boosted tree ensemble
//! 5. Blend both probabilities and apply the approval threshold
//!
//! # Key Types
//!
//! - [`ScorePipeline`] / [`EligibilityScorer`] - the scoring entry point
//! - [`ModelArtifactSet`] - the four fitted artifacts, loaded once at startup
//! - [`ScoreConfig`] - blend weight and approval threshold policy
//! - [`ScoreResult`] / [`Decision`] - the terminal output
//! - [`ScoreError`] / [`ArtifactError`] - per-request vs. startup-fatal errors
//!
//! # Startup
//!
//! Load artifacts exactly once, before accepting requests; a failed load is
//! fatal, never a per-request error:
//!
//! ```ignore
//! use underwrite::{ScoreConfig, ScorePipeline};
//!
//! let config = ScoreConfig::builder().build()?;
//! let pipeline = ScorePipeline::from_artifact_dir("artifacts", config)?;
//! let result = pipeline.score(&record)?;
//! ```
//!
//! # Concurrency
//!
//! Scoring is a pure function of `(record, artifacts, config)`. The
//! artifact set is immutable after load, so any number of threads may score
//! concurrently with no locking; [`ScorePipeline::score_batch`] fans out
//! over rayon when asked.

// Re-export approx traits for users who want to compare probabilities
pub use approx;

pub mod artifacts;
pub mod decision;
pub mod error;
pub mod features;
pub mod model;
pub mod record;
pub mod schema;
pub mod scorer;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Scoring entry points
pub use scorer::{EligibilityScorer, ScorePipeline};

// Artifact set (startup)
pub use artifacts::ModelArtifactSet;

// Policy and terminal output
pub use decision::{Decision, ScoreConfig, ScoreResult};

// Input types
pub use record::{FeatureRecord, FieldValue};

// Error taxonomy
pub use error::{
    ArtifactError, InvalidInputError, ModelInferenceError, PreprocessingError, ScoreError,
};

// Batch parallelism switch
pub use utils::Parallelism;
