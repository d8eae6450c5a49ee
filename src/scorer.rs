//! The scoring pipeline.
//!
//! [`ScorePipeline`] wires the stages together for one request:
//!
//! ```text
//! FeatureRecord
//!   └─ normalize          (defaults, coarse-type checks)
//!       └─ transform      (fitted scaling + one-hot)
//!           ├─ logistic → isotonic   (calibrated linear probability)
//!           └─ tree ensemble         (independent probability)
//!               └─ finalize          (blend + threshold)
//! ```
//!
//! The pipeline is a pure function of `(record, artifacts, config)`:
//! identical input yields a bit-identical [`ScoreResult`]. Each call is
//! independent and touches the artifact set read-only, so requests are
//! safely served in parallel.

use tracing::debug;

use crate::artifacts::ModelArtifactSet;
use crate::decision::{finalize, ScoreConfig, ScoreResult};
use crate::error::{InvalidInputError, ModelInferenceError, PreprocessingError, ScoreError};
use crate::features::{normalize, TransformedFeatures};
use crate::record::FeatureRecord;
use crate::schema::FieldSpec;
use crate::utils::Parallelism;

/// The scoring interface consumed by the calling layer.
///
/// Implemented by the production [`ScorePipeline`] and by the
/// clearly-labeled [`StubScorer`](crate::testing::StubScorer) placeholder.
pub trait EligibilityScorer {
    /// Score one application record.
    fn score(&self, record: &FeatureRecord) -> Result<ScoreResult, ScoreError>;
}

/// Production ensemble scoring pipeline.
///
/// Owns the immutable artifact set and policy config for the process
/// lifetime; construct once at startup, after [`ModelArtifactSet::load`]
/// has succeeded.
#[derive(Debug, Clone)]
pub struct ScorePipeline {
    artifacts: ModelArtifactSet,
    config: ScoreConfig,
    // Cached from the transformer so normalize() doesn't rebuild it per call.
    field_specs: Vec<FieldSpec>,
}

impl ScorePipeline {
    /// Assemble a pipeline from loaded artifacts and policy config.
    pub fn new(artifacts: ModelArtifactSet, config: ScoreConfig) -> Self {
        let field_specs = artifacts.transformer().field_specs();
        Self {
            artifacts,
            config,
            field_specs,
        }
    }

    /// Load artifacts from a directory and assemble the pipeline.
    ///
    /// Fails fatally on any artifact problem; see [`ModelArtifactSet::load`].
    pub fn from_artifact_dir(
        dir: impl AsRef<std::path::Path>,
        config: ScoreConfig,
    ) -> Result<Self, crate::error::ArtifactError> {
        Ok(Self::new(ModelArtifactSet::load(dir)?, config))
    }

    /// The artifact set backing this pipeline.
    pub fn artifacts(&self) -> &ModelArtifactSet {
        &self.artifacts
    }

    /// The policy config backing this pipeline.
    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Normalize a record against the fitted applicant schema.
    pub fn normalize(&self, record: &FeatureRecord) -> Result<FeatureRecord, InvalidInputError> {
        normalize(record, &self.field_specs)
    }

    /// Apply the fitted preprocessing to a normalized record.
    pub fn transform(
        &self,
        record: &FeatureRecord,
    ) -> Result<TransformedFeatures, PreprocessingError> {
        self.artifacts.transformer().transform(record)
    }

    /// Calibrated linear probability: logistic output corrected by the
    /// isotonic map.
    pub fn score_linear(
        &self,
        features: &TransformedFeatures,
    ) -> Result<f32, ModelInferenceError> {
        let p_raw = self.artifacts.linear().raw_probability(features)?;
        Ok(self.artifacts.calibrator().calibrate(p_raw))
    }

    /// Independent tree ensemble probability.
    pub fn score_tree(
        &self,
        features: &TransformedFeatures,
    ) -> Result<f32, ModelInferenceError> {
        self.artifacts.forest().probability(features)
    }

    /// Score a batch of records, optionally in parallel.
    ///
    /// Output order matches input order; a failing record yields its own
    /// error without affecting the rest of the batch.
    pub fn score_batch(
        &self,
        records: &[FeatureRecord],
        parallelism: Parallelism,
    ) -> Vec<Result<ScoreResult, ScoreError>> {
        parallelism.maybe_par_map(records, |record| EligibilityScorer::score(self, record))
    }
}

impl EligibilityScorer for ScorePipeline {
    fn score(&self, record: &FeatureRecord) -> Result<ScoreResult, ScoreError> {
        let normalized = self.normalize(record)?;
        let features = self.transform(&normalized)?;

        let p_cal = self.score_linear(&features)?;
        let p_tree = self.score_tree(&features)?;

        let result = finalize(p_cal, p_tree, &self.config);
        debug!(
            p_cal,
            p_tree,
            probability = result.probability,
            decision = ?result.decision,
            "scored application"
        );
        Ok(result)
    }
}
