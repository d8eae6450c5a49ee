//! Model artifact loading.
//!
//! The pipeline runs against four fitted artifacts produced by the offline
//! training stack and loaded exactly once at process startup:
//!
//! | File               | Contents                                  |
//! |--------------------|-------------------------------------------|
//! | `transformer.json` | fitted preprocessing (scaling, one-hot)   |
//! | `logistic.json`    | logistic regression weights + intercept   |
//! | `isotonic.json`    | isotonic calibration knots                |
//! | `gbdt.json`        | gradient boosted tree ensemble            |
//!
//! A missing, unreadable, unparsable, or structurally invalid file is an
//! [`ArtifactError`] — fatal at startup, never a per-request failure. The
//! loaded [`ModelArtifactSet`] is immutable; every scoring call borrows it
//! read-only, so concurrent requests need no locking.

mod convert;
pub mod schema;

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::ArtifactError;
use crate::features::FittedTransformer;
use crate::model::{Forest, IsotonicCalibrator, LogisticModel};

use schema::{ForestSchema, IsotonicSchema, LogisticSchema, TransformerSchema, SCHEMA_VERSION};

/// File name of the preprocessing transformer artifact.
pub const TRANSFORMER_FILE: &str = "transformer.json";
/// File name of the logistic model artifact.
pub const LOGISTIC_FILE: &str = "logistic.json";
/// File name of the isotonic calibrator artifact.
pub const ISOTONIC_FILE: &str = "isotonic.json";
/// File name of the tree ensemble artifact.
pub const GBDT_FILE: &str = "gbdt.json";

/// The immutable bundle of fitted artifacts backing the pipeline.
///
/// Constructed once during startup and shared read-only across requests;
/// no request may mutate it.
#[derive(Debug, Clone)]
pub struct ModelArtifactSet {
    transformer: FittedTransformer,
    linear: LogisticModel,
    calibrator: IsotonicCalibrator,
    forest: Forest,
}

impl ModelArtifactSet {
    /// Assemble a set from already-validated parts.
    ///
    /// Used by tests and fixtures that build artifacts in code. Parts must
    /// agree on feature width; [`load`](Self::load) enforces this for
    /// on-disk artifacts.
    pub fn from_parts(
        transformer: FittedTransformer,
        linear: LogisticModel,
        calibrator: IsotonicCalibrator,
        forest: Forest,
    ) -> Self {
        debug_assert_eq!(transformer.n_outputs(), linear.n_features());
        debug_assert_eq!(transformer.n_outputs(), forest.n_features());
        Self {
            transformer,
            linear,
            calibrator,
            forest,
        }
    }

    /// Load and validate all four artifacts from a directory.
    ///
    /// One-time, single-threaded startup step. Any failure here is fatal:
    /// the caller must not accept scoring requests without a complete set.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();

        let transformer_path = dir.join(TRANSFORMER_FILE);
        let schema: TransformerSchema = read_artifact(&transformer_path)?;
        check_version(schema.version, &transformer_path)?;
        let transformer = FittedTransformer::try_from(schema)
            .map_err(|e| invalid(&transformer_path, e))?;
        debug!(
            path = %transformer_path.display(),
            fields = transformer.columns().len(),
            outputs = transformer.n_outputs(),
            "loaded preprocessing transformer"
        );

        let logistic_path = dir.join(LOGISTIC_FILE);
        let schema: LogisticSchema = read_artifact(&logistic_path)?;
        check_version(schema.version, &logistic_path)?;
        let linear = LogisticModel::try_from(schema).map_err(|e| invalid(&logistic_path, e))?;
        debug!(
            path = %logistic_path.display(),
            features = linear.n_features(),
            "loaded logistic model"
        );

        let isotonic_path = dir.join(ISOTONIC_FILE);
        let schema: IsotonicSchema = read_artifact(&isotonic_path)?;
        check_version(schema.version, &isotonic_path)?;
        let calibrator =
            IsotonicCalibrator::try_from(schema).map_err(|e| invalid(&isotonic_path, e))?;
        debug!(
            path = %isotonic_path.display(),
            knots = calibrator.n_knots(),
            "loaded isotonic calibrator"
        );

        let gbdt_path = dir.join(GBDT_FILE);
        let schema: ForestSchema = read_artifact(&gbdt_path)?;
        check_version(schema.version, &gbdt_path)?;
        let forest = Forest::try_from(schema).map_err(|e| invalid(&gbdt_path, e))?;
        debug!(
            path = %gbdt_path.display(),
            trees = forest.n_trees(),
            features = forest.n_features(),
            "loaded tree ensemble"
        );

        // Cross-artifact agreement on the transformed feature width.
        if linear.n_features() != transformer.n_outputs() {
            return Err(ArtifactError::Invalid {
                path: logistic_path,
                reason: format!(
                    "logistic model fitted on {} features but transformer produces {}",
                    linear.n_features(),
                    transformer.n_outputs()
                ),
            });
        }
        if forest.n_features() != transformer.n_outputs() {
            return Err(ArtifactError::Invalid {
                path: gbdt_path,
                reason: format!(
                    "tree ensemble fitted on {} features but transformer produces {}",
                    forest.n_features(),
                    transformer.n_outputs()
                ),
            });
        }

        info!(
            dir = %dir.display(),
            features = transformer.n_outputs(),
            trees = forest.n_trees(),
            "model artifact set loaded"
        );

        Ok(Self::from_parts(transformer, linear, calibrator, forest))
    }

    /// The fitted preprocessing transformer.
    #[inline]
    pub fn transformer(&self) -> &FittedTransformer {
        &self.transformer
    }

    /// The fitted logistic model.
    #[inline]
    pub fn linear(&self) -> &LogisticModel {
        &self.linear
    }

    /// The fitted isotonic calibrator.
    #[inline]
    pub fn calibrator(&self) -> &IsotonicCalibrator {
        &self.calibrator
    }

    /// The fitted tree ensemble.
    #[inline]
    pub fn forest(&self) -> &Forest {
        &self.forest
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn check_version(version: u32, path: &Path) -> Result<(), ArtifactError> {
    if version != SCHEMA_VERSION {
        return Err(ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason: format!("unsupported schema version {version}, expected {SCHEMA_VERSION}"),
        });
    }
    Ok(())
}

fn invalid(path: &Path, err: impl std::fmt::Display) -> ArtifactError {
    ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
