//! Schema types for artifact serialization.
//!
//! These serde types mirror the on-disk JSON layout of the four model
//! artifacts and are separate from the runtime types so the file format can
//! evolve independently. Conversion into runtime types (with validation)
//! lives in [`super::convert`].
//!
//! Numbers are stored as f64 on disk; runtime inference narrows to f32.

use serde::{Deserialize, Serialize};

/// Current artifact schema version. Every file carries it.
pub const SCHEMA_VERSION: u32 = 1;

// =============================================================================
// transformer.json
// =============================================================================

/// Fitted encoder for one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncoderSchema {
    /// Standard scaling parameters.
    Numeric { mean: f64, scale: f64 },
    /// Fitted category vocabulary (the unknown bucket is implicit).
    Categorical { categories: Vec<String> },
}

/// One fitted column of the preprocessing transformer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    pub encoder: EncoderSchema,
}

/// `transformer.json`: the fitted preprocessing state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerSchema {
    pub version: u32,
    pub fields: Vec<FieldSchema>,
}

// =============================================================================
// logistic.json
// =============================================================================

/// `logistic.json`: fitted logistic regression parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticSchema {
    pub version: u32,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

// =============================================================================
// isotonic.json
// =============================================================================

/// `isotonic.json`: knots of the fitted isotonic calibration map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsotonicSchema {
    pub version: u32,
    pub thresholds: Vec<f64>,
    pub values: Vec<f64>,
}

// =============================================================================
// gbdt.json
// =============================================================================

/// One tree in structure-of-arrays layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSchema {
    pub split_indices: Vec<u32>,
    pub split_thresholds: Vec<f64>,
    pub children_left: Vec<u32>,
    pub children_right: Vec<u32>,
    pub default_left: Vec<bool>,
    pub is_leaf: Vec<bool>,
    pub leaf_values: Vec<f64>,
}

/// `gbdt.json`: the fitted tree ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSchema {
    pub version: u32,
    pub n_features: usize,
    pub base_score: f64,
    pub trees: Vec<TreeSchema>,
}
