//! Conversion from artifact schema types to validated runtime types.
//!
//! Every conversion narrows f64 file values to f32 runtime values and runs
//! the runtime type's structural validation, so a successfully converted
//! artifact is safe to traverse.

use crate::features::transformer::{
    ColumnEncoder, FittedColumn, FittedTransformer, TransformerValidationError,
};
use crate::model::forest::{Forest, ForestValidationError, Tree};
use crate::model::isotonic::{CalibrationValidationError, IsotonicCalibrator};
use crate::model::linear::{LinearValidationError, LogisticModel};

use super::schema::{
    EncoderSchema, ForestSchema, IsotonicSchema, LogisticSchema, TransformerSchema, TreeSchema,
};

impl TryFrom<TransformerSchema> for FittedTransformer {
    type Error = TransformerValidationError;

    fn try_from(schema: TransformerSchema) -> Result<Self, Self::Error> {
        let columns = schema
            .fields
            .into_iter()
            .map(|field| FittedColumn {
                name: field.name,
                required: field.required,
                encoder: match field.encoder {
                    EncoderSchema::Numeric { mean, scale } => ColumnEncoder::Numeric {
                        mean: mean as f32,
                        scale: scale as f32,
                    },
                    EncoderSchema::Categorical { categories } => {
                        ColumnEncoder::Categorical { categories }
                    }
                },
            })
            .collect();

        FittedTransformer::new(columns)
    }
}

impl TryFrom<LogisticSchema> for LogisticModel {
    type Error = LinearValidationError;

    fn try_from(schema: LogisticSchema) -> Result<Self, Self::Error> {
        let weights = schema.weights.iter().map(|&w| w as f32).collect();
        LogisticModel::from_fitted(weights, schema.intercept as f32)
    }
}

impl TryFrom<IsotonicSchema> for IsotonicCalibrator {
    type Error = CalibrationValidationError;

    fn try_from(schema: IsotonicSchema) -> Result<Self, Self::Error> {
        let thresholds = schema.thresholds.iter().map(|&t| t as f32).collect();
        let values = schema.values.iter().map(|&v| v as f32).collect();
        IsotonicCalibrator::new(thresholds, values)
    }
}

impl From<TreeSchema> for Tree {
    fn from(schema: TreeSchema) -> Self {
        Tree::new(
            schema.split_indices,
            schema.split_thresholds.iter().map(|&t| t as f32).collect(),
            schema.children_left,
            schema.children_right,
            schema.default_left,
            schema.is_leaf,
            schema.leaf_values.iter().map(|&v| v as f32).collect(),
        )
    }
}

impl TryFrom<ForestSchema> for Forest {
    type Error = ForestValidationError;

    fn try_from(schema: ForestSchema) -> Result<Self, Self::Error> {
        let n_features = schema.n_features;
        let base_score = schema.base_score as f32;
        let trees = schema.trees.into_iter().map(Tree::from).collect();
        Forest::new(trees, base_score, n_features)
    }
}
