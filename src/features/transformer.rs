//! Fitted preprocessing transformer.
//!
//! A [`FittedTransformer`] is the deserialized, validated state of the
//! offline preprocessing fit: one encoder per application field, in a fixed
//! order. Applying it is deterministic and stateless — identical input
//! yields identical output.
//!
//! # Encoding
//!
//! - Numeric fields standard-scale: `(x - mean) / scale`.
//! - Categorical fields one-hot over the categories seen at fit time, plus
//!   one reserved trailing "unknown" column. A category never seen during
//!   fitting sets the unknown column instead of failing — novel vocabulary
//!   in live traffic is not a data error.
//!
//! Output column order is fixed by the fitted state and opaque to callers.

use ndarray::{Array1, ArrayView1};

use crate::error::PreprocessingError;
use crate::record::{FeatureRecord, FieldValue};
use crate::schema::{FieldKind, FieldSpec};

/// Structural validation errors for fitted transformer state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformerValidationError {
    #[error("transformer has no fitted columns")]
    Empty,

    #[error("duplicate field `{field}` in fitted columns")]
    DuplicateField { field: String },

    #[error("field `{field}`: scale must be positive and finite, got {scale}")]
    InvalidScale { field: String, scale: f32 },

    #[error("field `{field}`: mean must be finite, got {mean}")]
    InvalidMean { field: String, mean: f32 },

    #[error("field `{field}`: duplicate category `{category}`")]
    DuplicateCategory { field: String, category: String },
}

/// Fitted encoder for one application field.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEncoder {
    /// Standard scaling with fitted mean and scale.
    Numeric { mean: f32, scale: f32 },
    /// One-hot over the fitted vocabulary plus a trailing unknown bucket.
    Categorical { categories: Vec<String> },
}

impl ColumnEncoder {
    /// Number of output columns this encoder produces.
    fn width(&self) -> usize {
        match self {
            Self::Numeric { .. } => 1,
            // One column per seen category plus the unknown bucket.
            Self::Categorical { categories } => categories.len() + 1,
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::Numeric { .. } => FieldKind::Numeric,
            Self::Categorical { .. } => FieldKind::Categorical,
        }
    }
}

/// One fitted column: field identity plus its encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedColumn {
    pub name: String,
    pub required: bool,
    pub encoder: ColumnEncoder,
}

/// The fitted, deserialized preprocessing transformation.
#[derive(Debug, Clone)]
pub struct FittedTransformer {
    columns: Vec<FittedColumn>,
    n_outputs: usize,
}

impl FittedTransformer {
    /// Build from fitted columns, validating structural invariants.
    pub fn new(columns: Vec<FittedColumn>) -> Result<Self, TransformerValidationError> {
        if columns.is_empty() {
            return Err(TransformerValidationError::Empty);
        }

        let mut seen = std::collections::BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(TransformerValidationError::DuplicateField {
                    field: col.name.clone(),
                });
            }
            match &col.encoder {
                ColumnEncoder::Numeric { mean, scale } => {
                    if !(scale.is_finite() && *scale > 0.0) {
                        return Err(TransformerValidationError::InvalidScale {
                            field: col.name.clone(),
                            scale: *scale,
                        });
                    }
                    if !mean.is_finite() {
                        return Err(TransformerValidationError::InvalidMean {
                            field: col.name.clone(),
                            mean: *mean,
                        });
                    }
                }
                ColumnEncoder::Categorical { categories } => {
                    let mut cats = std::collections::BTreeSet::new();
                    for c in categories {
                        if !cats.insert(c.as_str()) {
                            return Err(TransformerValidationError::DuplicateCategory {
                                field: col.name.clone(),
                                category: c.clone(),
                            });
                        }
                    }
                }
            }
        }

        let n_outputs = columns.iter().map(|c| c.encoder.width()).sum();
        Ok(Self { columns, n_outputs })
    }

    /// Width of the transformed feature vector.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    /// The applicant schema implied by the fitted columns.
    ///
    /// This is what the normalizer runs against.
    pub fn field_specs(&self) -> Vec<FieldSpec> {
        self.columns
            .iter()
            .map(|c| FieldSpec {
                name: c.name.clone(),
                kind: c.encoder.kind(),
                required: c.required,
            })
            .collect()
    }

    /// Fitted columns in encoding order.
    pub fn columns(&self) -> &[FittedColumn] {
        &self.columns
    }

    /// Apply the fitted transformation to one record.
    ///
    /// Stateless at call time. Fails if a field needed by the fitted
    /// encoding is absent or carries text where a numeric is required;
    /// unseen categories route to the unknown bucket.
    pub fn transform(
        &self,
        record: &FeatureRecord,
    ) -> Result<TransformedFeatures, PreprocessingError> {
        let mut values = Array1::zeros(self.n_outputs);
        let mut offset = 0;

        for col in &self.columns {
            let value = record
                .get(&col.name)
                .ok_or_else(|| PreprocessingError::MissingField {
                    field: col.name.clone(),
                })?;

            match &col.encoder {
                ColumnEncoder::Numeric { mean, scale } => {
                    let raw = value
                        .as_number()
                        .ok_or_else(|| PreprocessingError::NonNumeric {
                            field: col.name.clone(),
                            found: value.kind_name(),
                        })?;
                    values[offset] = (raw as f32 - mean) / scale;
                    offset += 1;
                }
                ColumnEncoder::Categorical { categories } => {
                    let hot = match value {
                        FieldValue::Text(s) => categories
                            .iter()
                            .position(|c| c == s)
                            // Unknown bucket is the trailing column.
                            .unwrap_or(categories.len()),
                        // Non-text in a categorical slot was never a fitted
                        // category; route to the unknown bucket.
                        _ => categories.len(),
                    };
                    values[offset + hot] = 1.0;
                    offset += categories.len() + 1;
                }
            }
        }

        debug_assert_eq!(offset, self.n_outputs);
        Ok(TransformedFeatures { values })
    }
}

/// The transformed feature vector.
///
/// Column order and encoding are fixed by the fitted transformer state and
/// opaque to callers; scorers consume it through a read-only view.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedFeatures {
    values: Array1<f32>,
}

impl TransformedFeatures {
    /// Number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view for model consumption.
    #[inline]
    pub fn view(&self) -> ArrayView1<'_, f32> {
        self.values.view()
    }

    /// Contiguous slice of the feature values.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        self.values.as_slice().expect("owned Array1 is contiguous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn transformer() -> FittedTransformer {
        FittedTransformer::new(vec![
            FittedColumn {
                name: "age".into(),
                required: true,
                encoder: ColumnEncoder::Numeric {
                    mean: 40.0,
                    scale: 10.0,
                },
            },
            FittedColumn {
                name: "employment_type".into(),
                required: true,
                encoder: ColumnEncoder::Categorical {
                    categories: vec!["salaried".into(), "self-employed".into()],
                },
            },
        ])
        .unwrap()
    }

    #[test]
    fn output_width_counts_unknown_buckets() {
        // 1 numeric + (2 categories + 1 unknown) = 4
        assert_eq!(transformer().n_outputs(), 4);
    }

    #[test]
    fn scales_and_one_hots() {
        let record = FeatureRecord::new()
            .with("age", 50.0)
            .with("employment_type", "self-employed");

        let x = transformer().transform(&record).unwrap();
        assert_abs_diff_eq!(x.as_slice()[0], 1.0, epsilon = 1e-6);
        assert_eq!(&x.as_slice()[1..], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn unseen_category_routes_to_unknown_bucket() {
        let record = FeatureRecord::new()
            .with("age", 40.0)
            .with("employment_type", "freelancer");

        let x = transformer().transform(&record).unwrap();
        assert_eq!(&x.as_slice()[1..], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_encoded_field_errors() {
        let record = FeatureRecord::new().with("age", 40.0);
        let err = transformer().transform(&record).unwrap_err();
        assert_eq!(
            err,
            PreprocessingError::MissingField {
                field: "employment_type".into()
            }
        );
    }

    #[test]
    fn text_in_numeric_slot_errors() {
        let record = FeatureRecord::new()
            .with("age", "old")
            .with("employment_type", "salaried");
        let err = transformer().transform(&record).unwrap_err();
        assert_eq!(
            err,
            PreprocessingError::NonNumeric {
                field: "age".into(),
                found: "text"
            }
        );
    }

    #[test]
    fn transform_is_deterministic() {
        let record = FeatureRecord::new()
            .with("age", 33.0)
            .with("employment_type", "salaried");
        let t = transformer();
        assert_eq!(t.transform(&record).unwrap(), t.transform(&record).unwrap());
    }

    #[test]
    fn rejects_non_positive_scale() {
        let err = FittedTransformer::new(vec![FittedColumn {
            name: "age".into(),
            required: true,
            encoder: ColumnEncoder::Numeric {
                mean: 0.0,
                scale: 0.0,
            },
        }])
        .unwrap_err();
        assert!(matches!(
            err,
            TransformerValidationError::InvalidScale { .. }
        ));
    }

    #[test]
    fn rejects_duplicate_fields() {
        let col = FittedColumn {
            name: "age".into(),
            required: true,
            encoder: ColumnEncoder::Numeric {
                mean: 0.0,
                scale: 1.0,
            },
        };
        let err = FittedTransformer::new(vec![col.clone(), col]).unwrap_err();
        assert!(matches!(
            err,
            TransformerValidationError::DuplicateField { .. }
        ));
    }
}
