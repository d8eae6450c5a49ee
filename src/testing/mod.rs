//! Test support: fixture artifacts and the stub scorer.
//!
//! Everything here exists for tests and harness wiring. The fixture
//! artifact set is small enough to reason about by hand and deterministic,
//! so pipeline tests don't need files on disk; [`write_fixture_files`]
//! materializes the same set as the four artifact JSON files for loader
//! tests.

use std::path::Path;

use ndarray::Array1;

use crate::artifacts::schema::{
    EncoderSchema, FieldSchema, ForestSchema, IsotonicSchema, LogisticSchema, TransformerSchema,
    TreeSchema, SCHEMA_VERSION,
};
use crate::artifacts::{
    ModelArtifactSet, GBDT_FILE, ISOTONIC_FILE, LOGISTIC_FILE, TRANSFORMER_FILE,
};
use crate::decision::{Decision, ScoreResult};
use crate::error::ScoreError;
use crate::features::transformer::{ColumnEncoder, FittedColumn, FittedTransformer};
use crate::model::{Forest, IsotonicCalibrator, LogisticModel, Tree};
use crate::record::FeatureRecord;
use crate::scorer::EligibilityScorer;

/// Build a [`TransformedFeatures`](crate::features::TransformedFeatures)
/// vector with identity scaling, for model-level tests that want to pick
/// the column values directly.
pub fn identity_features(values: &[f64]) -> crate::features::TransformedFeatures {
    let columns = values
        .iter()
        .enumerate()
        .map(|(i, _)| FittedColumn {
            name: format!("f{i}"),
            required: true,
            encoder: ColumnEncoder::Numeric {
                mean: 0.0,
                scale: 1.0,
            },
        })
        .collect();
    let transformer = FittedTransformer::new(columns).unwrap();

    let mut record = FeatureRecord::new();
    for (i, v) in values.iter().enumerate() {
        record.insert(format!("f{i}"), *v);
    }
    transformer.transform(&record).unwrap()
}

/// Fitted columns of the fixture transformer.
///
/// 4 numeric fields + employment_type (5 categories) + previous_loan
/// (2 categories) = 4 + 6 + 3 = 13 output columns.
fn fixture_columns() -> Vec<FittedColumn> {
    vec![
        FittedColumn {
            name: "age".into(),
            required: true,
            encoder: ColumnEncoder::Numeric {
                mean: 38.0,
                scale: 11.0,
            },
        },
        FittedColumn {
            name: "annual_salary".into(),
            required: true,
            encoder: ColumnEncoder::Numeric {
                mean: 54_000.0,
                scale: 21_000.0,
            },
        },
        FittedColumn {
            name: "loan_amount".into(),
            required: false,
            encoder: ColumnEncoder::Numeric {
                mean: 220_000.0,
                scale: 150_000.0,
            },
        },
        FittedColumn {
            name: "credit_score".into(),
            required: false,
            encoder: ColumnEncoder::Numeric {
                mean: 680.0,
                scale: 75.0,
            },
        },
        FittedColumn {
            name: "employment_type".into(),
            required: false,
            encoder: ColumnEncoder::Categorical {
                categories: vec![
                    "salaried".into(),
                    "self-employed".into(),
                    "business".into(),
                    "student".into(),
                    "unemployed".into(),
                ],
            },
        },
        FittedColumn {
            name: "previous_loan".into(),
            required: false,
            encoder: ColumnEncoder::Categorical {
                categories: vec!["yes".into(), "no".into()],
            },
        },
    ]
}

/// Logistic weights over the 13 fixture columns.
fn fixture_weights() -> Vec<f32> {
    vec![
        // age, annual_salary, loan_amount, credit_score
        0.25, 0.9, -0.6, 1.1, //
        // employment_type one-hot: salaried, self-employed, business,
        // student, unemployed, unknown
        0.4, 0.1, 0.2, -0.5, -1.2, -0.3, //
        // previous_loan one-hot: yes, no, unknown
        0.3, -0.1, 0.0,
    ]
}

/// A small deterministic artifact set for tests.
///
/// Hand-sized: two stumps over the scaled salary and credit columns, a
/// gentle isotonic map, and logistic weights favoring income and credit.
pub fn fixture_artifacts() -> ModelArtifactSet {
    let transformer = FittedTransformer::new(fixture_columns()).unwrap();

    let linear = LogisticModel::new(Array1::from(fixture_weights()), -0.2);

    let calibrator = IsotonicCalibrator::new(
        vec![0.05, 0.25, 0.5, 0.75, 0.95],
        vec![0.02, 0.2, 0.5, 0.8, 0.98],
    )
    .unwrap();

    // Stump on scaled annual_salary (column 1): low salary pulls the
    // margin down, high pushes it up.
    let salary_stump = Tree::new(
        vec![1, 0, 0],
        vec![0.0, 0.0, 0.0],
        vec![1, 0, 0],
        vec![2, 0, 0],
        vec![true, true, true],
        vec![false, true, true],
        vec![0.0, -0.8, 0.9],
    );
    // Stump on scaled credit_score (column 3).
    let credit_stump = Tree::new(
        vec![3, 0, 0],
        vec![-0.5, 0.0, 0.0],
        vec![1, 0, 0],
        vec![2, 0, 0],
        vec![true, true, true],
        vec![false, true, true],
        vec![0.0, -1.1, 0.6],
    );
    let forest = Forest::new(vec![salary_stump, credit_stump], 0.1, 13).unwrap();

    ModelArtifactSet::from_parts(transformer, linear, calibrator, forest)
}

/// A plausible approvable applicant for the fixture artifacts.
pub fn sample_record() -> FeatureRecord {
    FeatureRecord::new()
        .with("age", 34.0)
        .with("annual_salary", 72_000.0)
        .with("loan_amount", 180_000.0)
        .with("credit_score", 735.0)
        .with("employment_type", "salaried")
        .with("previous_loan", "no")
}

/// Write the fixture artifact set to `dir` as the four artifact files.
///
/// Integration tests load from the returned directory and then delete or
/// corrupt individual files to exercise the fatal-startup paths.
pub fn write_fixture_files(dir: &Path) -> std::io::Result<()> {
    let transformer = TransformerSchema {
        version: SCHEMA_VERSION,
        fields: fixture_columns()
            .into_iter()
            .map(|col| FieldSchema {
                name: col.name,
                required: col.required,
                encoder: match col.encoder {
                    ColumnEncoder::Numeric { mean, scale } => EncoderSchema::Numeric {
                        mean: mean as f64,
                        scale: scale as f64,
                    },
                    ColumnEncoder::Categorical { categories } => {
                        EncoderSchema::Categorical { categories }
                    }
                },
            })
            .collect(),
    };

    let logistic = LogisticSchema {
        version: SCHEMA_VERSION,
        weights: fixture_weights().into_iter().map(f64::from).collect(),
        intercept: -0.2,
    };

    let isotonic = IsotonicSchema {
        version: SCHEMA_VERSION,
        thresholds: vec![0.05, 0.25, 0.5, 0.75, 0.95],
        values: vec![0.02, 0.2, 0.5, 0.8, 0.98],
    };

    let gbdt = ForestSchema {
        version: SCHEMA_VERSION,
        n_features: 13,
        base_score: 0.1,
        trees: vec![
            TreeSchema {
                split_indices: vec![1, 0, 0],
                split_thresholds: vec![0.0, 0.0, 0.0],
                children_left: vec![1, 0, 0],
                children_right: vec![2, 0, 0],
                default_left: vec![true, true, true],
                is_leaf: vec![false, true, true],
                leaf_values: vec![0.0, -0.8, 0.9],
            },
            TreeSchema {
                split_indices: vec![3, 0, 0],
                split_thresholds: vec![-0.5, 0.0, 0.0],
                children_left: vec![1, 0, 0],
                children_right: vec![2, 0, 0],
                default_left: vec![true, true, true],
                is_leaf: vec![false, true, true],
                leaf_values: vec![0.0, -1.1, 0.6],
            },
        ],
    };

    write_json(&dir.join(TRANSFORMER_FILE), &transformer)?;
    write_json(&dir.join(LOGISTIC_FILE), &logistic)?;
    write_json(&dir.join(ISOTONIC_FILE), &isotonic)?;
    write_json(&dir.join(GBDT_FILE), &gbdt)?;
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value).expect("fixture schema serializes");
    std::fs::write(path, json)
}

/// Placeholder heuristic scorer.
///
/// A clearly-labeled stub implementing [`EligibilityScorer`] with a fixed
/// probability, kept for wiring up callers before real artifacts exist.
/// Never part of the production pipeline.
#[derive(Debug, Clone)]
pub struct StubScorer {
    /// Probability returned for every record.
    pub probability: f32,
    /// Approval cutoff applied to it.
    pub threshold: f32,
}

impl Default for StubScorer {
    fn default() -> Self {
        Self {
            probability: 0.85,
            threshold: 0.5,
        }
    }
}

impl EligibilityScorer for StubScorer {
    fn score(&self, _record: &FeatureRecord) -> Result<ScoreResult, ScoreError> {
        let decision = if self.probability >= self.threshold {
            Decision::Approved
        } else {
            Decision::Rejected
        };
        Ok(ScoreResult {
            probability: self.probability,
            decision,
        })
    }
}
