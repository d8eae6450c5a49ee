//! Applicant field schema.
//!
//! The fitted transformer fixes which fields exist, their coarse kind, and
//! whether they are required. The normalizer consumes this schema to fill
//! defaults and reject coarse-type mismatches before encoding.

use serde::{Deserialize, Serialize};

use crate::record::FieldValue;

/// Coarse kind of an application field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Scaled numeric feature (age, salary, credit score, ...).
    Numeric,
    /// One-hot encoded categorical feature (employment type, ...).
    Categorical,
}

impl FieldKind {
    /// Documented default used when an optional field is absent:
    /// 0 for numerics, the empty string for categoricals.
    ///
    /// The empty string is never a fitted category, so a defaulted
    /// categorical routes to the unknown bucket downstream.
    pub fn default_value(self) -> FieldValue {
        match self {
            Self::Numeric => FieldValue::Number(0.0),
            Self::Categorical => FieldValue::Text(String::new()),
        }
    }

    /// Whether a value is coarse-type compatible with this kind.
    ///
    /// Flags count as numeric (coerced to 0/1 when encoding).
    pub fn accepts(self, value: &FieldValue) -> bool {
        match self {
            Self::Numeric => !matches!(value, FieldValue::Text(_)),
            Self::Categorical => matches!(value, FieldValue::Text(_)),
        }
    }
}

/// One field of the applicant schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears in the record.
    pub name: String,
    /// Coarse kind.
    pub kind: FieldKind,
    /// Required fields reject coarse-type mismatches; optional fields
    /// fall back to the default instead.
    pub required: bool,
}

impl FieldSpec {
    pub fn numeric(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Numeric,
            required,
        }
    }

    pub fn categorical(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Categorical,
            required,
        }
    }
}
