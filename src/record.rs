//! Applicant feature records.
//!
//! A [`FeatureRecord`] is one loan application: a flat mapping from field
//! name to a loosely-typed [`FieldValue`]. The surrounding service hands the
//! pipeline the parsed JSON body as-is; unknown keys are permitted and
//! ignored by downstream stages unless the fitted encoding requires them.
//!
//! Uses `BTreeMap` so iteration order (and serialized JSON) is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One field value from an application record.
///
/// The untagged representation matches the flat JSON bodies the HTTP layer
/// receives: booleans, numbers, and strings, nothing nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag (e.g. `loan_insurance`).
    Flag(bool),
    /// Numeric value (e.g. `annual_salary`). Integers widen to f64.
    Number(f64),
    /// Free-form or categorical text (e.g. `employment_type`).
    Text(String),
}

impl FieldValue {
    /// Coarse type name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Flag(_) => "flag",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }

    /// Numeric view: numbers as-is, flags as 0/1, text is not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(_) => None,
        }
    }

    /// Text view; `None` for non-text values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// One applicant record: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl FeatureRecord {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any existing value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style insert for test and fixture construction.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Whether the record carries a field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, FieldValue)> for FeatureRecord {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
