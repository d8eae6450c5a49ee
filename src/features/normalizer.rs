//! Feature normalization against the applicant schema.
//!
//! Normalization is the tolerant half of input handling: absent fields are
//! never an error. Coarse-type checking is the strict half, and only for
//! required fields.

use crate::error::InvalidInputError;
use crate::record::FeatureRecord;
use crate::schema::{FieldKind, FieldSpec};

/// Normalize a record against the schema fixed by the fitted transformer.
///
/// Rules, in order, per schema field:
///
/// - absent: filled with the documented default (0 for numerics, the empty
///   string for categoricals) — never an error;
/// - present with a compatible coarse type: kept as-is;
/// - present with an incompatible coarse type: [`InvalidInputError`] if the
///   field is required, otherwise replaced by the default.
///
/// Keys not named by the schema pass through untouched; downstream stages
/// ignore them. Key order is preserved. Side-effect free.
pub fn normalize(
    record: &FeatureRecord,
    fields: &[FieldSpec],
) -> Result<FeatureRecord, InvalidInputError> {
    let mut out = record.clone();

    for spec in fields {
        match record.get(&spec.name) {
            None => {
                out.insert(spec.name.clone(), spec.kind.default_value());
            }
            Some(value) if spec.kind.accepts(value) => {}
            Some(value) => {
                if spec.required {
                    return Err(InvalidInputError {
                        field: spec.name.clone(),
                        expected: expected_name(spec.kind),
                        found: value.kind_name(),
                    });
                }
                out.insert(spec.name.clone(), spec.kind.default_value());
            }
        }
    }

    Ok(out)
}

fn expected_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Numeric => "number",
        FieldKind::Categorical => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn schema() -> Vec<FieldSpec> {
        vec![
            FieldSpec::numeric("age", true),
            FieldSpec::numeric("savings_balance", false),
            FieldSpec::categorical("employment_type", true),
            FieldSpec::categorical("loan_purpose", false),
        ]
    }

    #[test]
    fn fills_all_absent_optional_fields() {
        let record = FeatureRecord::new()
            .with("age", 30.0)
            .with("employment_type", "salaried");

        let normalized = normalize(&record, &schema()).unwrap();

        assert_eq!(
            normalized.get("savings_balance"),
            Some(&FieldValue::Number(0.0))
        );
        assert_eq!(
            normalized.get("loan_purpose"),
            Some(&FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn missing_required_field_defaults_rather_than_errors() {
        // Absence is always tolerated; only wrong coarse types error.
        let record = FeatureRecord::new().with("employment_type", "salaried");
        let normalized = normalize(&record, &schema()).unwrap();
        assert_eq!(normalized.get("age"), Some(&FieldValue::Number(0.0)));
    }

    #[test]
    fn required_field_with_wrong_type_errors() {
        let record = FeatureRecord::new()
            .with("age", "twenty-seven")
            .with("employment_type", "salaried");

        let err = normalize(&record, &schema()).unwrap_err();
        assert_eq!(err.field, "age");
        assert_eq!(err.expected, "number");
        assert_eq!(err.found, "text");
    }

    #[test]
    fn optional_field_with_wrong_type_falls_back_to_default() {
        let record = FeatureRecord::new()
            .with("age", 30.0)
            .with("employment_type", "salaried")
            .with("loan_purpose", 7.0);

        let normalized = normalize(&record, &schema()).unwrap();
        assert_eq!(
            normalized.get("loan_purpose"),
            Some(&FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn flags_are_accepted_as_numeric() {
        let record = FeatureRecord::new()
            .with("age", true)
            .with("employment_type", "salaried");
        let normalized = normalize(&record, &schema()).unwrap();
        assert_eq!(normalized.get("age"), Some(&FieldValue::Flag(true)));
    }

    #[test]
    fn unknown_keys_pass_through() {
        let record = FeatureRecord::new()
            .with("age", 30.0)
            .with("employment_type", "salaried")
            .with("shap_top3", "credit_score,dti,age");
        let normalized = normalize(&record, &schema()).unwrap();
        assert!(normalized.contains("shap_top3"));
    }

    #[test]
    fn input_record_is_untouched() {
        let record = FeatureRecord::new().with("employment_type", "salaried");
        let before = record.clone();
        let _ = normalize(&record, &schema()).unwrap();
        assert_eq!(record, before);
    }
}
