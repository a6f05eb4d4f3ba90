//! # Field Validator
//!
//! Validates the declared fields of one payload object and applies
//! defaults. Every field is checked independently and reports at most one
//! finding, so all problems of an object surface in a single pass.

use std::collections::BTreeSet;

use cfgres_core::{json_type_name, ConfigValue, FieldPath};
use cfgres_schema::{ConstraintViolation, FieldSpec};
use serde_json::{Map, Value};

use crate::error::{ErrorKind, ValidationError};

/// Values and findings produced for one payload object.
#[derive(Debug, Default)]
pub struct FieldReport {
    pub values: Vec<(FieldPath, ConfigValue)>,
    pub errors: Vec<ValidationError>,
}

/// Validate `fields` against `object`, whose path is `scope`.
pub fn validate_fields(fields: &[FieldSpec], object: &Map<String, Value>, scope: &FieldPath) -> FieldReport {
    let mut report = FieldReport::default();
    for field in fields {
        let path = scope.child(field.name());
        match validate_field(field, object.get(field.name()), &path) {
            Ok(Some(value)) => report.values.push((path, value)),
            Ok(None) => {}
            Err(error) => report.errors.push(error),
        }
    }
    report
}

/// Validate one field. `Ok(None)` means absent, optional and without a default.
pub fn validate_field(
    field: &FieldSpec,
    raw: Option<&Value>,
    path: &FieldPath,
) -> Result<Option<ConfigValue>, ValidationError> {
    let Some(raw) = raw else {
        if field.is_required() {
            return Err(ValidationError::new(
                ErrorKind::MissingRequiredField,
                path.clone(),
                "required field is missing",
            ));
        }
        return Ok(field.default_value().cloned());
    };

    let value = ConfigValue::narrow(field.kind(), raw).ok_or_else(|| {
        ValidationError::new(
            ErrorKind::TypeMismatch,
            path.clone(),
            format!("expected {}, found {}", field.kind(), json_type_name(raw)),
        )
    })?;

    field.check_constraints(&value).map_err(|violation| {
        let kind = match violation {
            ConstraintViolation::BelowMinimum { .. } | ConstraintViolation::AboveMaximum { .. } => {
                ErrorKind::OutOfRange
            }
            ConstraintViolation::NotAllowed { .. } => ErrorKind::InvalidEnumValue,
        };
        let detail = if field.is_secret() {
            redacted_detail(&violation)
        } else {
            violation.to_string()
        };
        ValidationError::new(kind, path.clone(), detail)
    })?;

    Ok(Some(value))
}

/// Handle keys of `object` not in `expected`: pass them through when
/// `permissive`, otherwise report each as unexpected.
pub fn check_undeclared(
    object: &Map<String, Value>,
    expected: &BTreeSet<&str>,
    permissive: bool,
    scope: &FieldPath,
) -> FieldReport {
    let mut report = FieldReport::default();
    for (key, raw) in object {
        if expected.contains(key.as_str()) {
            continue;
        }
        let path = scope.child(key.as_str());
        if permissive {
            report.values.push((path, ConfigValue::Passthrough(raw.clone())));
        } else {
            report.errors.push(ValidationError::new(
                ErrorKind::UnexpectedField,
                path,
                "field is not declared and additional properties are not allowed",
            ));
        }
    }
    report
}

fn redacted_detail(violation: &ConstraintViolation) -> String {
    match violation {
        ConstraintViolation::BelowMinimum { minimum, .. } => {
            format!("value is below the minimum of {minimum}")
        }
        ConstraintViolation::AboveMaximum { maximum, .. } => {
            format!("value is above the maximum of {maximum}")
        }
        ConstraintViolation::NotAllowed { .. } => "value is not one of the allowed values".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("host").required(),
            FieldSpec::integer("port").with_default(5439_i64).with_minimum(0).with_maximum(65536),
            FieldSpec::string("s3_bucket_region").with_allowed(["", "us-east-1", "us-west-2"]),
            FieldSpec::boolean("purge_staging_data").with_default(true),
            FieldSpec::string("jdbc_url_params"),
        ]
    }

    fn kinds(report: &FieldReport) -> Vec<(String, ErrorKind)> {
        report
            .errors
            .iter()
            .map(|e| (e.path.to_string(), e.kind))
            .collect()
    }

    #[test]
    fn valid_object_applies_defaults() {
        let report = validate_fields(&fields(), &object(json!({"host": "db"})), &FieldPath::root());
        assert!(report.errors.is_empty());
        let values: Vec<(String, ConfigValue)> = report
            .values
            .into_iter()
            .map(|(p, v)| (p.to_string(), v))
            .collect();
        assert_eq!(
            values,
            vec![
                ("host".to_string(), ConfigValue::from("db")),
                ("port".to_string(), ConfigValue::from(5439_i64)),
                ("purge_staging_data".to_string(), ConfigValue::from(true)),
            ]
        );
    }

    #[test]
    fn reports_every_field_in_one_pass() {
        let payload = object(json!({
            "port": 70000,
            "s3_bucket_region": "US-WEST-2",
            "purge_staging_data": "yes",
        }));
        let report = validate_fields(&fields(), &payload, &FieldPath::root());
        assert_eq!(
            kinds(&report),
            vec![
                ("host".to_string(), ErrorKind::MissingRequiredField),
                ("port".to_string(), ErrorKind::OutOfRange),
                ("s3_bucket_region".to_string(), ErrorKind::InvalidEnumValue),
                ("purge_staging_data".to_string(), ErrorKind::TypeMismatch),
            ]
        );
        assert!(report.values.is_empty());
    }

    #[test]
    fn null_is_present_and_mistyped() {
        let report = validate_fields(
            &fields(),
            &object(json!({"host": "db", "port": null})),
            &FieldPath::root(),
        );
        assert_eq!(kinds(&report), vec![("port".to_string(), ErrorKind::TypeMismatch)]);
        assert_eq!(report.errors[0].detail, "expected integer, found null");
    }

    #[test]
    fn empty_string_is_a_value_not_an_omission() {
        let report = validate_fields(
            &fields(),
            &object(json!({"host": "db", "s3_bucket_region": ""})),
            &FieldPath::root(),
        );
        assert!(report.errors.is_empty());
        assert!(report
            .values
            .iter()
            .any(|(p, v)| p.to_string() == "s3_bucket_region" && v.as_str() == Some("")));
    }

    #[test]
    fn floats_are_not_integers() {
        let field = FieldSpec::integer("port");
        let err = validate_field(&field, Some(&json!(5439.0)), &FieldPath::root().child("port")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.detail, "expected integer, found number");
    }

    #[test]
    fn secret_values_stay_out_of_details() {
        let field = FieldSpec::string("token").with_allowed(["a", "b"]).secret();
        let err = validate_field(&field, Some(&json!("hunter2")), &FieldPath::root().child("token")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidEnumValue);
        assert!(!err.detail.contains("hunter2"));
    }

    #[test]
    fn prefixes_paths_with_scope() {
        let scope = FieldPath::root().child("encryption");
        let report = validate_fields(&[FieldSpec::string("key").required()], &Map::new(), &scope);
        assert_eq!(report.errors[0].path.to_string(), "encryption.key");
    }

    #[test]
    fn undeclared_fields_follow_policy() {
        let payload = object(json!({"host": "db", "extra": [1], "other": null}));
        let expected: BTreeSet<&str> = ["host"].into_iter().collect();

        let strict = check_undeclared(&payload, &expected, false, &FieldPath::root());
        assert_eq!(
            kinds(&strict),
            vec![
                ("extra".to_string(), ErrorKind::UnexpectedField),
                ("other".to_string(), ErrorKind::UnexpectedField),
            ]
        );

        let loose = check_undeclared(&payload, &expected, true, &FieldPath::root());
        assert!(loose.errors.is_empty());
        assert_eq!(loose.values.len(), 2);
        assert_eq!(loose.values[0].1, ConfigValue::Passthrough(json!([1])));
    }
}
