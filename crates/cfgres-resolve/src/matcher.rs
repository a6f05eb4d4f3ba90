//! # Variant Matcher
//!
//! Picks the variant a payload object selects at one decision point.

use cfgres_schema::{DecisionPoint, VariantSpec};
use serde_json::{Map, Value};

/// Why no variant could be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFailure {
    /// The discriminant is absent and no default variant is declared.
    MissingDiscriminant {
        /// Discriminant values of the declared variants.
        expected: Vec<String>,
    },
    /// The discriminant is present but equals no variant's value.
    UnknownVariant {
        /// The offending raw value, rendered as JSON.
        found: String,
        /// Discriminant values of the declared variants.
        expected: Vec<String>,
    },
}

impl MatchFailure {
    /// Detail line for a validation finding.
    pub fn detail(&self, discriminant: &str) -> String {
        match self {
            Self::MissingDiscriminant { expected } => format!(
                "discriminant {discriminant:?} is missing; expected one of {}",
                render_list(expected)
            ),
            Self::UnknownVariant { found, expected } => format!(
                "value {found} selects no variant; expected one of {}",
                render_list(expected)
            ),
        }
    }
}

/// Select the variant of `point` chosen by `object`.
///
/// Variants are compared in declaration order and the first exact,
/// case-sensitive match wins. A discriminant that is not a string never
/// matches.
pub fn match_variant<'s>(
    point: &'s DecisionPoint,
    object: &Map<String, Value>,
) -> Result<&'s VariantSpec, MatchFailure> {
    match object.get(point.discriminant()) {
        None => point
            .default_variant()
            .ok_or_else(|| MatchFailure::MissingDiscriminant {
                expected: expected(point),
            }),
        Some(raw) => raw
            .as_str()
            .and_then(|value| point.variants().iter().find(|v| v.discriminant() == value))
            .ok_or_else(|| MatchFailure::UnknownVariant {
                found: raw.to_string(),
                expected: expected(point),
            }),
    }
}

fn expected(point: &DecisionPoint) -> Vec<String> {
    point
        .variants()
        .iter()
        .map(|v| v.discriminant().to_string())
        .collect()
}

fn render_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgres_schema::{FieldSpec, Schema};
    use serde_json::json;

    fn encryption() -> DecisionPoint {
        DecisionPoint::at("encryption", "encryption_type")
            .with_variant(VariantSpec::new("No encryption", "none"))
            .with_variant(
                VariantSpec::new("AES-CBC envelope encryption", "aes_cbc_envelope")
                    .with_field(FieldSpec::string("key_encrypting_key").secret()),
            )
            .with_default_variant("none")
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn selects_by_exact_value() {
        let point = encryption();
        let variant = match_variant(&point, &object(json!({"encryption_type": "aes_cbc_envelope"}))).unwrap();
        assert_eq!(variant.name(), "AES-CBC envelope encryption");
    }

    #[test]
    fn absent_discriminant_uses_declared_default() {
        let point = encryption();
        let variant = match_variant(&point, &Map::new()).unwrap();
        assert_eq!(variant.name(), "No encryption");
    }

    #[test]
    fn absent_discriminant_without_default_fails() {
        let point = DecisionPoint::inline("method")
            .with_variant(VariantSpec::new("Standard", "Standard"))
            .with_variant(VariantSpec::new("S3 Staging", "S3 Staging"));
        let failure = match_variant(&point, &Map::new()).unwrap_err();
        assert_eq!(
            failure.detail("method"),
            r#"discriminant "method" is missing; expected one of ["Standard", "S3 Staging"]"#
        );
    }

    #[test]
    fn unknown_values_are_reported_verbatim() {
        let point = encryption();
        let failure = match_variant(&point, &object(json!({"encryption_type": "rot13"}))).unwrap_err();
        assert_eq!(
            failure,
            MatchFailure::UnknownVariant {
                found: "\"rot13\"".to_string(),
                expected: vec!["none".to_string(), "aes_cbc_envelope".to_string()],
            }
        );
        assert!(failure.detail("encryption_type").contains("rot13"));
    }

    #[test]
    fn matching_is_case_sensitive_and_string_only() {
        let point = encryption();
        assert!(match_variant(&point, &object(json!({"encryption_type": "NONE"}))).is_err());
        let failure = match_variant(&point, &object(json!({"encryption_type": 1}))).unwrap_err();
        assert!(matches!(failure, MatchFailure::UnknownVariant { ref found, .. } if found == "1"));
        // An explicit null is present, so the default does not apply.
        assert!(match_variant(&point, &object(json!({"encryption_type": null}))).is_err());
    }

    #[test]
    fn first_declared_match_wins() {
        let schema = Schema::builder()
            .decision_point(
                DecisionPoint::inline("mode")
                    .with_variant(VariantSpec::new("First", "x"))
                    .with_variant(VariantSpec::new("Second", "x")),
            )
            .allow_overlapping_discriminants()
            .build()
            .unwrap();
        let point = &schema.decision_points()[0];
        let variant = match_variant(point, &object(json!({"mode": "x"}))).unwrap();
        assert_eq!(variant.name(), "First");
    }
}
