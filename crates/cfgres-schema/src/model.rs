//! # Schema Model
//!
//! In-memory representation of a connector's configuration schema: flat
//! fields plus discriminated-union decision points. Each decision point names
//! a discriminant field and an ordered, closed set of variants; each variant
//! carries its own fields and may nest further decision points.
//!
//! ## Construction Invariant
//!
//! A [`Schema`] can only be obtained from [`SchemaBuilder::build`], which
//! rejects malformed schemas (duplicate discriminants, required fields with
//! defaults, defaults that fail their own constraints, ...). Once built, a
//! schema is immutable and can be shared across threads for any number of
//! resolution calls.

use std::collections::BTreeSet;
use std::fmt;

use cfgres_core::{ConfigValue, FieldKind, FieldPath};

use crate::error::SchemaError;

/// Value constraints attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    /// Inclusive lower bound for integer fields.
    pub minimum: Option<i64>,
    /// Inclusive upper bound for integer fields.
    pub maximum: Option<i64>,
    /// Closed set of allowed values. Matching is exact and case-sensitive;
    /// the empty string is a legal member when listed.
    pub allowed: Option<Vec<ConfigValue>>,
}

/// A value that violates a field's [`Constraints`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Integer below the declared minimum.
    BelowMinimum {
        /// The offending value.
        value: i64,
        /// The declared minimum.
        minimum: i64,
    },
    /// Integer above the declared maximum.
    AboveMaximum {
        /// The offending value.
        value: i64,
        /// The declared maximum.
        maximum: i64,
    },
    /// Value not in the allowed set.
    NotAllowed {
        /// The offending value.
        value: ConfigValue,
        /// The allowed set.
        allowed: Vec<ConfigValue>,
    },
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum { value, minimum } => {
                write!(f, "value {value} is below the minimum of {minimum}")
            }
            Self::AboveMaximum { value, maximum } => {
                write!(f, "value {value} is above the maximum of {maximum}")
            }
            Self::NotAllowed { value, allowed } => {
                write!(f, "value {value} is not one of [")?;
                for (i, member) in allowed.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Declaration of a single configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    required: bool,
    default: Option<ConfigValue>,
    constraints: Constraints,
    secret: bool,
    description: Option<String>,
}

impl FieldSpec {
    /// An optional field of `kind` with no default and no constraints.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            constraints: Constraints::default(),
            secret: false,
            description: None,
        }
    }

    /// Shorthand for `FieldSpec::new(name, FieldKind::String)`.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Shorthand for `FieldSpec::new(name, FieldKind::Integer)`.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// Shorthand for `FieldSpec::new(name, FieldKind::Boolean)`.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Shorthand for `FieldSpec::new(name, FieldKind::Object)`.
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Object)
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declare a default applied when the field is absent.
    pub fn with_default(mut self, value: impl Into<ConfigValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Inclusive lower bound (integer fields only).
    pub fn with_minimum(mut self, minimum: i64) -> Self {
        self.constraints.minimum = Some(minimum);
        self
    }

    /// Inclusive upper bound (integer fields only).
    pub fn with_maximum(mut self, maximum: i64) -> Self {
        self.constraints.maximum = Some(maximum);
        self
    }

    /// Restrict the field to a closed set of values.
    pub fn with_allowed<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ConfigValue>,
    {
        self.constraints.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Mark the field as sensitive.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Attach a human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Key of the field in its payload object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value kind accepted by this field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether the field must be present in the payload.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Value used when the field is absent.
    pub fn default_value(&self) -> Option<&ConfigValue> {
        self.default.as_ref()
    }

    /// Range and membership constraints.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Whether the field's value must be redacted.
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// Human-readable description, if declared.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Check a value of this field's kind against its constraints.
    ///
    /// Range is checked before membership, so a value that violates both
    /// reports the range violation.
    pub fn check_constraints(&self, value: &ConfigValue) -> Result<(), ConstraintViolation> {
        if let Some(n) = value.as_i64() {
            if let Some(minimum) = self.constraints.minimum {
                if n < minimum {
                    return Err(ConstraintViolation::BelowMinimum { value: n, minimum });
                }
            }
            if let Some(maximum) = self.constraints.maximum {
                if n > maximum {
                    return Err(ConstraintViolation::AboveMaximum { value: n, maximum });
                }
            }
        }
        if let Some(allowed) = &self.constraints.allowed {
            if !allowed.contains(value) {
                return Err(ConstraintViolation::NotAllowed {
                    value: value.clone(),
                    allowed: allowed.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Where a decision point's discriminant and variant fields live in the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Inside the enclosing object, next to its own fields.
    Inline,
    /// Inside the object stored under this key of the enclosing object.
    At(String),
}

/// One selectable branch of a decision point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    name: String,
    discriminant: String,
    fields: Vec<FieldSpec>,
    decision_points: Vec<DecisionPoint>,
    additional_properties: Option<bool>,
}

impl VariantSpec {
    /// A variant labelled `name`, selected when the discriminant equals `discriminant`.
    pub fn new(name: impl Into<String>, discriminant: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            discriminant: discriminant.into(),
            fields: Vec::new(),
            decision_points: Vec::new(),
            additional_properties: None,
        }
    }

    /// Declare a field populated when this variant is selected.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare several fields at once.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Nest a decision point inside this variant.
    pub fn with_decision_point(mut self, point: DecisionPoint) -> Self {
        self.decision_points.push(point);
        self
    }

    /// Override the additional-properties policy of the object this variant populates.
    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    /// Human-readable variant label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Discriminant value that selects this variant.
    pub fn discriminant(&self) -> &str {
        &self.discriminant
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Nested decision points, in declaration order.
    pub fn decision_points(&self) -> &[DecisionPoint] {
        &self.decision_points
    }

    /// `None` inherits the enclosing policy.
    pub fn additional_properties(&self) -> Option<bool> {
        self.additional_properties
    }
}

/// A location where one discriminant selects exactly one of several variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionPoint {
    discriminant: String,
    location: Location,
    variants: Vec<VariantSpec>,
    default_variant: Option<String>,
}

impl DecisionPoint {
    /// A decision point whose discriminant sits in the enclosing object.
    pub fn inline(discriminant: impl Into<String>) -> Self {
        Self {
            discriminant: discriminant.into(),
            location: Location::Inline,
            variants: Vec::new(),
            default_variant: None,
        }
    }

    /// A decision point stored as an object under `key` of the enclosing object.
    pub fn at(key: impl Into<String>, discriminant: impl Into<String>) -> Self {
        Self {
            discriminant: discriminant.into(),
            location: Location::At(key.into()),
            variants: Vec::new(),
            default_variant: None,
        }
    }

    /// Append a variant. Declaration order is match order.
    pub fn with_variant(mut self, variant: VariantSpec) -> Self {
        self.variants.push(variant);
        self
    }

    /// Declare the variant selected when the discriminant is absent.
    ///
    /// Takes the variant's discriminant value. Absence is only tolerated when
    /// declared here; it is never inferred.
    pub fn with_default_variant(mut self, discriminant: impl Into<String>) -> Self {
        self.default_variant = Some(discriminant.into());
        self
    }

    /// Name of the discriminant key.
    pub fn discriminant(&self) -> &str {
        &self.discriminant
    }

    /// Where the discriminant and variant fields live.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Variants in declaration order, which is also match order.
    pub fn variants(&self) -> &[VariantSpec] {
        &self.variants
    }

    /// The variant selected when the discriminant is absent, if one is declared.
    pub fn default_variant(&self) -> Option<&VariantSpec> {
        let value = self.default_variant.as_deref()?;
        self.variants.iter().find(|v| v.discriminant == value)
    }

    /// Path of the payload object holding the discriminant, given the
    /// path of the enclosing object.
    pub fn object_path(&self, enclosing: &FieldPath) -> FieldPath {
        match &self.location {
            Location::Inline => enclosing.clone(),
            Location::At(key) => enclosing.child(key.as_str()),
        }
    }

    /// Path of the discriminant field, given the path of the enclosing object.
    pub fn discriminant_path(&self, enclosing: &FieldPath) -> FieldPath {
        self.object_path(enclosing).child(self.discriminant.as_str())
    }
}

/// A connector's complete, validated configuration schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    decision_points: Vec<DecisionPoint>,
    additional_properties: bool,
}

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Root fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Root decision points, in declaration order.
    pub fn decision_points(&self) -> &[DecisionPoint] {
        &self.decision_points
    }

    /// Whether undeclared top-level payload fields are passed through.
    pub fn additional_properties(&self) -> bool {
        self.additional_properties
    }
}

/// Builder for [`Schema`]. All structural checks run in [`SchemaBuilder::build`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
    decision_points: Vec<DecisionPoint>,
    additional_properties: bool,
    allow_overlapping_discriminants: bool,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            decision_points: Vec::new(),
            additional_properties: true,
            allow_overlapping_discriminants: false,
        }
    }
}

impl SchemaBuilder {
    /// Declare a root field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare several root fields at once.
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Declare a root decision point.
    pub fn decision_point(mut self, point: DecisionPoint) -> Self {
        self.decision_points.push(point);
        self
    }

    /// Root additional-properties policy. Defaults to `true`.
    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = allowed;
        self
    }

    /// Accept decision points whose variants share a discriminant value.
    ///
    /// The first declared variant wins at match time. A warning is logged
    /// for every overlap found.
    pub fn allow_overlapping_discriminants(mut self) -> Self {
        self.allow_overlapping_discriminants = true;
        self
    }

    /// Validate the structure and produce an immutable [`Schema`].
    pub fn build(self) -> Result<Schema, SchemaError> {
        let checker = Checker {
            allow_overlapping_discriminants: self.allow_overlapping_discriminants,
        };
        let mut taken = BTreeSet::new();
        checker.check_scope(
            &FieldPath::root(),
            &self.fields,
            &self.decision_points,
            &mut taken,
        )?;
        Ok(Schema {
            fields: self.fields,
            decision_points: self.decision_points,
            additional_properties: self.additional_properties,
        })
    }
}

struct Checker {
    allow_overlapping_discriminants: bool,
}

impl Checker {
    /// Check one payload object. `taken` holds the keys already claimed in
    /// that object (fields, discriminants, decision point locations).
    fn check_scope(
        &self,
        scope: &FieldPath,
        fields: &[FieldSpec],
        points: &[DecisionPoint],
        taken: &mut BTreeSet<String>,
    ) -> Result<(), SchemaError> {
        for field in fields {
            let path = scope.child(field.name());
            claim(scope, field.name(), taken)?;
            check_field(&path, field)?;
        }

        for point in points {
            self.check_point(scope, point, taken)?;
        }
        Ok(())
    }

    fn check_point(
        &self,
        scope: &FieldPath,
        point: &DecisionPoint,
        taken: &mut BTreeSet<String>,
    ) -> Result<(), SchemaError> {
        let path = point.discriminant_path(scope);
        if point.variants.is_empty() {
            return Err(SchemaError::EmptyDecisionPoint {
                path: path.to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for variant in &point.variants {
            if !seen.insert(variant.discriminant()) {
                if !self.allow_overlapping_discriminants {
                    return Err(SchemaError::DuplicateDiscriminant {
                        path: path.to_string(),
                        value: variant.discriminant().to_string(),
                    });
                }
                tracing::warn!(
                    path = %path,
                    value = variant.discriminant(),
                    variant = variant.name(),
                    "overlapping discriminant value; variant is unreachable"
                );
            }
        }

        if let Some(value) = &point.default_variant {
            if !seen.contains(value.as_str()) {
                return Err(SchemaError::UnknownDefaultVariant {
                    path: path.to_string(),
                    value: value.clone(),
                });
            }
        }

        match &point.location {
            Location::Inline => {
                claim(scope, point.discriminant(), taken)?;
                // Sibling variants never coexist, so each branch only
                // competes with the keys of the enclosing object. Any branch
                // can coexist with later inline points of the same object,
                // so the union of their keys is claimed afterwards.
                let mut claimed = BTreeSet::new();
                for variant in &point.variants {
                    let mut branch = taken.clone();
                    self.check_scope(scope, variant.fields(), variant.decision_points(), &mut branch)?;
                    claimed.extend(branch.into_iter().filter(|key| !taken.contains(key)));
                }
                taken.extend(claimed);
            }
            Location::At(key) => {
                claim(scope, key, taken)?;
                let inner = scope.child(key.as_str());
                for variant in &point.variants {
                    let mut branch = BTreeSet::new();
                    claim(&inner, point.discriminant(), &mut branch)?;
                    self.check_scope(&inner, variant.fields(), variant.decision_points(), &mut branch)?;
                }
            }
        }
        Ok(())
    }
}

fn claim(scope: &FieldPath, key: &str, taken: &mut BTreeSet<String>) -> Result<(), SchemaError> {
    if key.is_empty() {
        return Err(SchemaError::EmptyName {
            scope: scope.to_string(),
        });
    }
    if key.contains(FieldPath::SEPARATOR) {
        return Err(SchemaError::SeparatorInName {
            scope: scope.to_string(),
            key: key.to_string(),
        });
    }
    if !taken.insert(key.to_string()) {
        return Err(SchemaError::DuplicateKey {
            scope: scope.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}

fn check_field(path: &FieldPath, field: &FieldSpec) -> Result<(), SchemaError> {
    let name = path.to_string();
    let constraints = &field.constraints;

    if constraints.minimum.is_some() || constraints.maximum.is_some() {
        if field.kind != FieldKind::Integer {
            return Err(SchemaError::RangeOnNonInteger {
                field: name,
                kind: field.kind,
            });
        }
        if let (Some(minimum), Some(maximum)) = (constraints.minimum, constraints.maximum) {
            if minimum > maximum {
                return Err(SchemaError::InvertedRange {
                    field: name,
                    minimum,
                    maximum,
                });
            }
        }
    }

    if let Some(allowed) = &constraints.allowed {
        if !matches!(field.kind, FieldKind::String | FieldKind::Integer) {
            return Err(SchemaError::EnumOnUnsupportedKind {
                field: name,
                kind: field.kind,
            });
        }
        if allowed.is_empty() {
            return Err(SchemaError::EmptyEnum { field: name });
        }
        if let Some(member) = allowed.iter().find(|m| m.kind() != Some(field.kind)) {
            return Err(SchemaError::EnumMemberKindMismatch {
                field: name,
                kind: field.kind,
                member: member.to_string(),
            });
        }
    }

    if let Some(default) = &field.default {
        if field.required {
            return Err(SchemaError::RequiredWithDefault { field: name });
        }
        if default.kind() != Some(field.kind) {
            return Err(SchemaError::DefaultKindMismatch {
                field: name,
                kind: field.kind,
                default: default.to_string(),
            });
        }
        if let Err(violation) = field.check_constraints(default) {
            return Err(SchemaError::DefaultViolatesConstraints {
                field: name,
                reason: violation.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encryption() -> DecisionPoint {
        DecisionPoint::at("encryption", "encryption_type")
            .with_variant(VariantSpec::new("No encryption", "none"))
            .with_variant(
                VariantSpec::new("AES-CBC envelope encryption", "aes_cbc_envelope")
                    .with_field(FieldSpec::string("key_encrypting_key").secret()),
            )
            .with_default_variant("none")
    }

    #[test]
    fn builds_nested_schema() {
        let schema = Schema::builder()
            .field(FieldSpec::string("host").required())
            .field(FieldSpec::integer("port").with_default(5439_i64).with_minimum(0).with_maximum(65536))
            .decision_point(
                DecisionPoint::inline("method")
                    .with_variant(VariantSpec::new("Standard", "Standard"))
                    .with_variant(
                        VariantSpec::new("S3 Staging", "S3 Staging")
                            .with_field(FieldSpec::string("s3_bucket_name").required())
                            .with_decision_point(encryption()),
                    ),
            )
            .build()
            .unwrap();

        assert_eq!(schema.fields().len(), 2);
        assert!(schema.additional_properties());
        let point = &schema.decision_points()[0];
        assert_eq!(point.variants().len(), 2);
        let nested = &point.variants()[1].decision_points()[0];
        assert_eq!(nested.default_variant().map(VariantSpec::name), Some("No encryption"));
        assert_eq!(
            nested.discriminant_path(&FieldPath::root()).to_string(),
            "encryption.encryption_type"
        );
    }

    #[test]
    fn rejects_duplicate_discriminants() {
        let err = Schema::builder()
            .decision_point(
                DecisionPoint::inline("method")
                    .with_variant(VariantSpec::new("A", "x"))
                    .with_variant(VariantSpec::new("B", "x")),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateDiscriminant { ref value, .. } if value == "x"));
    }

    #[test]
    fn overlapping_discriminants_can_be_opted_into() {
        let schema = Schema::builder()
            .decision_point(
                DecisionPoint::inline("method")
                    .with_variant(VariantSpec::new("A", "x"))
                    .with_variant(VariantSpec::new("B", "x")),
            )
            .allow_overlapping_discriminants()
            .build();
        assert!(schema.is_ok());
    }

    #[test]
    fn rejects_required_field_with_default() {
        let err = Schema::builder()
            .field(FieldSpec::string("schema").required().with_default("public"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::RequiredWithDefault { ref field } if field == "schema"));
    }

    #[test]
    fn rejects_defaults_that_fail_their_own_field() {
        let err = Schema::builder()
            .field(FieldSpec::integer("port").with_default("5439"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DefaultKindMismatch { .. }));

        let err = Schema::builder()
            .field(FieldSpec::integer("port").with_maximum(10).with_default(11_i64))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DefaultViolatesConstraints { .. }));

        let err = Schema::builder()
            .field(FieldSpec::string("region").with_allowed(["us-east-1"]).with_default("eu"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DefaultViolatesConstraints { .. }));
    }

    #[test]
    fn rejects_bad_constraints() {
        assert!(matches!(
            Schema::builder()
                .field(FieldSpec::integer("n").with_minimum(5).with_maximum(1))
                .build(),
            Err(SchemaError::InvertedRange { .. })
        ));
        assert!(matches!(
            Schema::builder()
                .field(FieldSpec::string("s").with_minimum(1))
                .build(),
            Err(SchemaError::RangeOnNonInteger { .. })
        ));
        assert!(matches!(
            Schema::builder()
                .field(FieldSpec::boolean("b").with_allowed([true]))
                .build(),
            Err(SchemaError::EnumOnUnsupportedKind { .. })
        ));
        assert!(matches!(
            Schema::builder()
                .field(FieldSpec::string("s").with_allowed([ConfigValue::from(1_i64)]))
                .build(),
            Err(SchemaError::EnumMemberKindMismatch { .. })
        ));
        assert!(matches!(
            Schema::builder()
                .field(FieldSpec::string("s").with_allowed(Vec::<&str>::new()))
                .build(),
            Err(SchemaError::EmptyEnum { .. })
        ));
    }

    #[test]
    fn empty_string_enum_member_is_legal() {
        let schema = Schema::builder()
            .field(FieldSpec::string("s3_bucket_region").with_allowed(["", "us-east-1"]).with_default(""))
            .build();
        assert!(schema.is_ok());
    }

    #[test]
    fn rejects_key_collisions_in_one_object() {
        let err = Schema::builder()
            .field(FieldSpec::string("method"))
            .decision_point(DecisionPoint::inline("method").with_variant(VariantSpec::new("A", "a")))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKey { ref key, .. } if key == "method"));

        let err = Schema::builder()
            .field(FieldSpec::string("host"))
            .decision_point(
                DecisionPoint::inline("method")
                    .with_variant(VariantSpec::new("A", "a").with_field(FieldSpec::string("host"))),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKey { .. }));
    }

    #[test]
    fn rejects_key_collisions_across_inline_points() {
        let err = Schema::builder()
            .decision_point(
                DecisionPoint::inline("auth")
                    .with_variant(VariantSpec::new("Open", "open"))
                    .with_variant(VariantSpec::new("Key", "key").with_field(FieldSpec::string("token"))),
            )
            .decision_point(
                DecisionPoint::inline("mode")
                    .with_variant(VariantSpec::new("Fast", "fast").with_field(FieldSpec::integer("token"))),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKey { ref key, .. } if key == "token"));

        let err = Schema::builder()
            .decision_point(
                DecisionPoint::inline("auth")
                    .with_variant(VariantSpec::new("Key", "key").with_field(FieldSpec::string("mode"))),
            )
            .decision_point(DecisionPoint::inline("mode").with_variant(VariantSpec::new("Fast", "fast")))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKey { ref key, .. } if key == "mode"));
    }

    #[test]
    fn inline_points_with_disjoint_keys_coexist() {
        let schema = Schema::builder()
            .decision_point(
                DecisionPoint::inline("auth")
                    .with_variant(VariantSpec::new("A", "a").with_field(FieldSpec::string("token")))
                    .with_variant(VariantSpec::new("B", "b").with_field(FieldSpec::string("token"))),
            )
            .decision_point(
                DecisionPoint::inline("mode")
                    .with_variant(VariantSpec::new("Fast", "fast").with_field(FieldSpec::integer("workers"))),
            )
            .build();
        assert!(schema.is_ok());
    }

    #[test]
    fn rejects_names_containing_the_path_separator() {
        let err = Schema::builder()
            .field(FieldSpec::string("a.b").required())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::SeparatorInName { ref key, .. } if key == "a.b"));

        assert!(matches!(
            Schema::builder()
                .decision_point(DecisionPoint::inline("auth.type").with_variant(VariantSpec::new("A", "a")))
                .build(),
            Err(SchemaError::SeparatorInName { .. })
        ));
        assert!(matches!(
            Schema::builder()
                .decision_point(
                    DecisionPoint::at("tunnel.method", "tunnel_method")
                        .with_variant(VariantSpec::new("None", "NO_TUNNEL")),
                )
                .build(),
            Err(SchemaError::SeparatorInName { .. })
        ));
    }

    #[test]
    fn sibling_variants_may_reuse_field_names() {
        let schema = Schema::builder()
            .decision_point(
                DecisionPoint::inline("auth")
                    .with_variant(VariantSpec::new("A", "a").with_field(FieldSpec::string("token")))
                    .with_variant(VariantSpec::new("B", "b").with_field(FieldSpec::string("token"))),
            )
            .build();
        assert!(schema.is_ok());
    }

    #[test]
    fn rejects_empty_and_dangling_decision_points() {
        assert!(matches!(
            Schema::builder().decision_point(DecisionPoint::inline("method")).build(),
            Err(SchemaError::EmptyDecisionPoint { .. })
        ));
        assert!(matches!(
            Schema::builder()
                .decision_point(
                    DecisionPoint::at("encryption", "encryption_type")
                        .with_variant(VariantSpec::new("None", "none"))
                        .with_default_variant("rot13"),
                )
                .build(),
            Err(SchemaError::UnknownDefaultVariant { .. })
        ));
    }

    #[test]
    fn constraint_violation_messages() {
        let field = FieldSpec::string("region").with_allowed(["", "us-west-2"]);
        let err = field.check_constraints(&ConfigValue::from("US-WEST-2")).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"value "US-WEST-2" is not one of ["", "us-west-2"]"#
        );
        let port = FieldSpec::integer("port").with_minimum(0).with_maximum(65536);
        assert_eq!(
            port.check_constraints(&ConfigValue::from(70000_i64)).unwrap_err().to_string(),
            "value 70000 is above the maximum of 65536"
        );
    }
}
