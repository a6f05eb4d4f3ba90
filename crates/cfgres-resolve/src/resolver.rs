//! # Resolver
//!
//! Walks a [`Schema`] top-down against a raw payload, selecting one variant
//! at every decision point and validating only the fields of the selected
//! variants.
//!
//! ## Object Scopes
//!
//! Each payload object is one scope. Root fields and inline decision points
//! contribute keys to the enclosing scope; a located decision point opens a
//! new scope for the object under its key. Undeclared keys are checked once
//! per scope, after every inline decision point of that scope has been
//! resolved, because inline variants add keys to the object they sit in.
//! When an inline decision point of a scope fails to match, the scope's
//! expected keys are unknown and the undeclared-key check is skipped.
//!
//! ## Additional Properties
//!
//! A located variant's override replaces the policy it inherits. Overrides
//! of inline variants apply to the enclosing scope: any `false` wins,
//! otherwise any `true`, otherwise the scope keeps its own policy.

use std::collections::{BTreeMap, BTreeSet};

use cfgres_core::{json_type_name, ConfigValue, FieldPath};
use cfgres_schema::{DecisionPoint, FieldSpec, Location, Schema};
use serde_json::{Map, Value};

use crate::config::{ResolvedConfig, Resolution, Selection};
use crate::error::{ErrorKind, ValidationError, ValidationErrors};
use crate::field::{check_undeclared, validate_fields, FieldReport};
use crate::matcher::{match_variant, MatchFailure};

/// Resolve `payload` against `schema`.
///
/// Never fails: every finding is collected in [`Resolution::errors`]. A
/// payload whose root is not an object yields one `type_mismatch` at the
/// root and nothing else.
pub fn resolve(schema: &Schema, payload: &Value) -> Resolution {
    let mut walk = Walk::default();
    match payload {
        Value::Object(object) => {
            walk.object(
                &FieldPath::root(),
                object,
                schema.fields(),
                schema.decision_points(),
                schema.additional_properties(),
                BTreeSet::new(),
            );
        }
        other => walk.errors.push(ValidationError::new(
            ErrorKind::TypeMismatch,
            FieldPath::root(),
            format!("expected object, found {}", json_type_name(other)),
        )),
    }

    tracing::debug!(
        values = walk.values.len(),
        selections = walk.selections.len(),
        errors = walk.errors.len(),
        "resolved configuration"
    );

    Resolution {
        config: ResolvedConfig::new(walk.values, walk.selections),
        errors: ValidationErrors::from(walk.errors),
    }
}

#[derive(Default)]
struct Walk {
    values: BTreeMap<FieldPath, ConfigValue>,
    selections: BTreeMap<FieldPath, Selection>,
    errors: Vec<ValidationError>,
}

/// Bookkeeping for one payload object.
#[derive(Default)]
struct Scope<'a> {
    expected: BTreeSet<&'a str>,
    inline_failed: bool,
    overrides: Vec<bool>,
}

impl Scope<'_> {
    fn policy(&self, inherited: bool) -> bool {
        if self.overrides.contains(&false) {
            false
        } else if self.overrides.contains(&true) {
            true
        } else {
            inherited
        }
    }
}

impl Walk {
    /// Resolve one payload object. `reserved` holds keys already accounted
    /// for (the discriminant of a located decision point).
    fn object<'a>(
        &mut self,
        path: &FieldPath,
        object: &Map<String, Value>,
        fields: &'a [FieldSpec],
        points: &'a [DecisionPoint],
        permissive: bool,
        reserved: BTreeSet<&'a str>,
    ) {
        let mut scope = Scope {
            expected: reserved,
            ..Scope::default()
        };
        self.members(path, object, fields, points, permissive, &mut scope);

        if scope.inline_failed {
            tracing::debug!(path = %path, "skipping undeclared-field check after failed match");
            return;
        }
        let permissive = scope.policy(permissive);
        let report = check_undeclared(object, &scope.expected, permissive, path);
        self.absorb(report);
    }

    /// Validate fields and decision points that live directly in `object`.
    fn members<'a>(
        &mut self,
        path: &FieldPath,
        object: &Map<String, Value>,
        fields: &'a [FieldSpec],
        points: &'a [DecisionPoint],
        permissive: bool,
        scope: &mut Scope<'a>,
    ) {
        scope.expected.extend(fields.iter().map(FieldSpec::name));
        self.absorb(validate_fields(fields, object, path));

        for point in points {
            match point.location() {
                Location::Inline => self.inline(path, object, point, permissive, scope),
                Location::At(key) => {
                    scope.expected.insert(key.as_str());
                    self.located(path, object, key, point, permissive);
                }
            }
        }
    }

    fn inline<'a>(
        &mut self,
        path: &FieldPath,
        object: &Map<String, Value>,
        point: &'a DecisionPoint,
        permissive: bool,
        scope: &mut Scope<'a>,
    ) {
        scope.expected.insert(point.discriminant());
        let discriminant_path = point.discriminant_path(path);
        match match_variant(point, object) {
            Ok(variant) => {
                self.select(discriminant_path, variant.name(), variant.discriminant());
                if let Some(allowed) = variant.additional_properties() {
                    scope.overrides.push(allowed);
                }
                self.members(
                    path,
                    object,
                    variant.fields(),
                    variant.decision_points(),
                    permissive,
                    scope,
                );
            }
            Err(failure) => {
                scope.inline_failed = true;
                self.fail(discriminant_path, point, failure);
            }
        }
    }

    fn located(
        &mut self,
        path: &FieldPath,
        object: &Map<String, Value>,
        key: &str,
        point: &DecisionPoint,
        permissive: bool,
    ) {
        let inner_path = path.child(key);
        let empty = Map::new();
        let inner = match object.get(key) {
            None => &empty,
            Some(Value::Object(inner)) => inner,
            Some(other) => {
                self.errors.push(ValidationError::new(
                    ErrorKind::TypeMismatch,
                    inner_path,
                    format!("expected object, found {}", json_type_name(other)),
                ));
                return;
            }
        };

        let discriminant_path = point.discriminant_path(path);
        match match_variant(point, inner) {
            Ok(variant) => {
                self.select(discriminant_path, variant.name(), variant.discriminant());
                let permissive = variant.additional_properties().unwrap_or(permissive);
                let reserved = BTreeSet::from([point.discriminant()]);
                self.object(
                    &inner_path,
                    inner,
                    variant.fields(),
                    variant.decision_points(),
                    permissive,
                    reserved,
                );
            }
            Err(failure) => self.fail(discriminant_path, point, failure),
        }
    }

    /// Record a selection. The discriminant is emitted as a resolved value,
    /// including when the default variant was applied.
    fn select(&mut self, discriminant_path: FieldPath, variant: &str, discriminant: &str) {
        tracing::debug!(path = %discriminant_path, variant, "selected variant");
        self.values
            .insert(discriminant_path.clone(), ConfigValue::from(discriminant));
        self.selections.insert(
            discriminant_path,
            Selection {
                variant: variant.to_string(),
                discriminant: discriminant.to_string(),
            },
        );
    }

    fn fail(&mut self, discriminant_path: FieldPath, point: &DecisionPoint, failure: MatchFailure) {
        let kind = match failure {
            MatchFailure::MissingDiscriminant { .. } => ErrorKind::MissingDiscriminant,
            MatchFailure::UnknownVariant { .. } => ErrorKind::UnknownVariant,
        };
        let detail = failure.detail(point.discriminant());
        self.errors
            .push(ValidationError::new(kind, discriminant_path, detail));
    }

    fn absorb(&mut self, report: FieldReport) {
        self.values.extend(report.values);
        self.errors.extend(report.errors);
    }
}
