//! # Secret Marker
//!
//! Tags every resolved value as sensitive or not so that downstream code can
//! redact it. Tagging is additive: it never changes values or findings.
//!
//! A path is secret when the field declared at that path, reached through
//! the variants that were actually selected, carries the secret flag.
//! Discriminants and passthrough values are never secret.

use std::collections::{BTreeMap, BTreeSet};

use cfgres_core::{ConfigValue, FieldPath};
use cfgres_schema::{DecisionPoint, FieldSpec, Schema};
use serde::Serialize;
use serde_json::Value;

use crate::config::{nest, ResolvedConfig, Selection};

/// Placeholder rendered in place of secret values.
pub const REDACTED: &str = "**********";

/// A resolved value with its sensitivity tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedValue {
    pub value: ConfigValue,
    pub secret: bool,
}

/// A resolved configuration whose values carry secret tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedConfig {
    values: BTreeMap<FieldPath, TaggedValue>,
    selections: BTreeMap<FieldPath, Selection>,
}

impl TaggedConfig {
    /// Tagged value at a dot-separated path.
    pub fn get(&self, path: &str) -> Option<&TaggedValue> {
        let path: FieldPath = path.parse().ok()?;
        self.values.get(&path)
    }

    /// True when a value exists at `path` and is secret.
    pub fn is_secret(&self, path: &str) -> bool {
        self.get(path).is_some_and(|v| v.secret)
    }

    /// Paths of secret values, ordered.
    pub fn secret_paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.values
            .iter()
            .filter(|(_, v)| v.secret)
            .map(|(path, _)| path)
    }

    pub fn values(&self) -> &BTreeMap<FieldPath, TaggedValue> {
        &self.values
    }

    pub fn selections(&self) -> &BTreeMap<FieldPath, Selection> {
        &self.selections
    }

    /// Nested JSON with secret values in the clear.
    pub fn to_json(&self) -> Value {
        nest(self.values.iter().map(|(path, v)| (path, v.value.to_json())))
    }

    /// Nested JSON with every secret value replaced by [`REDACTED`].
    /// Safe to print or log.
    pub fn redacted_json(&self) -> Value {
        nest(self.values.iter().map(|(path, v)| (path, redact(v))))
    }

    /// One `path = value` line per value, secrets redacted.
    pub fn redacted_lines(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|(path, v)| format!("{path} = {}", redact(v)))
            .collect()
    }
}

fn redact(tagged: &TaggedValue) -> Value {
    if tagged.secret {
        Value::String(REDACTED.to_string())
    } else {
        tagged.value.to_json()
    }
}

/// Tag every value of `config` using the field declarations of `schema`.
pub fn mark(config: &ResolvedConfig, schema: &Schema) -> TaggedConfig {
    let mut secrets = BTreeSet::new();
    collect(
        &FieldPath::root(),
        schema.fields(),
        schema.decision_points(),
        config.selections(),
        &mut secrets,
    );

    let values = config
        .values()
        .iter()
        .map(|(path, value)| {
            let tagged = TaggedValue {
                value: value.clone(),
                secret: secrets.contains(path),
            };
            (path.clone(), tagged)
        })
        .collect();

    TaggedConfig {
        values,
        selections: config.selections().clone(),
    }
}

/// Collect secret field paths declared in one object, following selections.
fn collect(
    scope: &FieldPath,
    fields: &[FieldSpec],
    points: &[DecisionPoint],
    selections: &BTreeMap<FieldPath, Selection>,
    secrets: &mut BTreeSet<FieldPath>,
) {
    secrets.extend(
        fields
            .iter()
            .filter(|f| f.is_secret())
            .map(|f| scope.child(f.name())),
    );

    for point in points {
        let Some(selection) = selections.get(&point.discriminant_path(scope)) else {
            continue;
        };
        let Some(variant) = point
            .variants()
            .iter()
            .find(|v| v.discriminant() == selection.discriminant)
        else {
            continue;
        };
        collect(
            &point.object_path(scope),
            variant.fields(),
            variant.decision_points(),
            selections,
            secrets,
        );
    }
}
