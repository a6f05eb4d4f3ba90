//! # Resolved Configuration
//!
//! The output of one resolution: a flat map from field path to narrowed
//! value, plus the variant selected at each decision point traversed. Built
//! fresh per call and never mutated after it is returned.

use std::collections::BTreeMap;

use cfgres_core::{ConfigValue, FieldPath};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ValidationErrors;

/// The variant chosen at one decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Display name of the variant.
    pub variant: String,
    /// Discriminant value that selects it.
    pub discriminant: String,
}

/// Flat, typed configuration produced by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    values: BTreeMap<FieldPath, ConfigValue>,
    selections: BTreeMap<FieldPath, Selection>,
}

impl ResolvedConfig {
    pub(crate) fn new(
        values: BTreeMap<FieldPath, ConfigValue>,
        selections: BTreeMap<FieldPath, Selection>,
    ) -> Self {
        Self { values, selections }
    }

    /// Value at a dot-separated path.
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        let path: FieldPath = path.parse().ok()?;
        self.values.get(&path)
    }

    /// Name of the variant selected by the discriminant at `path`.
    pub fn selected_variant(&self, discriminant_path: &str) -> Option<&str> {
        let path: FieldPath = discriminant_path.parse().ok()?;
        self.selections.get(&path).map(|s| s.variant.as_str())
    }

    /// All values, ordered by path.
    pub fn values(&self) -> &BTreeMap<FieldPath, ConfigValue> {
        &self.values
    }

    /// Selections keyed by discriminant path.
    pub fn selections(&self) -> &BTreeMap<FieldPath, Selection> {
        &self.selections
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rebuild the nested JSON object the paths describe.
    pub fn to_json(&self) -> Value {
        nest(self.values.iter().map(|(path, value)| (path, value.to_json())))
    }
}

/// Result of resolving one payload.
///
/// When `errors` is non-empty the config is advisory only: it holds what
/// could be resolved, but downstream code must not act on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub config: ResolvedConfig,
    pub errors: ValidationErrors,
}

impl Resolution {
    /// True when no finding was reported.
    pub fn is_usable(&self) -> bool {
        self.errors.is_empty()
    }

    /// The config, or every finding if there was at least one.
    pub fn into_result(self) -> Result<ResolvedConfig, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.config)
        } else {
            Err(self.errors)
        }
    }
}

/// Fold `(path, value)` pairs into a nested object. Intermediate segments
/// become objects; a deeper path replaces a non-object at its prefix.
pub(crate) fn nest<'a>(entries: impl Iterator<Item = (&'a FieldPath, Value)>) -> Value {
    let mut root = Map::new();
    for (path, value) in entries {
        insert(&mut root, path.segments(), value);
    }
    Value::Object(root)
}

fn insert(object: &mut Map<String, Value>, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            object.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let slot = object
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(inner) = slot {
                insert(inner, rest, value);
            } else {
                let mut inner = Map::new();
                insert(&mut inner, rest, value);
                *slot = Value::Object(inner);
            }
        }
    }
}
