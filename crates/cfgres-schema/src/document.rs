//! # Schema Documents
//!
//! Compiles declarative connector specification documents (JSON or YAML)
//! into [`Schema`] values.
//!
//! ## Accepted Format
//!
//! A document is either an object schema or a wrapper whose
//! `connectionSpecification` member is one. Object schemas use a small
//! subset of JSON Schema:
//!
//! - `properties` / `required` / `additionalProperties` describe fields.
//!   A field listed in `required` that also carries a `default` is optional.
//! - `type` (`string`, `integer`, `boolean`, `object`), `default`, `enum`,
//!   `minimum`, `maximum`, and `airbyte_secret` / `secret` describe one field.
//! - A property carrying `oneOf` becomes a decision point located at that
//!   key; a `oneOf` on the object itself becomes an inline decision point.
//!   The discriminant is the one property that carries a `const` in every
//!   branch. An object-level `default` naming the discriminant declares the
//!   default variant.
//! - Properties are ordered by `order`, then by name.
//!
//! Documents are checked against the bundled
//! `connector-spec.schema.json` meta-schema before compilation, so shape
//! errors are reported with their instance path rather than as compiler
//! failures.

use std::collections::BTreeSet;
use std::path::Path;

use cfgres_core::{ConfigValue, ConnectorId, FieldKind};
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::model::{DecisionPoint, FieldSpec, Schema, VariantSpec};

/// The meta-schema every connector specification must satisfy.
pub const META_SCHEMA: &str = include_str!("../../../schemas/connector-spec.schema.json");

/// Suffixes recognized by [`load_dir`], longest first.
const SPEC_SUFFIXES: &[&str] = &[".spec.json", ".spec.yaml", ".spec.yml"];

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from a file extension. Anything but `yaml`/`yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// A parsed, not yet compiled, connector specification.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    name: String,
    value: Value,
}

impl SchemaDocument {
    /// Wrap an already parsed document.
    pub fn from_value(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Parse document text in the given format.
    pub fn parse(
        name: impl Into<String>,
        content: &str,
        format: DocumentFormat,
    ) -> Result<Self, DocumentError> {
        let name = name.into();
        let value = parse_value(&name, content, format)?;
        Ok(Self { name, value })
    }

    /// Read and parse a document file. The format follows the extension.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let value = load_value(path)?;
        Ok(Self {
            name: path.display().to_string(),
            value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Check the document against the meta-schema and compile it.
    pub fn compile(&self) -> Result<Schema, DocumentError> {
        let root = self
            .value
            .get("connectionSpecification")
            .unwrap_or(&self.value);
        let pointer = if self.value.get("connectionSpecification").is_some() {
            "/connectionSpecification"
        } else {
            ""
        };

        check_meta_schema(&self.name, root)?;

        let object = root.as_object().ok_or_else(|| DocumentError::Unsupported {
            pointer: pointer.to_string(),
            reason: "specification must be an object".to_string(),
        })?;

        let (fields, points) = compile_object(object, pointer)?;
        let additional = object
            .get("additionalProperties")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let mut builder = Schema::builder()
            .fields(fields)
            .additional_properties(additional);
        for point in points {
            builder = builder.decision_point(point);
        }
        let schema = builder.build()?;
        tracing::debug!(
            document = %self.name,
            fields = schema.fields().len(),
            decision_points = schema.decision_points().len(),
            "compiled schema document"
        );
        Ok(schema)
    }
}

/// Connector id implied by a spec file name (`destination-redshift.spec.json`
/// → `destination-redshift`). `None` if the name has no spec suffix.
pub fn connector_id_for(path: &Path) -> Option<Result<ConnectorId, DocumentError>> {
    let file_name = path.file_name()?.to_str()?;
    let stem = SPEC_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))?;
    Some(ConnectorId::new(stem).map_err(DocumentError::from))
}

/// Load and compile every `*.spec.{json,yaml,yml}` document in `dir`.
///
/// Results are sorted by connector id. Any failing document fails the whole
/// load: a directory with one broken schema is not partially registered.
pub fn load_dir(dir: &Path) -> Result<Vec<(ConnectorId, Schema)>, DocumentError> {
    let entries = std::fs::read_dir(dir).map_err(|e| DocumentError::Load {
        path: dir.display().to_string(),
        reason: format!("cannot read schema directory: {e}"),
    })?;

    let mut schemas = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let Some(id) = connector_id_for(&path) else {
            continue;
        };
        let id = id?;
        let schema = SchemaDocument::load(&path)?.compile()?;
        schemas.push((id, schema));
    }
    schemas.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(schemas)
}

/// Read a JSON or YAML file into an untyped value. The format follows the extension.
pub fn load_value(path: &Path) -> Result<Value, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Load {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    parse_value(
        &path.display().to_string(),
        &content,
        DocumentFormat::from_path(path),
    )
}

/// Parse JSON or YAML text into an untyped value.
pub fn parse_value(name: &str, content: &str, format: DocumentFormat) -> Result<Value, DocumentError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| DocumentError::Load {
            path: name.to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| DocumentError::Load {
                    path: name.to_string(),
                    reason: format!("invalid YAML: {e}"),
                })?;
            yaml_to_json_value(&yaml).map_err(|e| DocumentError::Load {
                path: name.to_string(),
                reason: format!("YAML-to-JSON conversion failed: {e}"),
            })
        }
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Connector specifications and payloads only use the JSON-compatible
/// subset of YAML; tags are dropped and their inner value kept.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

fn check_meta_schema(name: &str, root: &Value) -> Result<(), DocumentError> {
    let meta: Value = serde_json::from_str(META_SCHEMA).map_err(|e| DocumentError::Load {
        path: "connector-spec.schema.json".to_string(),
        reason: format!("invalid JSON: {e}"),
    })?;

    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    let validator = opts.build(&meta).map_err(|e| DocumentError::Load {
        path: "connector-spec.schema.json".to_string(),
        reason: e.to_string(),
    })?;

    let violations: Vec<String> = validator
        .iter_errors(root)
        .map(|e| {
            let instance_path = e.instance_path.to_string();
            if instance_path.is_empty() {
                format!("  (root): {e}")
            } else {
                format!("  {instance_path}: {e}")
            }
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DocumentError::MetaSchema {
            name: name.to_string(),
            violations: violations.join("\n"),
        })
    }
}

/// Compile the fields and decision points of one object schema.
fn compile_object(
    object: &Map<String, Value>,
    pointer: &str,
) -> Result<(Vec<FieldSpec>, Vec<DecisionPoint>), DocumentError> {
    let required: BTreeSet<&str> = object
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut fields = Vec::new();
    let mut points = Vec::new();

    if let Some(properties) = object.get("properties").and_then(Value::as_object) {
        let mut ordered: Vec<(&String, &Value)> = properties.iter().collect();
        ordered.sort_by(|(a_name, a), (b_name, b)| {
            let a_order = a.get("order").and_then(Value::as_i64).unwrap_or(i64::MAX);
            let b_order = b.get("order").and_then(Value::as_i64).unwrap_or(i64::MAX);
            a_order.cmp(&b_order).then_with(|| a_name.cmp(b_name))
        });

        for (name, property) in ordered {
            let property_pointer = format!("{pointer}/properties/{}", escape_pointer(name));
            let property = property
                .as_object()
                .ok_or_else(|| DocumentError::Unsupported {
                    pointer: property_pointer.clone(),
                    reason: "property schema must be an object".to_string(),
                })?;
            if property.contains_key("oneOf") {
                points.push(compile_union(property, &property_pointer, Some(name))?);
            } else {
                let listed = required.contains(name.as_str());
                fields.push(compile_field(name, property, listed, &property_pointer)?);
            }
        }
    }

    if object.contains_key("oneOf") {
        points.push(compile_union(object, pointer, None)?);
    }

    Ok((fields, points))
}

fn compile_field(
    name: &str,
    property: &Map<String, Value>,
    listed_required: bool,
    pointer: &str,
) -> Result<FieldSpec, DocumentError> {
    let unsupported = |suffix: &str, reason: String| DocumentError::Unsupported {
        pointer: format!("{pointer}{suffix}"),
        reason,
    };

    let type_name = property
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| unsupported("/type", "field must declare a single type".to_string()))?;
    let kind: FieldKind = type_name
        .parse()
        .map_err(|_| unsupported("/type", format!("type {type_name:?} is not supported")))?;

    let mut field = FieldSpec::new(name, kind);

    match property.get("default") {
        Some(default) => {
            let value = ConfigValue::from_json(default).ok_or_else(|| {
                unsupported("/default", format!("default {default} has no supported type"))
            })?;
            field = field.with_default(value);
        }
        None if listed_required => field = field.required(),
        None => {}
    }

    if let Some(minimum) = property.get("minimum") {
        let minimum = minimum
            .as_i64()
            .ok_or_else(|| unsupported("/minimum", "minimum must be an integer".to_string()))?;
        field = field.with_minimum(minimum);
    }
    if let Some(maximum) = property.get("maximum") {
        let maximum = maximum
            .as_i64()
            .ok_or_else(|| unsupported("/maximum", "maximum must be an integer".to_string()))?;
        field = field.with_maximum(maximum);
    }

    if let Some(members) = property.get("enum").and_then(Value::as_array) {
        let allowed = members
            .iter()
            .map(|m| {
                ConfigValue::from_json(m).ok_or_else(|| {
                    unsupported("/enum", format!("enum member {m} has no supported type"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        field = field.with_allowed(allowed);
    }

    let secret = ["airbyte_secret", "secret"]
        .iter()
        .any(|key| property.get(*key).and_then(Value::as_bool) == Some(true));
    if secret {
        field = field.secret();
    }

    if let Some(description) = property.get("description").and_then(Value::as_str) {
        field = field.with_description(description);
    }

    Ok(field)
}

/// Compile the `oneOf` of `holder` into a decision point. `location` is the
/// property key holding the union, or `None` for an inline union.
fn compile_union(
    holder: &Map<String, Value>,
    pointer: &str,
    location: Option<&str>,
) -> Result<DecisionPoint, DocumentError> {
    let branches_pointer = format!("{pointer}/oneOf");
    let branches = holder
        .get("oneOf")
        .and_then(Value::as_array)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| DocumentError::Unsupported {
            pointer: branches_pointer.clone(),
            reason: "oneOf must be a non-empty array".to_string(),
        })?;

    let discriminant = find_discriminant(branches, &branches_pointer)?;

    let mut point = match location {
        Some(key) => DecisionPoint::at(key, discriminant.as_str()),
        None => DecisionPoint::inline(discriminant.as_str()),
    };

    for (i, branch) in branches.iter().enumerate() {
        let branch_pointer = format!("{branches_pointer}/{i}");
        let branch = branch.as_object().ok_or_else(|| DocumentError::Unsupported {
            pointer: branch_pointer.clone(),
            reason: "oneOf branch must be an object".to_string(),
        })?;

        let value = const_of(branch, &discriminant).ok_or_else(|| DocumentError::Unsupported {
            pointer: format!("{branch_pointer}/properties/{}", escape_pointer(&discriminant)),
            reason: "discriminant constant must be a string".to_string(),
        })?;
        let name = branch
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(value);

        let mut body = branch.clone();
        if let Some(Value::Object(properties)) = body.get_mut("properties") {
            properties.remove(&discriminant);
        }
        let (fields, nested) = compile_object(&body, &branch_pointer)?;

        let mut variant = VariantSpec::new(name, value).with_fields(fields);
        for nested_point in nested {
            variant = variant.with_decision_point(nested_point);
        }
        if let Some(allowed) = branch.get("additionalProperties").and_then(Value::as_bool) {
            variant = variant.with_additional_properties(allowed);
        }
        point = point.with_variant(variant);
    }

    if location.is_some() {
        if let Some(default) = holder
            .get("default")
            .and_then(|d| d.get(&discriminant))
            .and_then(Value::as_str)
        {
            point = point.with_default_variant(default);
        }
    }

    Ok(point)
}

/// The single property name carrying a constant in every branch.
fn find_discriminant(branches: &[Value], pointer: &str) -> Result<String, DocumentError> {
    let mut common: Option<BTreeSet<String>> = None;
    for branch in branches {
        let names: BTreeSet<String> = branch
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .filter(|(_, p)| constant(p).is_some())
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default();
        common = Some(match common {
            None => names,
            Some(previous) => previous.intersection(&names).cloned().collect(),
        });
    }

    let mut common = common.unwrap_or_default().into_iter();
    match (common.next(), common.next()) {
        (Some(name), None) => Ok(name),
        (None, _) => Err(DocumentError::Unsupported {
            pointer: pointer.to_string(),
            reason: "no property carries a const in every branch".to_string(),
        }),
        (Some(first), Some(second)) => Err(DocumentError::Unsupported {
            pointer: pointer.to_string(),
            reason: format!("ambiguous discriminant: both {first:?} and {second:?} are constant in every branch"),
        }),
    }
}

/// `const`, or the only member of a single-element `enum`.
fn constant(property: &Value) -> Option<&Value> {
    property.get("const").or_else(|| match property.get("enum") {
        Some(Value::Array(members)) if members.len() == 1 => members.first(),
        _ => None,
    })
}

fn const_of<'a>(branch: &'a Map<String, Value>, discriminant: &str) -> Option<&'a str> {
    branch
        .get("properties")
        .and_then(|p| p.get(discriminant))
        .and_then(constant)
        .and_then(Value::as_str)
}

/// Escape a key for use in a JSON pointer (RFC 6901).
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgres_core::FieldPath;
    use serde_json::json;

    use crate::model::Location;

    fn staging_document() -> Value {
        json!({
            "type": "object",
            "additionalProperties": false,
            "oneOf": [
                {
                    "title": "Standard",
                    "required": ["method"],
                    "properties": { "method": { "type": "string", "const": "Standard" } }
                },
                {
                    "title": "S3 Staging",
                    "required": ["method", "s3_bucket_name"],
                    "properties": {
                        "method": { "type": "string", "const": "S3 Staging" },
                        "s3_bucket_name": { "type": "string", "order": 1 },
                        "access_key_id": { "type": "string", "airbyte_secret": true, "order": 2 },
                        "encryption": {
                            "type": "object",
                            "default": { "encryption_type": "none" },
                            "oneOf": [
                                {
                                    "title": "No encryption",
                                    "properties": { "encryption_type": { "type": "string", "const": "none" } }
                                },
                                {
                                    "title": "Envelope",
                                    "additionalProperties": false,
                                    "properties": {
                                        "encryption_type": { "type": "string", "enum": ["aes_cbc_envelope"] },
                                        "key_encrypting_key": { "type": "string", "airbyte_secret": true }
                                    }
                                }
                            ]
                        }
                    }
                }
            ]
        })
    }

    #[test]
    fn compiles_inline_and_located_unions() {
        let schema = SchemaDocument::from_value("staging", staging_document())
            .compile()
            .unwrap();

        assert!(!schema.additional_properties());
        assert!(schema.fields().is_empty());
        let method = &schema.decision_points()[0];
        assert_eq!(method.discriminant(), "method");
        assert_eq!(method.location(), &Location::Inline);
        let names: Vec<&str> = method.variants().iter().map(|v| v.name()).collect();
        assert_eq!(names, ["Standard", "S3 Staging"]);

        let staging = &method.variants()[1];
        let field_names: Vec<&str> = staging.fields().iter().map(|f| f.name()).collect();
        assert_eq!(field_names, ["s3_bucket_name", "access_key_id"]);
        assert!(staging.fields()[0].is_required());
        assert!(staging.fields()[1].is_secret());

        let encryption = &staging.decision_points()[0];
        assert_eq!(encryption.location(), &Location::At("encryption".to_string()));
        assert_eq!(encryption.discriminant(), "encryption_type");
        assert_eq!(encryption.default_variant().map(|v| v.discriminant()), Some("none"));
        assert_eq!(encryption.variants()[1].discriminant(), "aes_cbc_envelope");
        assert_eq!(encryption.variants()[1].additional_properties(), Some(false));
        assert_eq!(encryption.variants()[0].additional_properties(), None);
        assert_eq!(
            encryption.discriminant_path(&FieldPath::root()).to_string(),
            "encryption.encryption_type"
        );
    }

    #[test]
    fn required_with_default_becomes_optional() {
        let schema = SchemaDocument::from_value(
            "db",
            json!({
                "type": "object",
                "required": ["port", "host"],
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "default": 5439, "minimum": 0, "maximum": 65536 }
                }
            }),
        )
        .compile()
        .unwrap();

        let host = &schema.fields()[0];
        let port = &schema.fields()[1];
        assert!(host.is_required());
        assert!(!port.is_required());
        assert_eq!(port.default_value(), Some(&ConfigValue::Integer(5439)));
        assert_eq!(port.constraints().maximum, Some(65536));
    }

    #[test]
    fn wrapper_documents_are_unwrapped() {
        let schema = SchemaDocument::from_value(
            "wrapped",
            json!({
                "documentationUrl": "https://example.com",
                "connectionSpecification": {
                    "type": "object",
                    "properties": { "api_key": { "type": "string", "secret": true } }
                }
            }),
        )
        .compile()
        .unwrap();
        assert!(schema.fields()[0].is_secret());
    }

    #[test]
    fn meta_schema_rejects_unknown_types() {
        let err = SchemaDocument::from_value(
            "bad",
            json!({
                "type": "object",
                "properties": { "ratio": { "type": "number" } }
            }),
        )
        .compile()
        .unwrap_err();
        match err {
            DocumentError::MetaSchema { violations, .. } => {
                assert!(violations.contains("/properties/ratio/type"), "{violations}");
            }
            other => panic!("expected MetaSchema, got: {other}"),
        }
    }

    #[test]
    fn union_without_discriminant_is_unsupported() {
        let err = SchemaDocument::from_value(
            "bad",
            json!({
                "type": "object",
                "properties": {
                    "auth": {
                        "type": "object",
                        "oneOf": [
                            { "properties": { "kind": { "type": "string", "const": "a" } } },
                            { "properties": { "other": { "type": "string", "const": "b" } } }
                        ]
                    }
                }
            }),
        )
        .compile()
        .unwrap_err();
        assert!(
            matches!(err, DocumentError::Unsupported { ref pointer, .. } if pointer == "/properties/auth/oneOf"),
            "{err}"
        );
    }

    #[test]
    fn duplicate_constants_surface_as_schema_errors() {
        let err = SchemaDocument::from_value(
            "dup",
            json!({
                "type": "object",
                "oneOf": [
                    { "title": "A", "properties": { "mode": { "type": "string", "const": "x" } } },
                    { "title": "B", "properties": { "mode": { "type": "string", "const": "x" } } }
                ]
            }),
        )
        .compile()
        .unwrap_err();
        assert!(matches!(err, DocumentError::Schema(_)), "{err}");
    }

    #[test]
    fn dotted_property_names_are_rejected() {
        let err = SchemaDocument::from_value(
            "dotted",
            json!({
                "type": "object",
                "properties": { "tunnel.host": { "type": "string" } }
            }),
        )
        .compile()
        .unwrap_err();
        assert!(
            matches!(err, DocumentError::Schema(crate::SchemaError::SeparatorInName { .. })),
            "{err}"
        );
    }

    #[test]
    fn yaml_documents_parse() {
        let yaml = r#"
type: object
required: [start_date]
properties:
  start_date:
    type: string
  page_size:
    type: integer
    default: 100
"#;
        let schema = SchemaDocument::parse("yaml", yaml, DocumentFormat::Yaml)
            .unwrap()
            .compile()
            .unwrap();
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.fields()[0].name(), "page_size");
    }

    #[test]
    fn yaml_to_json_conversion() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("a: 1\nb: [true, x]\n3: null\n").unwrap();
        let json = yaml_to_json_value(&yaml).unwrap();
        assert_eq!(json, json!({"a": 1, "b": [true, "x"], "3": null}));
    }

    #[test]
    fn connector_ids_from_file_names() {
        let id = connector_id_for(Path::new("/x/destination-redshift.spec.json"))
            .unwrap()
            .unwrap();
        assert_eq!(id.as_str(), "destination-redshift");
        assert!(connector_id_for(Path::new("/x/connector-spec.schema.json")).is_none());
        assert!(connector_id_for(Path::new("/x/Bad Name.spec.yaml")).unwrap().is_err());
    }

    #[test]
    fn load_dir_compiles_every_spec_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("source-b.spec.yaml"),
            "type: object\nproperties:\n  token:\n    type: string\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("source-a.spec.json"),
            r#"{"type": "object", "properties": {"n": {"type": "integer"}}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let loaded = load_dir(dir.path()).unwrap();
        let ids: Vec<&str> = loaded.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["source-a", "source-b"]);
    }

    #[test]
    fn load_dir_fails_on_any_broken_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.spec.json"), "{ not json").unwrap();
        assert!(matches!(
            load_dir(dir.path()),
            Err(DocumentError::Load { .. })
        ));
    }
}
