//! # Schema CLI — Check documents and inspect connectors.
//!
//! ```bash
//! cfgres check-schema schemas/destination-redshift.spec.json
//! cfgres list
//! cfgres describe --connector source-hubspot
//! ```

use std::path::PathBuf;

use anyhow::Result;
use cfgres_core::ConnectorId;
use cfgres_schema::{DecisionPoint, FieldSpec, Location, Schema, SchemaDocument};
use clap::Args;
use serde::Serialize;
use serde_json::{json, Value};

use crate::connectors;
use crate::output::{pretty, OutputFormat};
use crate::{Settings, EXIT_FINDINGS, EXIT_OK};

/// Arguments for `cfgres check-schema`.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Specification documents to compile.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for `cfgres describe`.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Connector id to describe.
    #[arg(long)]
    pub connector: String,
}

#[derive(Debug, Serialize)]
struct CheckOutcome {
    file: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute `cfgres check-schema`. Every file is checked even after a failure.
pub fn run_check_schema(args: &CheckSchemaArgs, settings: &Settings) -> Result<u8> {
    let outcomes: Vec<CheckOutcome> = args
        .files
        .iter()
        .map(|path| {
            let result = SchemaDocument::load(path).and_then(|doc| doc.compile());
            CheckOutcome {
                file: path.display().to_string(),
                ok: result.is_ok(),
                error: result.err().map(|e| e.to_string()),
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| !o.ok).count();
    match settings.format {
        OutputFormat::Text => {
            for outcome in &outcomes {
                match &outcome.error {
                    None => println!("  OK    {}", outcome.file),
                    Some(error) => {
                        println!("  FAIL  {}", outcome.file);
                        for line in error.lines() {
                            println!("        {line}");
                        }
                    }
                }
            }
            println!();
            println!("{} checked, {} failed", outcomes.len(), failed);
        }
        OutputFormat::Json => println!("{}", pretty(&serde_json::to_value(&outcomes)?)),
    }

    Ok(if failed == 0 { EXIT_OK } else { EXIT_FINDINGS })
}

/// Execute `cfgres list`.
pub fn run_list(settings: &Settings) -> Result<u8> {
    let connectors = connectors::load(settings.schema_dir.as_deref())?;
    let ids: Vec<&ConnectorId> = connectors.registry.connector_ids().collect();

    match settings.format {
        OutputFormat::Text => {
            println!("Available connectors:");
            println!();
            for id in &ids {
                println!("  {:<28} {}", id.as_str(), connectors.origin(id).as_str());
            }
            println!();
            println!("Total: {} connectors", ids.len());
        }
        OutputFormat::Json => {
            let entries: Vec<Value> = ids
                .iter()
                .map(|id| json!({"connector": id.as_str(), "origin": connectors.origin(id).as_str()}))
                .collect();
            println!("{}", pretty(&Value::Array(entries)));
        }
    }
    Ok(EXIT_OK)
}

/// Execute `cfgres describe`.
pub fn run_describe(args: &DescribeArgs, settings: &Settings) -> Result<u8> {
    let id = ConnectorId::new(args.connector.as_str())?;
    let connectors = connectors::load(settings.schema_dir.as_deref())?;
    let schema = connectors.registry.require(&id)?;

    match settings.format {
        OutputFormat::Text => println!("{}", describe_text(&id, schema)),
        OutputFormat::Json => println!("{}", pretty(&describe_json(&id, schema))),
    }
    Ok(EXIT_OK)
}

/// Indented outline of a schema's fields, decision points and variants.
pub fn describe_text(id: &ConnectorId, schema: &Schema) -> String {
    let mut lines = vec![id.to_string()];
    let policy = if schema.additional_properties() {
        "allowed"
    } else {
        "rejected"
    };
    lines.push(format!("  undeclared fields: {policy}"));
    outline(&mut lines, 1, schema.fields(), schema.decision_points());
    lines.join("\n")
}

fn outline(lines: &mut Vec<String>, depth: usize, fields: &[FieldSpec], points: &[DecisionPoint]) {
    let indent = "  ".repeat(depth);
    for field in fields {
        lines.push(format!("{indent}{}", field_summary(field)));
    }
    for point in points {
        let location = match point.location() {
            Location::Inline => "inline".to_string(),
            Location::At(key) => format!("at {key:?}"),
        };
        let default = point
            .default_variant()
            .map(|v| format!(", default {:?}", v.discriminant()))
            .unwrap_or_default();
        lines.push(format!(
            "{indent}decision point {:?} ({location}{default})",
            point.discriminant()
        ));
        for variant in point.variants() {
            lines.push(format!(
                "{indent}  - {:?} -> {}",
                variant.discriminant(),
                variant.name()
            ));
            outline(lines, depth + 2, variant.fields(), variant.decision_points());
        }
    }
}

fn field_summary(field: &FieldSpec) -> String {
    let mut parts = vec![field.kind().to_string()];
    if field.is_required() {
        parts.push("required".to_string());
    }
    if let Some(default) = field.default_value() {
        parts.push(format!("default {}", default.to_json()));
    }
    let constraints = field.constraints();
    if let Some(minimum) = constraints.minimum {
        parts.push(format!("min {minimum}"));
    }
    if let Some(maximum) = constraints.maximum {
        parts.push(format!("max {maximum}"));
    }
    if let Some(allowed) = &constraints.allowed {
        parts.push(format!("{} allowed values", allowed.len()));
    }
    if field.is_secret() {
        parts.push("secret".to_string());
    }
    format!("{}: {}", field.name(), parts.join(", "))
}

/// Machine-readable form of [`describe_text`].
pub fn describe_json(id: &ConnectorId, schema: &Schema) -> Value {
    json!({
        "connector": id.as_str(),
        "additional_properties": schema.additional_properties(),
        "fields": schema.fields().iter().map(field_json).collect::<Vec<_>>(),
        "decision_points": schema.decision_points().iter().map(point_json).collect::<Vec<_>>(),
    })
}

fn field_json(field: &FieldSpec) -> Value {
    let constraints = field.constraints();
    json!({
        "name": field.name(),
        "kind": field.kind(),
        "required": field.is_required(),
        "default": field.default_value().map(|v| v.to_json()),
        "minimum": constraints.minimum,
        "maximum": constraints.maximum,
        "enum": constraints.allowed.as_ref().map(|a| a.iter().map(|v| v.to_json()).collect::<Vec<_>>()),
        "secret": field.is_secret(),
    })
}

fn point_json(point: &DecisionPoint) -> Value {
    let location = match point.location() {
        Location::Inline => Value::Null,
        Location::At(key) => Value::String(key.clone()),
    };
    json!({
        "discriminant": point.discriminant(),
        "location": location,
        "default_variant": point.default_variant().map(|v| v.discriminant()),
        "variants": point.variants().iter().map(|v| json!({
            "name": v.name(),
            "discriminant": v.discriminant(),
            "additional_properties": v.additional_properties(),
            "fields": v.fields().iter().map(field_json).collect::<Vec<_>>(),
            "decision_points": v.decision_points().iter().map(point_json).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    })
}
