//! # Resolve CLI — Resolve a configuration payload.
//!
//! ```bash
//! cfgres resolve --connector staging-upload --config payload.json
//! cfgres resolve --schema my-connector.spec.yaml --config payload.yaml
//! ```
//!
//! Prints the resolved configuration with every secret value redacted, or
//! every validation finding when the payload is not usable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cfgres_core::ConnectorId;
use cfgres_resolve::{mark, resolve, Resolution, TaggedConfig};
use cfgres_schema::document::load_value;
use cfgres_schema::{Schema, SchemaDocument};
use clap::Args;
use serde_json::{json, Map, Value};

use crate::output::{pretty, OutputFormat};
use crate::{connectors, Settings, EXIT_FINDINGS, EXIT_OK};

/// Arguments for `cfgres resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Connector id to resolve against. Required unless --schema is given.
    #[arg(long, required_unless_present = "schema")]
    pub connector: Option<String>,

    /// Configuration payload (JSON, or YAML by extension).
    #[arg(long)]
    pub config: PathBuf,

    /// Resolve against this specification document instead of a registered connector.
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

/// Execute `cfgres resolve`.
pub fn run_resolve(args: &ResolveArgs, settings: &Settings) -> Result<u8> {
    let (label, schema) = load_schema(args, settings)?;
    let payload = load_value(&args.config)
        .with_context(|| format!("failed to read payload {}", args.config.display()))?;

    let resolution = resolve(&schema, &payload);
    let (report, code) = render(&label, &schema, &resolution, settings.format);
    println!("{report}");
    Ok(code)
}

fn load_schema(args: &ResolveArgs, settings: &Settings) -> Result<(String, Schema)> {
    if let Some(path) = &args.schema {
        let schema = SchemaDocument::load(path)
            .and_then(|doc| doc.compile())
            .with_context(|| format!("failed to compile schema {}", path.display()))?;
        let label = args
            .connector
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        return Ok((label, schema));
    }

    let raw = args
        .connector
        .as_deref()
        .context("--connector is required when --schema is not given")?;
    let id = ConnectorId::new(raw)?;
    let connectors = connectors::load(settings.schema_dir.as_deref())?;
    let schema = connectors.registry.require(&id)?.clone();
    Ok((id.to_string(), schema))
}

/// Render a resolution. Returns the report and the exit code.
pub fn render(label: &str, schema: &Schema, resolution: &Resolution, format: OutputFormat) -> (String, u8) {
    if resolution.is_usable() {
        let tagged = mark(&resolution.config, schema);
        let report = match format {
            OutputFormat::Text => render_text(label, &tagged),
            OutputFormat::Json => pretty(&json!({
                "connector": label,
                "valid": true,
                "selections": selections_json(&tagged),
                "config": tagged.redacted_json(),
            })),
        };
        (report, EXIT_OK)
    } else {
        let report = match format {
            OutputFormat::Text => format!(
                "{label}: {} validation error(s)\n{}",
                resolution.errors.len(),
                resolution.errors
            ),
            OutputFormat::Json => pretty(&json!({
                "connector": label,
                "valid": false,
                "errors": resolution.errors,
            })),
        };
        (report, EXIT_FINDINGS)
    }
}

fn render_text(label: &str, tagged: &TaggedConfig) -> String {
    let mut lines = vec![format!("{label}: configuration is valid")];
    for (path, selection) in tagged.selections() {
        lines.push(format!("  selected {path} -> {}", selection.variant));
    }
    lines.extend(tagged.redacted_lines().into_iter().map(|line| format!("  {line}")));
    lines.join("\n")
}

fn selections_json(tagged: &TaggedConfig) -> Value {
    let map: Map<String, Value> = tagged
        .selections()
        .iter()
        .map(|(path, selection)| (path.to_string(), Value::String(selection.variant.clone())))
        .collect();
    Value::Object(map)
}
