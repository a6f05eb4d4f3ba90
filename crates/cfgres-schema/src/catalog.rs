//! # Built-in Catalog
//!
//! Connector specifications bundled into the binary. They are compiled on
//! demand; nothing is parsed until a schema is asked for.

use cfgres_core::ConnectorId;

use crate::document::{DocumentFormat, SchemaDocument};
use crate::error::DocumentError;
use crate::model::Schema;

struct Bundled {
    id: &'static str,
    format: DocumentFormat,
    content: &'static str,
}

const BUNDLED: &[Bundled] = &[
    Bundled {
        id: "destination-redshift",
        format: DocumentFormat::Json,
        content: include_str!("../../../schemas/destination-redshift.spec.json"),
    },
    Bundled {
        id: "source-hubspot",
        format: DocumentFormat::Yaml,
        content: include_str!("../../../schemas/source-hubspot.spec.yaml"),
    },
    Bundled {
        id: "staging-upload",
        format: DocumentFormat::Json,
        content: include_str!("../../../schemas/staging-upload.spec.json"),
    },
];

/// Ids of the bundled connectors, in ascending order.
pub fn builtin_ids() -> impl Iterator<Item = &'static str> {
    BUNDLED.iter().map(|b| b.id)
}

/// Compile the bundled schema for `id`. `None` if `id` is not bundled.
pub fn builtin_schema(id: &str) -> Option<Result<Schema, DocumentError>> {
    let bundled = BUNDLED.iter().find(|b| b.id == id)?;
    Some(compile(bundled))
}

/// Compile every bundled schema.
pub fn builtin_schemas() -> Result<Vec<(ConnectorId, Schema)>, DocumentError> {
    BUNDLED
        .iter()
        .map(|bundled| Ok((ConnectorId::new(bundled.id)?, compile(bundled)?)))
        .collect()
}

fn compile(bundled: &Bundled) -> Result<Schema, DocumentError> {
    let name = format!("{}.spec (bundled)", bundled.id);
    SchemaDocument::parse(name, bundled.content, bundled.format)?.compile()
}
