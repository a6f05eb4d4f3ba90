//! Assembles the connector registry the subcommands work against: the
//! bundled catalog, plus every document in `--schema-dir`.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use cfgres_core::ConnectorId;
use cfgres_schema::{catalog, load_dir, SchemaRegistry};

/// Where a registered schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Bundled,
    SchemaDir,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bundled => "bundled",
            Self::SchemaDir => "schema-dir",
        }
    }
}

/// The registry plus the origin of each entry.
#[derive(Debug)]
pub struct Connectors {
    pub registry: SchemaRegistry,
    from_dir: BTreeSet<ConnectorId>,
}

impl Connectors {
    pub fn origin(&self, id: &ConnectorId) -> Origin {
        if self.from_dir.contains(id) {
            Origin::SchemaDir
        } else {
            Origin::Bundled
        }
    }
}

/// Compile the bundled catalog and the documents of `schema_dir`.
///
/// A document in `schema_dir` shadows a bundled schema with the same id.
pub fn load(schema_dir: Option<&Path>) -> Result<Connectors> {
    let loaded = match schema_dir {
        Some(dir) => load_dir(dir)
            .with_context(|| format!("failed to load schemas from {}", dir.display()))?,
        None => Vec::new(),
    };
    let from_dir: BTreeSet<ConnectorId> = loaded.iter().map(|(id, _)| id.clone()).collect();

    let bundled = catalog::builtin_schemas().context("bundled catalog does not compile")?;
    let mut builder = SchemaRegistry::builder();
    for (id, schema) in bundled {
        if from_dir.contains(&id) {
            tracing::info!(connector = %id, "schema directory shadows bundled schema");
            continue;
        }
        builder.register(id, schema)?;
    }
    builder.register_all(loaded)?;

    let registry = builder.build();
    tracing::debug!(connectors = registry.len(), "loaded connector registry");
    Ok(Connectors { registry, from_dir })
}
