//! # Schema Registry
//!
//! Schemas keyed by [`ConnectorId`]. A registry is assembled once through
//! [`RegistryBuilder`] and is read-only afterwards.
//!
//! One registry may be installed process-wide, either explicitly with
//! [`SchemaRegistry::install`] or lazily with [`get_or_init`]. Installation
//! happens at most once; lookups after that are lock-free reads.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use cfgres_core::ConnectorId;

use crate::error::RegistryError;
use crate::model::Schema;

static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();

/// Immutable map from connector id to schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<ConnectorId, Schema>,
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The schema registered for `id`, if any.
    pub fn get(&self, id: &ConnectorId) -> Option<&Schema> {
        self.schemas.get(id)
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn require(&self, id: &ConnectorId) -> Result<&Schema, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::UnknownConnector(id.to_string()))
    }

    /// Registered connector ids in ascending order.
    pub fn connector_ids(&self) -> impl Iterator<Item = &ConnectorId> {
        self.schemas.keys()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Install this registry process-wide.
    ///
    /// Fails with [`RegistryError::AlreadyInstalled`] if a registry was
    /// installed before, explicitly or through [`get_or_init`].
    pub fn install(self) -> Result<&'static SchemaRegistry, RegistryError> {
        let count = self.len();
        GLOBAL
            .set(self)
            .map_err(|_| RegistryError::AlreadyInstalled)?;
        tracing::info!(connectors = count, "installed schema registry");
        global()
    }
}

/// Collects schemas before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemas: BTreeMap<ConnectorId, Schema>,
}

impl RegistryBuilder {
    /// Add a schema. Each connector id may be registered once.
    pub fn register(&mut self, id: ConnectorId, schema: Schema) -> Result<&mut Self, RegistryError> {
        if self.schemas.contains_key(&id) {
            return Err(RegistryError::DuplicateConnector(id.to_string()));
        }
        self.schemas.insert(id, schema);
        Ok(self)
    }

    /// Add every `(id, schema)` pair, stopping at the first duplicate.
    pub fn register_all(
        &mut self,
        schemas: impl IntoIterator<Item = (ConnectorId, Schema)>,
    ) -> Result<&mut Self, RegistryError> {
        for (id, schema) in schemas {
            self.register(id, schema)?;
        }
        Ok(self)
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}

/// The process-wide registry.
pub fn global() -> Result<&'static SchemaRegistry, RegistryError> {
    GLOBAL.get().ok_or(RegistryError::NotInstalled)
}

/// The process-wide registry, installing the one built by `init` if none is
/// installed yet. `init` runs at most once per process.
pub fn get_or_init(init: impl FnOnce() -> SchemaRegistry) -> &'static SchemaRegistry {
    GLOBAL.get_or_init(|| {
        let registry = init();
        tracing::info!(connectors = registry.len(), "installed schema registry");
        registry
    })
}
