//! # cfgres-resolve — Configuration Resolution
//!
//! Turns an untyped connector configuration payload into one well-typed
//! configuration, given the connector's [`Schema`].
//!
//! ## Pipeline
//!
//! 1. **Resolver** (`resolver`) walks the schema top-down.
//! 2. **Variant matcher** (`matcher`) selects a variant at each decision
//!    point from its discriminant.
//! 3. **Field validator** (`field`) checks the fields of the selected
//!    variants and applies defaults.
//! 4. **Secret marker** (`secret`) tags sensitive values for redaction.
//!
//! Every finding is accumulated into a [`ValidationErrors`] list; nothing in
//! the pipeline fails early. A [`Resolution`] with findings still carries
//! whatever could be resolved, for diagnostics only.
//!
//! ## Crate Policy
//!
//! - No I/O. Payloads arrive as `serde_json::Value`.
//! - Logging carries counts and paths, never payload values.
//! - Resolution is deterministic: the same schema and payload always yield
//!   the same config and the same findings in the same order.

pub mod config;
pub mod error;
pub mod field;
pub mod matcher;
pub mod resolver;
pub mod secret;

pub use config::{Resolution, ResolvedConfig, Selection};
pub use error::{ErrorKind, ResolveError, ValidationError, ValidationErrors};
pub use matcher::{match_variant, MatchFailure};
pub use resolver::resolve;
pub use secret::{mark, TaggedConfig, TaggedValue, REDACTED};

use cfgres_core::ConnectorId;
use cfgres_schema::{registry, Schema, SchemaRegistry};
use serde_json::Value;

/// Resolve `payload` for the connector `id` registered in `registry`.
pub fn resolve_with(
    registry: &SchemaRegistry,
    id: &ConnectorId,
    payload: &Value,
) -> Result<Resolution, ResolveError> {
    let schema: &Schema = registry.require(id)?;
    tracing::debug!(connector = %id, "resolving configuration");
    Ok(resolve(schema, payload))
}

/// Resolve `payload` for the connector `id` in the process-wide registry.
pub fn resolve_connector(id: &str, payload: &Value) -> Result<Resolution, ResolveError> {
    let id = ConnectorId::new(id)?;
    resolve_with(registry::global()?, &id, payload)
}
