//! # cfgres-schema — Connector Configuration Schemas
//!
//! Describes what a connector's configuration payload must look like: typed
//! fields with defaults and constraints, plus discriminated-union decision
//! points that select one of several mutually exclusive variants.
//!
//! ## Model (`model`)
//!
//! [`Schema`], [`FieldSpec`], [`DecisionPoint`] and [`VariantSpec`]. Schemas
//! are assembled with [`SchemaBuilder`], which rejects structural mistakes
//! (duplicate discriminants, required fields with defaults, defaults that
//! fail their own constraints) before a schema can ever be used.
//!
//! ## Documents (`document`)
//!
//! Connector specification documents, written in JSON or YAML, compile into
//! schemas. Documents are checked against the bundled
//! `connector-spec.schema.json` meta-schema first.
//!
//! ## Registry (`registry`) and Catalog (`catalog`)
//!
//! [`SchemaRegistry`] maps connector ids to schemas and can be installed
//! process-wide once. The catalog holds the specifications bundled with the
//! workspace.
//!
//! ## Crate Policy
//!
//! - Depends only on `cfgres-core` internally.
//! - The model performs no I/O. File access is confined to `document`.
//! - A schema that fails construction is never registered.

pub mod catalog;
pub mod document;
pub mod error;
pub mod model;
pub mod registry;

pub use document::{load_dir, DocumentFormat, SchemaDocument};
pub use error::{DocumentError, RegistryError, SchemaError};
pub use model::{
    ConstraintViolation, Constraints, DecisionPoint, FieldSpec, Location, Schema, SchemaBuilder,
    VariantSpec,
};
pub use registry::{RegistryBuilder, SchemaRegistry};
