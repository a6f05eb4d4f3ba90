//! # cfgres-core — Foundational Types for Configuration Resolution
//!
//! This crate defines the primitives shared by the schema model, the
//! resolver, and the CLI. Every other crate in the workspace depends on
//! `cfgres-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `ConnectorId` has a validated
//!    constructor. Registry keys are never bare strings.
//!
//! 2. **Paths are structured.** `FieldPath` holds segments and renders as a
//!    dot-separated string only at the edges (display, serialization).
//!
//! 3. **Payloads are narrowed explicitly.** The raw payload is an untyped
//!    `serde_json::Value` tree. [`ConfigValue::narrow`] is the single place
//!    where a raw value becomes a typed value of a declared [`FieldKind`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cfgres-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::CfgresError;
pub use identity::ConnectorId;
pub use path::FieldPath;
pub use value::{json_type_name, ConfigValue, FieldKind};
