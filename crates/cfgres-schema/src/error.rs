//! # Schema Errors
//!
//! A malformed schema is a programmer or schema-author error. It is detected
//! when the schema is built or loaded and is fatal to that schema's
//! registration; a broken schema is never registered.

use cfgres_core::{CfgresError, FieldKind};
use thiserror::Error;

/// Structural error found while building a [`Schema`](crate::Schema).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two variants of one decision point share a discriminant value.
    #[error("decision point '{path}' declares discriminant value {value:?} more than once")]
    DuplicateDiscriminant {
        /// Path of the discriminant field.
        path: String,
        /// The repeated value.
        value: String,
    },

    /// A decision point has no variants.
    #[error("decision point '{path}' declares no variants")]
    EmptyDecisionPoint {
        /// Path of the discriminant field.
        path: String,
    },

    /// The declared default variant does not exist.
    #[error("decision point '{path}' names default variant {value:?}, which is not declared")]
    UnknownDefaultVariant {
        /// Path of the discriminant field.
        path: String,
        /// The dangling discriminant value.
        value: String,
    },

    /// Two declarations claim the same key of one payload object.
    #[error("key '{key}' is declared more than once in object '{scope}'")]
    DuplicateKey {
        /// Path of the object (empty for the root).
        scope: String,
        /// The contested key.
        key: String,
    },

    /// A field name, discriminant, or location contains the path separator,
    /// which would make resolved paths ambiguous.
    #[error("key '{key}' in object '{scope}' must not contain '.'")]
    SeparatorInName {
        /// Path of the object (empty for the root).
        scope: String,
        /// The offending key.
        key: String,
    },

    /// A field name, discriminant, or location is empty.
    #[error("empty name declared in object '{scope}'")]
    EmptyName {
        /// Path of the object (empty for the root).
        scope: String,
    },

    /// A required field also declares a default.
    #[error("field '{field}' is required and must not declare a default")]
    RequiredWithDefault {
        /// Path of the field.
        field: String,
    },

    /// A default's kind differs from the field's kind.
    #[error("field '{field}' is {kind} but its default is {default}")]
    DefaultKindMismatch {
        /// Path of the field.
        field: String,
        /// Declared kind.
        kind: FieldKind,
        /// The default, rendered as JSON.
        default: String,
    },

    /// A default fails the field's own constraints.
    #[error("default of field '{field}' is invalid: {reason}")]
    DefaultViolatesConstraints {
        /// Path of the field.
        field: String,
        /// The violated constraint.
        reason: String,
    },

    /// `minimum` exceeds `maximum`.
    #[error("field '{field}' has minimum {minimum} greater than maximum {maximum}")]
    InvertedRange {
        /// Path of the field.
        field: String,
        /// Declared minimum.
        minimum: i64,
        /// Declared maximum.
        maximum: i64,
    },

    /// A range is declared on a non-integer field.
    #[error("field '{field}' is {kind}; ranges apply to integers only")]
    RangeOnNonInteger {
        /// Path of the field.
        field: String,
        /// Declared kind.
        kind: FieldKind,
    },

    /// An allowed-values set is declared on a kind that cannot carry one.
    #[error("field '{field}' is {kind}; allowed values apply to strings and integers only")]
    EnumOnUnsupportedKind {
        /// Path of the field.
        field: String,
        /// Declared kind.
        kind: FieldKind,
    },

    /// An allowed-values set is empty.
    #[error("field '{field}' declares an empty set of allowed values")]
    EmptyEnum {
        /// Path of the field.
        field: String,
    },

    /// An allowed value has a different kind than the field.
    #[error("field '{field}' is {kind} but lists allowed value {member}")]
    EnumMemberKindMismatch {
        /// Path of the field.
        field: String,
        /// Declared kind.
        kind: FieldKind,
        /// The offending member, rendered as JSON.
        member: String,
    },
}

/// Error loading or compiling a declarative schema document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    Load {
        /// Path or name of the document.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// The document does not conform to the connector specification meta-schema.
    #[error("document '{name}' is not a valid connector specification:\n{violations}")]
    MetaSchema {
        /// Path or name of the document.
        name: String,
        /// One line per violation.
        violations: String,
    },

    /// The document uses a construct the engine does not support.
    #[error("unsupported construct at '{pointer}': {reason}")]
    Unsupported {
        /// JSON pointer into the document.
        pointer: String,
        /// What is unsupported.
        reason: String,
    },

    /// The document compiled to a structurally invalid schema.
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    /// The file name does not yield a valid connector id.
    #[error("invalid connector id: {0}")]
    ConnectorId(#[from] CfgresError),

    /// IO error reading a document or directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error populating or installing the schema registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two schemas were registered under one connector id.
    #[error("connector '{0}' is already registered")]
    DuplicateConnector(String),

    /// The process-wide registry was already installed.
    #[error("the process-wide schema registry is already installed")]
    AlreadyInstalled,

    /// No schema is registered under the connector id.
    #[error("no schema registered for connector '{0}'")]
    UnknownConnector(String),

    /// The process-wide registry has not been installed.
    #[error("the process-wide schema registry has not been installed")]
    NotInstalled,
}
