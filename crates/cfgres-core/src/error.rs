//! # Error Types
//!
//! Errors raised while constructing core primitives. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Validation *findings* produced while resolving a payload are not errors in
//! this sense; they live in `cfgres-resolve` and are accumulated, never raised.

use thiserror::Error;

/// Top-level error type for core primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CfgresError {
    /// A connector identifier failed validation.
    #[error("invalid connector id {id:?}: {reason}")]
    InvalidConnectorId {
        /// The rejected identifier.
        id: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A field path string could not be parsed.
    #[error("invalid field path {path:?}: {reason}")]
    InvalidFieldPath {
        /// The rejected path string.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A field kind name was not recognized.
    #[error("unknown field kind {0:?}; expected one of string, integer, boolean, object")]
    UnknownFieldKind(String),
}
