//! # Validation Findings
//!
//! Findings are accumulated, never raised: the resolver reports every
//! problem in a payload in one pass. Each finding carries a stable
//! snake_case code, the dot-separated path it concerns, and a detail line
//! for humans. Details never echo the value of a secret field.

use std::fmt;

use cfgres_core::{CfgresError, FieldPath};
use cfgres_schema::RegistryError;
use serde::Serialize;
use thiserror::Error;

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A decision point's discriminant is absent and no default variant is declared.
    MissingDiscriminant,
    /// A discriminant value matches no declared variant.
    UnknownVariant,
    /// A required field of the selected variant is absent.
    MissingRequiredField,
    /// A value has the wrong JSON type (including `null`).
    TypeMismatch,
    /// An integer lies outside its declared range.
    OutOfRange,
    /// A value is not a member of its declared enumeration.
    InvalidEnumValue,
    /// An undeclared field in an object that does not allow additional properties.
    UnexpectedField,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingDiscriminant => "missing_discriminant",
            Self::UnknownVariant => "unknown_variant",
            Self::MissingRequiredField => "missing_required_field",
            Self::TypeMismatch => "type_mismatch",
            Self::OutOfRange => "out_of_range",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::UnexpectedField => "unexpected_field",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Error code.
    #[serde(rename = "code")]
    pub kind: ErrorKind,
    /// Path of the offending field. The root path renders as `""`.
    pub path: FieldPath,
    /// Human-readable description.
    pub detail: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, path: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "  (root): [{}] {}", self.kind, self.detail)
        } else {
            write!(f, "  {}: [{}] {}", self.path, self.kind, self.detail)
        }
    }
}

/// All findings of one resolution, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Findings of one kind.
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Findings at exactly `path` (dot-separated).
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.path.to_string() == path)
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failure to start a resolution: the connector cannot be looked up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The connector id is malformed.
    #[error(transparent)]
    ConnectorId(#[from] CfgresError),

    /// The registry is not installed or does not know the connector.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
