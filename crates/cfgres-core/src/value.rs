//! # Field Kinds and Configuration Values
//!
//! The raw payload arrives as an untyped `serde_json::Value` tree. Nothing
//! about its shape is trusted: a field declared as `integer` may carry a
//! string, a float, or `null`. [`ConfigValue::narrow`] turns a raw value into
//! a typed value of one declared [`FieldKind`], or refuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CfgresError;

/// The declared type of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A UTF-8 string.
    String,
    /// A signed 64-bit integer. Floats are never accepted, even `5.0`.
    Integer,
    /// `true` or `false`.
    Boolean,
    /// A JSON object, carried through as-is.
    Object,
}

impl FieldKind {
    /// Returns the canonical lowercase name used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = CfgresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "object" => Ok(Self::Object),
            other => Err(CfgresError::UnknownFieldKind(other.to_string())),
        }
    }
}

/// A resolved configuration value.
///
/// Declared fields always resolve to one of the four typed variants.
/// `Passthrough` carries undeclared fields admitted by a permissive
/// additional-properties policy; they are never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
    /// An object value.
    Object(Map<String, Value>),
    /// An undeclared value passed through unvalidated.
    Passthrough(Value),
}

impl ConfigValue {
    /// Narrow a raw payload value to `kind`.
    ///
    /// Returns `None` when the raw value does not have the declared kind.
    /// `null` never narrows.
    pub fn narrow(kind: FieldKind, raw: &Value) -> Option<Self> {
        match kind {
            FieldKind::String => raw.as_str().map(|s| Self::String(s.to_owned())),
            FieldKind::Integer => raw.as_i64().map(Self::Integer),
            FieldKind::Boolean => raw.as_bool().map(Self::Boolean),
            FieldKind::Object => raw.as_object().map(|o| Self::Object(o.clone())),
        }
    }

    /// Infer a typed value from a raw JSON value of any supported kind.
    ///
    /// Used for schema documents, where a default's kind is implied by its
    /// JSON type. Returns `None` for `null`, floats, and arrays.
    pub fn from_json(raw: &Value) -> Option<Self> {
        match raw {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Bool(b) => Some(Self::Boolean(*b)),
            Value::Number(n) => n.as_i64().map(Self::Integer),
            Value::Object(o) => Some(Self::Object(o.clone())),
            Value::Null | Value::Array(_) => None,
        }
    }

    /// The kind of a typed value; `None` for passthrough values.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::String(_) => Some(FieldKind::String),
            Self::Integer(_) => Some(FieldKind::Integer),
            Self::Boolean(_) => Some(FieldKind::Boolean),
            Self::Object(_) => Some(FieldKind::Object),
            Self::Passthrough(_) => None,
        }
    }

    /// Returns the string content of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content of an `Integer` value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the content of a `Boolean` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert back to an untyped JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(n) => Value::from(*n),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Object(o) => Value::Object(o.clone()),
            Self::Passthrough(v) => v.clone(),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// JSON type name of a raw value, for error details.
pub fn json_type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
