//! # Connector Identity
//!
//! Newtype wrapper for the key under which a connector's schema is
//! registered. Keeping it distinct from arbitrary strings means a payload
//! field value can never be passed where a registry key is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CfgresError;

/// Identifier of a connector (e.g. `destination-redshift`).
///
/// Non-empty, at most 128 bytes, lowercase ASCII letters, digits, `-`, `_`
/// and `.` only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectorId(String);

const MAX_CONNECTOR_ID_LEN: usize = 128;

impl ConnectorId {
    /// Validate and wrap a connector identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, CfgresError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CfgresError::InvalidConnectorId {
                id,
                reason: "must not be empty",
            });
        }
        if id.len() > MAX_CONNECTOR_ID_LEN {
            return Err(CfgresError::InvalidConnectorId {
                id,
                reason: "must be at most 128 bytes",
            });
        }
        let valid = id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'-' | b'_' | b'.'));
        if !valid {
            return Err(CfgresError::InvalidConnectorId {
                id,
                reason: "only lowercase letters, digits, '-', '_' and '.' are allowed",
            });
        }
        Ok(Self(id))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ConnectorId {
    type Err = CfgresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ConnectorId {
    type Error = CfgresError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConnectorId> for String {
    fn from(id: ConnectorId) -> Self {
        id.0
    }
}
