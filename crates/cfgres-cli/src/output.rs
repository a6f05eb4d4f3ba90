//! Output formats and rendering helpers shared by the subcommands.

use clap::ValueEnum;
use serde_json::Value;

/// How a subcommand prints its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One pretty-printed JSON document on stdout.
    Json,
}

/// Pretty-print a JSON value. Serializing a `Value` cannot fail, but the
/// compact form is used as a fallback rather than panicking.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
