//! # cfgres-cli — Command-Line Interface
//!
//! Provides the `cfgres` binary.
//!
//! ## Subcommands
//!
//! - `cfgres resolve` — Resolve a configuration payload and print the
//!   redacted result or every validation finding.
//! - `cfgres check-schema` — Compile connector specification documents and
//!   report construction errors.
//! - `cfgres list` — List the connectors available to the other commands.
//! - `cfgres describe` — Print a connector's decision points and variants.
//!
//! ```bash
//! cfgres resolve --connector destination-redshift --config redshift.json
//! cfgres --format json resolve --connector staging-upload --config payload.yaml
//! cfgres check-schema schemas/*.spec.json
//! cfgres --schema-dir ./connectors list
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `2` when a payload or schema has findings, `1` on
//! operational errors (unreadable files, unknown connectors).

pub mod connectors;
pub mod output;
pub mod resolve;
pub mod schema;

use std::path::PathBuf;

pub use output::OutputFormat;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// How results are printed.
    pub format: OutputFormat,
    /// Extra directory of `*.spec.{json,yaml,yml}` documents.
    pub schema_dir: Option<PathBuf>,
}

/// Exit code for a clean run.
pub const EXIT_OK: u8 = 0;

/// Exit code when the input was processed and findings were reported.
pub const EXIT_FINDINGS: u8 = 2;
