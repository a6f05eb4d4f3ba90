//! # cfgres CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cfgres_cli::resolve::{run_resolve, ResolveArgs};
use cfgres_cli::schema::{run_check_schema, run_describe, run_list, CheckSchemaArgs, DescribeArgs};
use cfgres_cli::{OutputFormat, Settings};

/// Connector configuration resolver.
///
/// Validates connector configuration payloads against their schemas,
/// selects the variant at every decision point, applies defaults, and
/// prints the result with secrets redacted.
#[derive(Parser, Debug)]
#[command(name = "cfgres", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Directory of additional `*.spec.{json,yaml,yml}` connector documents.
    #[arg(long, env = "CFGRES_SCHEMA_DIR", global = true)]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a configuration payload against a connector schema.
    Resolve(ResolveArgs),

    /// Compile connector specification documents and report errors.
    CheckSchema(CheckSchemaArgs),

    /// List available connectors.
    List,

    /// Print a connector's fields, decision points, and variants.
    Describe(DescribeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // -v flags take precedence; without them RUST_LOG applies, then `warn`.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("cfgres CLI starting");

    let settings = Settings {
        format: cli.format,
        schema_dir: cli.schema_dir,
    };

    let result = match cli.command {
        Commands::Resolve(args) => run_resolve(&args, &settings),
        Commands::CheckSchema(args) => run_check_schema(&args, &settings),
        Commands::List => run_list(&settings),
        Commands::Describe(args) => run_describe(&args, &settings),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
