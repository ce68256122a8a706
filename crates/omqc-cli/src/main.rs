//! # omqc CLI entry point
//!
//! Parses arguments, installs the tracing subscriber, and runs the
//! configured checks.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use omqc_cli::config::Config;
use omqc_cli::run::run_checks;

/// OpenMATERIAL 3D quality checker.
///
/// Runs the xom checker bundle on the document named in the configuration
/// file and writes a JSON report.
#[derive(Parser, Debug)]
#[command(name = "omqc", version, about, long_about = None)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Also write generated_checker_bundle_doc.md next to the report.
    #[arg(long)]
    generate_markdown: bool,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = Config::load(&cli.config).and_then(|config| run_checks(&config, cli.generate_markdown));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
