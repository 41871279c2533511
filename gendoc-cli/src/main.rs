//! gendoc — template provisioning for documentation output.
//!
//! # Usage
//!
//! ```text
//! gendoc provision [SUBPATH...] [--settings FILE] [--templates DIR --output DIR] [--json]
//! gendoc templates <SUBPATH> [--settings FILE] [--templates DIR --output DIR] [--suffix S]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{provision::ProvisionArgs, templates::TemplatesArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gendoc",
    version,
    about = "Provision documentation templates and static assets",
    long_about = None,
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy static assets into the output tree and report discovered templates.
    Provision(ProvisionArgs),

    /// List the templates of one output subpath, or look one up by suffix.
    Templates(TemplatesArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Provision(args) => args.run(),
        Commands::Templates(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
