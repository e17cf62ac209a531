use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    build::{self, BuildArgs},
    render::{self, RenderArgs},
    version::{self, VersionArgs},
};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "fert-meta", about = "Fertilizer token metadata generator")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch tokens from the subgraph and chain, then write every artifact.
    Build(BuildArgs),
    /// Render artifacts from a local snapshot instead of live sources.
    Render(RenderArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let result = match cli.command {
        Command::Build(args) => build::run(&args),
        Command::Render(args) => render::run(&args),
        Command::Version(args) => version::run(&args),
    };
    if let Err(err) = &result {
        error!(error = %err, "fert-meta failed");
    }
    result
}
