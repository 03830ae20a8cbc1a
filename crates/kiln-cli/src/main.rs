//! Kiln command-line exporter.
//!
//! Run with: `kiln <command>`. Logs go to stderr and honour `RUST_LOG`;
//! a `.env` file in the working directory is loaded first.

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Behavior, Export};

/// Export events-based games for the web, desktop and mobile
#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Kiln game exporter", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Export a project for one or more targets
    Export(Export),

    /// Print the generated module of one events-based behavior
    Behavior(Behavior),
}

fn main() -> Result<()> {
    // KILN_RUNTIME_ROOT, KILN_STRICT and RUST_LOG may come from .env
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Export(cmd) => cmd.execute(),
        Command::Behavior(cmd) => cmd.execute(),
    }
}
