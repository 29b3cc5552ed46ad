//! HERA MVP CLI - scaffold a Next.js app from a HERA app pack
//!
//! `generate` writes pages, API routes, lib files, middleware, seeds and
//! tests for a pack; `validate` reports problems without writing anything;
//! `demo` writes a sample dealer pack and generates it.

use clap::{Parser, Subcommand};
use commands::{demo::DemoCommand, generate::GenerateCommand, validate::ValidateCommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

/// HERA MVP generator - app pack to Next.js scaffold
#[derive(Debug, Parser)]
#[command(name = "hera-mvp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the app scaffold from an app pack
    #[command(name = "generate")]
    Generate(GenerateCommand),

    /// Validate an app pack without writing files
    #[command(name = "validate")]
    Validate(ValidateCommand),

    /// Write the demo dealer pack and generate it
    #[command(name = "demo")]
    Demo(DemoCommand),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(cmd) => cmd.execute().await,
        Command::Validate(cmd) => cmd.execute().await,
        Command::Demo(cmd) => cmd.execute().await,
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
