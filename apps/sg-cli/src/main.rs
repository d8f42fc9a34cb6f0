//! # sg-cli
//!
//! Command-line interface for Stencil Guard.
//!
//! Lets policy authors try a policy file before an engine loads it:
//! - `sg check` — print ALLOW / DENY for type names under a policy
//! - `sg chain` — print a type's ancestor chain from a types file

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Stencil Guard CLI — inspect introspection access policies.
#[derive(Parser)]
#[command(name = "sg", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check type names against a policy file.
    Check(commands::check::CheckArgs),
    /// Print the ancestor chain of a type.
    Chain(commands::chain::ChainArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interfere with results on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sg_policy=info".parse()?)
                .add_directive("sg_gate=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Check(args) => {
            let all_allowed = commands::check::execute(args)?;
            if !all_allowed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Chain(args) => commands::chain::execute(args),
    }
}
