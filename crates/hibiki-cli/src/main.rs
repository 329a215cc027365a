//! Hibiki CLI - offline rendering through the hall reverb.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hibiki")]
#[command(author, version, about = "Hibiki hall reverb CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a WAV file through the hall
    Render(commands::render::RenderArgs),

    /// List the hall's parameters and their current values
    Params(commands::params::ParamsArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for tables and stats.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Params(args) => commands::params::run(args),
    }
}
