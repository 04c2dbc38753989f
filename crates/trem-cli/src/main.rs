//! trem CLI - offline renderer and configuration tool for the tremolo pedal.

mod commands;
mod panel;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "trem")]
#[command(author, version, about = "Tremolo pedal renderer and config tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a WAV file through the pedal, pressing the footswitch on cue
    Render(commands::render::RenderArgs),

    /// Print transition windows in samples and blocks
    Timings(commands::timings::TimingsArgs),

    /// Validate a configuration file
    CheckConfig(commands::config::CheckConfigArgs),

    /// Write a default configuration file
    InitConfig(commands::config::InitConfigArgs),

    /// List knobs and menu parameters
    Params,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Timings(args) => commands::timings::run(args),
        Commands::CheckConfig(args) => commands::config::check(args),
        Commands::InitConfig(args) => commands::config::init(args),
        Commands::Params => {
            commands::params::run();
            Ok(())
        }
    }
}
