//! GRIDCAP CLI - Command-line interface
//!
//! Commands:
//! - demo: Replay the built-in sample moves
//! - play: Replay a JSON move script
//! - init-config: Write the default game config

mod demo_cmd;
mod play_cmd;
mod script;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gridcap_core::GameConfig;

#[derive(Parser)]
#[command(name = "gridcap")]
#[command(about = "Two-player grid capture game engine")]
struct Cli {
    /// Seed for deployment (overrides the config seed)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the built-in sample moves
    Demo(demo_cmd::DemoArgs),
    /// Replay a JSON move script
    Play(play_cmd::PlayArgs),
    /// Write the default game config to a file
    InitConfig {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo(args) => demo_cmd::run(args, cli.seed),
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::InitConfig { path } => {
            let mut config = GameConfig::default();
            if let Some(seed) = cli.seed {
                config = config.with_seed(seed);
            }
            config.save(&path)?;
            tracing::info!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}
