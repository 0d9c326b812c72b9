//! Play command - replay a JSON move script against a configured game
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), setup_game(), report_results()
//! - Level 3: (delegated to script::replay)
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use gridcap_core::{Game, GameConfig, Player};

use crate::script::{self, ReplayReport};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Move script JSON file
    #[arg(long, value_name = "FILE")]
    pub script: PathBuf,

    /// Game config JSON file (defaults to a 5x5 pawn game)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stop at the first rejected move
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Load config and script
/// 2. Build and deploy the game
/// 3. Replay the script
/// 4. Report results
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args, seed)?;
    let moves = script::load_script(&args.script)?;

    tracing::info!(
        "Starting game '{}': {}x{} board, {} scripted moves, seed={}",
        config.name,
        config.grid_len,
        config.grid_len,
        moves.len(),
        config.seed
    );

    let mut game = setup_game(&config)?;
    let report = script::replay(&mut game, &moves, args.strict)?;

    report_results(&game, &report);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(args: &PlayArgs, seed: Option<u64>) -> Result<GameConfig> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

/// Register and deploy, printing the starting board
pub fn setup_game(config: &GameConfig) -> Result<Game> {
    let game = config.build_seeded().context("Failed to set up game")?;

    println!("Initial board:");
    print!("{}", script::format_board(&game.board_snapshot()));
    Ok(game)
}

pub fn report_results(game: &Game, report: &ReplayReport) {
    println!();
    println!(
        "Moves: {} accepted, {} rejected",
        report.accepted, report.rejected
    );
    for player in Player::ALL {
        println!("  {}: {} points", game.player_name(player), game.score(player));
    }
    match game.current_winner() {
        Some(winner) => println!("Winner: {}", game.player_name(winner)),
        None if report.wins > 0 => println!("Wins this session: {}", report.wins),
        None => println!("No winner yet"),
    }
}
