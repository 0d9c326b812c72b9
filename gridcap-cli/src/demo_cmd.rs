//! Demo command - replay the built-in sample moves on the default game

use anyhow::Result;
use clap::Args;

use gridcap_core::GameConfig;

use crate::play_cmd::{report_results, setup_game};
use crate::script::{self, ScriptedMove};

#[derive(Args)]
pub struct DemoArgs {
    /// Board side length
    #[arg(long, default_value = "5")]
    pub grid_len: usize,
}

/// Sample moves: two openers, an unknown piece type, and a follow-up
pub fn sample_moves() -> Vec<ScriptedMove> {
    vec![
        ScriptedMove::new("A", "P1", "F", true),
        ScriptedMove::new("B", "P4", "F", true),
        ScriptedMove::new("A", "K4", "F", true),
        ScriptedMove::new("A", "P4", "F", true),
    ]
}

pub fn run(args: DemoArgs, seed: Option<u64>) -> Result<()> {
    let mut config = GameConfig::default().with_grid_len(args.grid_len);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    tracing::info!("Running demo: {}x{} board, seed={}", config.grid_len, config.grid_len, config.seed);

    let mut game = setup_game(&config)?;
    let report = script::replay(&mut game, &sample_moves(), false)?;
    report_results(&game, &report);
    Ok(())
}
