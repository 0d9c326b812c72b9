//! Move scripts and replay
//!
//! A script is a JSON array of moves:
//! `[{"player": "A", "piece": "P1", "dir": "F", "reset_on_win": true}, ...]`

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gridcap_core::{Direction, Game, GameError, MoveOutcome};

fn default_reset() -> bool {
    true
}

/// One scripted move
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedMove {
    pub player: String,
    pub piece: String,
    pub dir: String,
    #[serde(default = "default_reset")]
    pub reset_on_win: bool,
}

impl ScriptedMove {
    pub fn new(player: &str, piece: &str, dir: &str, reset_on_win: bool) -> Self {
        Self {
            player: player.to_string(),
            piece: piece.to_string(),
            dir: dir.to_string(),
            reset_on_win,
        }
    }
}

/// What happened to one scripted move
#[derive(Clone, Debug)]
pub enum StepResult {
    Accepted(MoveOutcome),
    Rejected(GameError),
}

/// Summary of a replay
#[derive(Clone, Debug, Default)]
pub struct ReplayReport {
    pub accepted: usize,
    pub rejected: usize,
    pub wins: usize,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptedMove>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    let moves = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse script: {}", path.display()))?;
    Ok(moves)
}

/// Apply one scripted move. Unknown player names and bad direction
/// tokens are rejected like any other illegal move.
pub fn step(game: &mut Game, mv: &ScriptedMove) -> StepResult {
    let player = match game.player_by_name(&mv.player) {
        Some(p) => p,
        None => return StepResult::Rejected(GameError::UnknownPlayer(mv.player.clone())),
    };

    let direction = match mv.dir.parse::<Direction>() {
        Ok(d) => d,
        Err(e) => return StepResult::Rejected(e),
    };

    match game.submit_move(player, &mv.piece, direction, mv.reset_on_win) {
        Ok(outcome) => StepResult::Accepted(outcome),
        Err(e) => StepResult::Rejected(e),
    }
}

/// Replay `moves`, printing the board after each move.
/// With `strict`, the first rejection aborts the replay.
pub fn replay(game: &mut Game, moves: &[ScriptedMove], strict: bool) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();

    for (i, mv) in moves.iter().enumerate() {
        println!("[{}] {} {} {}", i + 1, mv.player, mv.piece, mv.dir);

        match step(game, mv) {
            StepResult::Accepted(outcome) => {
                report.accepted += 1;
                if let Some(victim) = &outcome.captured {
                    println!(
                        "    captured {}-{}",
                        game.player_name(victim.owner),
                        victim.label
                    );
                }
                if let Some(winner) = outcome.winner {
                    report.wins += 1;
                    println!("    Winner is {}", game.player_name(winner));
                    if outcome.reset {
                        println!("    board reset");
                    }
                }
            }
            StepResult::Rejected(e) => {
                report.rejected += 1;
                println!("    ERROR: {}", e);
                tracing::warn!("Move {} rejected: {}", i + 1, e);
                if strict {
                    anyhow::bail!("Move {} rejected: {}", i + 1, e);
                }
            }
        }
        print!("{}", format_board(&game.board_snapshot()));
    }

    Ok(report)
}

/// Render a snapshot as aligned rows
pub fn format_board(snapshot: &[Vec<String>]) -> String {
    let width = snapshot
        .iter()
        .flatten()
        .map(|cell| cell.len())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    for row in snapshot {
        let cells: Vec<String> = row.iter().map(|c| format!("{:>width$}", c)).collect();
        out.push_str("    ");
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcap_core::{FixedOrder, GameConfig, Player};

    fn game() -> Game {
        GameConfig::default()
            .build_game(&mut FixedOrder::identity())
            .unwrap()
    }

    #[test]
    fn test_script_json_defaults_reset() {
        let json = r#"[{"player": "A", "piece": "P1", "dir": "F"}]"#;
        let moves: Vec<ScriptedMove> = serde_json::from_str(json).unwrap();
        assert_eq!(moves, vec![ScriptedMove::new("A", "P1", "F", true)]);
    }

    #[test]
    fn test_step_accepts_and_rejects() {
        let mut game = game();
        let ok = step(&mut game, &ScriptedMove::new("A", "P1", "F", true));
        assert!(matches!(ok, StepResult::Accepted(_)));

        let bad_dir = step(&mut game, &ScriptedMove::new("B", "P1", "X", true));
        assert!(matches!(bad_dir, StepResult::Rejected(GameError::InvalidDirection(_))));

        let out_of_turn = step(&mut game, &ScriptedMove::new("A", "P2", "F", true));
        assert!(matches!(out_of_turn, StepResult::Rejected(GameError::OutOfTurn { .. })));
        assert_eq!(game.to_move(), Some(Player::Two));
    }

    #[test]
    fn test_unknown_player_is_rejected() {
        let mut game = game();
        let before = game.state().clone();
        let result = step(&mut game, &ScriptedMove::new("Z", "P1", "F", true));
        assert!(matches!(
            result,
            StepResult::Rejected(GameError::UnknownPlayer(ref name)) if name == "Z"
        ));
        assert_eq!(game.state(), &before);

        let moves = vec![
            ScriptedMove::new("Z", "P1", "F", true),
            ScriptedMove::new("A", "P1", "F", true),
        ];
        let report = replay(&mut game, &moves, false).unwrap();
        assert_eq!(report.rejected, 1);
        assert_eq!(report.accepted, 1);
    }

    #[test]
    fn test_replay_counts_and_strict() {
        let moves = vec![
            ScriptedMove::new("A", "P1", "F", true),
            ScriptedMove::new("B", "P4", "F", true),
            ScriptedMove::new("A", "K4", "F", true),
        ];
        let report = replay(&mut game(), &moves, false).unwrap();
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.wins, 0);

        assert!(replay(&mut game(), &moves, true).is_err());
    }

    #[test]
    fn test_format_board_alignment() {
        let snapshot = vec![
            vec!["0".to_string(), "A-P1".to_string()],
            vec!["B-P2".to_string(), "0".to_string()],
        ];
        assert_eq!(format_board(&snapshot), "       0 A-P1\n    B-P2    0\n");
    }
}
