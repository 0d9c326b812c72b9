//! GRIDCAP Core - Rules engine for a two-player grid capture game
//!
//! This crate provides the game logic:
//! - Square board with row/column coordinates
//! - Character types and their legal move directions
//! - Rosters and home-row deployment from an injected random source
//! - Move validation, capture resolution and turn control
//! - Game configuration loaded from JSON

pub mod board;
pub mod characters;
pub mod config;
pub mod error;
pub mod game;
pub mod roster;

// Re-exports for convenient access
pub use board::{Board, Cell, Direction, Pos, DEFAULT_GRID_LEN};
pub use characters::{CharacterRegistry, CharacterType, ALL_DIRS, DIR_B, DIR_F, DIR_L, DIR_R};
pub use config::{CharacterSpec, GameConfig};
pub use error::GameError;
pub use game::{Game, GameState, MoveOutcome, Phase, PieceInstance, Player, ScorePolicy, ValidatedMove};
pub use roster::{FixedOrder, RandomSource, Roster};
