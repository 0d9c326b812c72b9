//! Engine error types

use crate::board::{Direction, Pos};
use crate::game::Player;

/// Recoverable errors reported by the engine.
///
/// Every operation that returns one of these leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Unknown character type: {0}")]
    UnknownCharacterType(String),

    #[error("Duplicate abbreviation: {0}")]
    DuplicateAbbreviation(String),

    #[error("Invalid abbreviation {0:?}: must be non-empty and contain no digits")]
    InvalidAbbreviation(String),

    #[error("Illegal direction {direction} for character type {abbreviation}")]
    IllegalDirection {
        abbreviation: String,
        direction: Direction,
    },

    #[error("Unknown or dead piece {label} for {player:?}")]
    UnknownOrDeadPiece { player: Player, label: String },

    #[error("Position ({row}, {col}) is out of bounds")]
    OutOfBounds { row: isize, col: isize },

    #[error("Attacking friendly piece at {pos}")]
    FriendlyFire { pos: Pos },

    #[error("Out of turn: {expected:?} to move, got {got:?}")]
    OutOfTurn { expected: Player, got: Player },

    #[error("Game over: {winner:?} has won")]
    GameOver { winner: Player },

    #[error("Character type {abbreviation} already deployed for {player:?}")]
    AlreadyDeployed { player: Player, abbreviation: String },

    #[error("Home row full for {player:?}: need {needed} free cells, found {free}")]
    HomeRowFull {
        player: Player,
        needed: usize,
        free: usize,
    },

    #[error("Random source returned an invalid permutation of {len} labels")]
    InvalidPermutation { len: usize },

    #[error("Invalid direction: {0:?}")]
    InvalidDirection(String),

    #[error("Unknown player: {0:?}")]
    UnknownPlayer(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
