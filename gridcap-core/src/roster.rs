//! Live piece bookkeeping and home-row deployment

use std::collections::{BTreeSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::board::{Board, Cell, Pos};
use crate::characters::CharacterType;
use crate::error::GameError;
use crate::game::{PieceInstance, Player};

// ============================================================================
// RANDOM SOURCE
// ============================================================================

/// Source of deployment orderings
pub trait RandomSource {
    /// A permutation of `0..len`
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}

impl<R: Rng> RandomSource for R {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(self);
        order
    }
}

/// Scripted orderings, consumed one per deployment. Falls back to the
/// identity ordering once the script runs out.
#[derive(Clone, Debug, Default)]
pub struct FixedOrder {
    script: VecDeque<Vec<usize>>,
}

impl FixedOrder {
    /// Always deploy labels in ascending order
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn new(orders: Vec<Vec<usize>>) -> Self {
        Self {
            script: orders.into(),
        }
    }
}

impl RandomSource for FixedOrder {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        self.script
            .pop_front()
            .unwrap_or_else(|| (0..len).collect())
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

// ============================================================================
// ROSTER
// ============================================================================

/// Live instance labels per (player, character abbreviation)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    entries: FxHashMap<(Player, String), BTreeSet<String>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: Player, abbreviation: &str, label: &str) -> bool {
        self.entries
            .entry((player, abbreviation.to_string()))
            .or_default()
            .insert(label.to_string())
    }

    /// Remove a label. Returns whether it was live.
    pub fn remove(&mut self, player: Player, abbreviation: &str, label: &str) -> bool {
        let key = (player, abbreviation.to_string());
        let Some(labels) = self.entries.get_mut(&key) else {
            return false;
        };
        let removed = labels.remove(label);
        if labels.is_empty() {
            self.entries.remove(&key);
        }
        removed
    }

    pub fn contains(&self, player: Player, abbreviation: &str, label: &str) -> bool {
        self.entries
            .get(&(player, abbreviation.to_string()))
            .is_some_and(|labels| labels.contains(label))
    }

    /// Live labels of one type, in label order
    pub fn labels(&self, player: Player, abbreviation: &str) -> Vec<&str> {
        self.entries
            .get(&(player, abbreviation.to_string()))
            .map(|labels| labels.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_live(&self, player: Player, abbreviation: &str) -> bool {
        self.entries.contains_key(&(player, abbreviation.to_string()))
    }

    /// Total live instances for a player across all types
    pub fn live_count(&self, player: Player) -> usize {
        self.entries
            .iter()
            .filter(|((owner, _), _)| *owner == player)
            .map(|(_, labels)| labels.len())
            .sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ============================================================================
// DEPLOYMENT
// ============================================================================

/// Place every instance of `character` on `player`'s home row.
///
/// Labels are permuted by `rng` and written into the free columns of the
/// home row from column 0 upward. Nothing is written on failure.
pub(crate) fn deploy<R: RandomSource + ?Sized>(
    board: &mut Board,
    roster: &mut Roster,
    player: Player,
    character: &CharacterType,
    rng: &mut R,
) -> Result<Vec<Pos>, GameError> {
    let abbr = character.abbreviation.as_str();
    if roster.has_live(player, abbr) {
        return Err(GameError::AlreadyDeployed {
            player,
            abbreviation: abbr.to_string(),
        });
    }

    let row = player.home_row(board.grid_len());
    let free: Vec<Pos> = board
        .row(row)
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_empty())
        .map(|(col, _)| Pos::new(row, col))
        .collect();
    if free.len() < character.count {
        return Err(GameError::HomeRowFull {
            player,
            needed: character.count,
            free: free.len(),
        });
    }

    let order = rng.permutation(character.count);
    if !is_permutation(&order, character.count) {
        return Err(GameError::InvalidPermutation {
            len: character.count,
        });
    }

    let placed: Vec<Pos> = free.into_iter().take(character.count).collect();
    for (&pos, &idx) in placed.iter().zip(&order) {
        let label = character.label(idx + 1);
        let piece = PieceInstance::new(player, abbr, &label);
        board.set(pos, Cell::Occupied(piece))?;
        roster.insert(player, abbr, &label);
    }

    Ok(placed)
}
