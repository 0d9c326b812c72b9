//! Game state, move validation, capture resolution and turn control

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Direction, Pos};
use crate::characters::{CharacterRegistry, CharacterType, DEFAULT_INSTANCE_COUNT};
use crate::error::GameError;
use crate::roster::{deploy, RandomSource, Roster};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Seed for the redeploy source when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Rendering of an empty cell in board snapshots
pub const DEFAULT_DUMMY_MARKER: &str = "0";

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player seat. `One` moves first and deploys on the bottom row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Deployment row on a board of side `grid_len`
    pub fn home_row(self, grid_len: usize) -> usize {
        match self {
            Player::One => grid_len - 1,
            Player::Two => 0,
        }
    }
}

/// A live piece on the board
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceInstance {
    pub owner: Player,
    pub abbreviation: String,
    pub label: String,
}

impl PieceInstance {
    pub fn new(owner: Player, abbreviation: &str, label: &str) -> Self {
        Self {
            owner,
            abbreviation: abbreviation.to_string(),
            label: label.to_string(),
        }
    }
}

/// Turn controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingMove(Player),
    Won(Player),
}

/// What happens to scores when the board is reset after a win
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorePolicy {
    #[default]
    Reset,
    Persist,
}

/// A move that passed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedMove {
    pub player: Player,
    pub piece: PieceInstance,
    pub from: Pos,
    pub to: Pos,
}

/// Result of an accepted move
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub player: Player,
    pub piece: PieceInstance,
    pub from: Pos,
    pub to: Pos,
    pub captured: Option<PieceInstance>,
    /// Mover's score after the move
    pub score: u32,
    pub winner: Option<Player>,
    /// Board was rebuilt and redeployed after the win
    pub reset: bool,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Board, rosters, scores and phase.
///
/// The board and roster are only written by deployment and by
/// [`GameState::apply`]; both keep the roster and the board in agreement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    roster: Roster,
    scores: [u32; 2],
    phase: Phase,
}

impl GameState {
    pub fn new(grid_len: usize) -> Result<Self, GameError> {
        Ok(Self {
            board: Board::new(grid_len)?,
            roster: Roster::new(),
            scores: [0, 0],
            phase: Phase::AwaitingMove(Player::One),
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Player to move, `None` once the game is won
    pub fn to_move(&self) -> Option<Player> {
        match self.phase {
            Phase::AwaitingMove(player) => Some(player),
            Phase::Won(_) => None,
        }
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Check a requested move without touching the state.
    ///
    /// # Panics
    ///
    /// If the roster lists the piece but no board cell holds it.
    pub fn validate(
        &self,
        registry: &CharacterRegistry,
        player: Player,
        label: &str,
        direction: Direction,
    ) -> Result<ValidatedMove, GameError> {
        let character = registry.resolve_label(label)?;

        if !character.allows(direction) {
            return Err(GameError::IllegalDirection {
                abbreviation: character.abbreviation.clone(),
                direction,
            });
        }

        if !self.roster.contains(player, &character.abbreviation, label) {
            return Err(GameError::UnknownOrDeadPiece {
                player,
                label: label.to_string(),
            });
        }

        let Some(from) = self.board.find(player, label) else {
            panic!(
                "roster lists {:?} {} but no board cell holds it",
                player, label
            );
        };

        let to = self.board.neighbor(from, direction, player)?;

        if let Cell::Occupied(occupant) = self.board.get(to)? {
            if occupant.owner == player {
                return Err(GameError::FriendlyFire { pos: to });
            }
        }

        Ok(ValidatedMove {
            player,
            piece: PieceInstance::new(player, &character.abbreviation, label),
            from,
            to,
        })
    }

    // ========================================================================
    // CAPTURE RESOLUTION
    // ========================================================================

    /// Apply a validated move, returning the captured piece if any.
    ///
    /// Assumes `mv` came from [`GameState::validate`] on this state.
    pub(crate) fn apply(&mut self, mv: &ValidatedMove) -> Option<PieceInstance> {
        let captured = match self.board.get(mv.to) {
            Ok(Cell::Occupied(occupant)) if occupant.owner != mv.player => Some(occupant.clone()),
            _ => None,
        };

        if let Some(victim) = &captured {
            let removed = self
                .roster
                .remove(victim.owner, &victim.abbreviation, &victim.label);
            assert!(removed, "captured {:?} {} was not in the roster", victim.owner, victim.label);
            self.scores[mv.player.index()] += 1;
        }

        self.board
            .set(mv.from, Cell::Empty)
            .expect("validated source is on the board");
        self.board
            .set(mv.to, Cell::Occupied(mv.piece.clone()))
            .expect("validated destination is on the board");

        captured
    }

    // ========================================================================
    // WIN DETECTION
    // ========================================================================

    /// First player whose score reached `threshold`
    pub fn check_win(&self, threshold: u32) -> Option<Player> {
        Player::ALL
            .into_iter()
            .find(|&player| self.score(player) >= threshold)
    }
}

// ============================================================================
// GAME (TURN CONTROLLER)
// ============================================================================

/// A single game: registry, state and turn control.
///
/// Games share nothing; each owns its redeploy source.
pub struct Game {
    registry: CharacterRegistry,
    state: GameState,
    player_names: [String; 2],
    dummy_marker: String,
    win_threshold: Option<u32>,
    score_policy: ScorePolicy,
    /// (player, abbreviation) in deployment order, replayed on reset
    deployments: Vec<(Player, String)>,
    redeploy_source: Box<dyn RandomSource>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("registry", &self.registry)
            .field("state", &self.state)
            .field("player_names", &self.player_names)
            .field("win_threshold", &self.win_threshold)
            .field("score_policy", &self.score_policy)
            .finish_non_exhaustive()
    }
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Start a game on an empty `grid_len` x `grid_len` board
    pub fn new(grid_len: usize) -> Result<Self, GameError> {
        Ok(Self {
            registry: CharacterRegistry::new(),
            state: GameState::new(grid_len)?,
            player_names: ["A".to_string(), "B".to_string()],
            dummy_marker: DEFAULT_DUMMY_MARKER.to_string(),
            win_threshold: None,
            score_policy: ScorePolicy::default(),
            deployments: Vec::new(),
            redeploy_source: Box::new(ChaCha8Rng::seed_from_u64(DEFAULT_SEED)),
        })
    }

    pub fn with_player_names(mut self, one: impl Into<String>, two: impl Into<String>) -> Self {
        self.player_names = [one.into(), two.into()];
        self
    }

    pub fn with_dummy_marker(mut self, marker: impl Into<String>) -> Self {
        self.dummy_marker = marker.into();
        self
    }

    pub fn with_win_threshold(mut self, threshold: u32) -> Self {
        self.win_threshold = Some(threshold);
        self
    }

    pub fn with_score_policy(mut self, policy: ScorePolicy) -> Self {
        self.score_policy = policy;
        self
    }

    /// Source used to redeploy after a reset
    pub fn with_redeploy_source(mut self, source: impl RandomSource + 'static) -> Self {
        self.redeploy_source = Box::new(source);
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn registry(&self) -> &CharacterRegistry {
        &self.registry
    }

    pub fn score(&self, player: Player) -> u32 {
        self.state.score(player)
    }

    pub fn to_move(&self) -> Option<Player> {
        self.state.to_move()
    }

    pub fn player_name(&self, player: Player) -> &str {
        &self.player_names[player.index()]
    }

    /// Seat for a display name
    pub fn player_by_name(&self, name: &str) -> Option<Player> {
        Player::ALL
            .into_iter()
            .find(|&p| self.player_names[p.index()] == name)
    }

    /// Configured threshold, else the primary type's instance count
    pub fn win_threshold(&self) -> u32 {
        self.win_threshold.unwrap_or_else(|| {
            let count = self
                .registry
                .primary()
                .map_or(DEFAULT_INSTANCE_COUNT, |ct| ct.count);
            u32::try_from(count).unwrap_or(u32::MAX)
        })
    }

    // ========================================================================
    // SETUP
    // ========================================================================

    pub fn register_character_type(&mut self, character: CharacterType) -> Result<(), GameError> {
        let ct = self.registry.register(character)?;
        tracing::debug!(
            "Registered character type {} ({}) directions={:?} count={}",
            ct.name,
            ct.abbreviation,
            ct.legal_directions(),
            ct.count
        );
        Ok(())
    }

    /// Place `player`'s instances of `abbreviation` on their home row
    pub fn deploy<R: RandomSource + ?Sized>(
        &mut self,
        player: Player,
        abbreviation: &str,
        rng: &mut R,
    ) -> Result<Vec<Pos>, GameError> {
        let character = self.registry.lookup(abbreviation)?;
        let placed = deploy(
            &mut self.state.board,
            &mut self.state.roster,
            player,
            character,
            rng,
        )?;
        let recorded = self
            .deployments
            .iter()
            .any(|(p, abbr)| *p == player && abbr == abbreviation);
        if !recorded {
            self.deployments.push((player, abbreviation.to_string()));
        }
        tracing::info!(
            "Deployed {} x{} for {}",
            abbreviation,
            placed.len(),
            self.player_name(player)
        );
        Ok(placed)
    }

    // ========================================================================
    // TURNS
    // ========================================================================

    /// Submit a move for `player`.
    ///
    /// On error nothing changes and the turn does not pass.
    pub fn submit_move(
        &mut self,
        player: Player,
        label: &str,
        direction: Direction,
        reset_on_win: bool,
    ) -> Result<MoveOutcome, GameError> {
        let expected = match self.state.phase {
            Phase::Won(winner) => return Err(GameError::GameOver { winner }),
            Phase::AwaitingMove(current) => current,
        };
        if player != expected {
            return Err(GameError::OutOfTurn {
                expected,
                got: player,
            });
        }

        let mv = self
            .state
            .validate(&self.registry, player, label, direction)
            .map_err(|e| {
                tracing::debug!(
                    "Rejected {} {} {}: {}",
                    self.player_name(player),
                    label,
                    direction,
                    e
                );
                e
            })?;

        // Nothing is committed until the redeploy, if any, has succeeded
        let mut next = self.state.clone();
        let captured = next.apply(&mv);
        let score = next.score(player);
        let winner = next.check_win(self.win_threshold());
        let mut reset = false;
        match winner {
            Some(winner) => {
                next.phase = Phase::Won(winner);
                if reset_on_win {
                    next = self.redeployed(next.scores)?;
                    reset = true;
                }
            }
            None => next.phase = Phase::AwaitingMove(player.opponent()),
        }
        self.state = next;

        match &captured {
            Some(victim) => tracing::info!(
                "{} {} {} -> {} captures {}-{} (score {})",
                self.player_name(player),
                label,
                mv.from,
                mv.to,
                self.player_name(victim.owner),
                victim.label,
                score
            ),
            None => tracing::debug!(
                "{} {} {} -> {}",
                self.player_name(player),
                label,
                mv.from,
                mv.to
            ),
        }
        if let Some(winner) = winner {
            tracing::info!("Winner is {}", self.player_name(winner));
            if reset {
                tracing::info!("Board reset ({:?} scores)", self.score_policy);
            }
        }

        Ok(MoveOutcome {
            player,
            piece: mv.piece,
            from: mv.from,
            to: mv.to,
            captured,
            score,
            winner,
            reset,
        })
    }

    /// Player whose score reached the win threshold
    pub fn check_win(&self) -> Option<Player> {
        self.state.check_win(self.win_threshold())
    }

    /// Winner of the current game, if it has ended and not been reset
    pub fn current_winner(&self) -> Option<Player> {
        match self.state.phase {
            Phase::Won(winner) => Some(winner),
            Phase::AwaitingMove(_) => None,
        }
    }

    /// Rebuild the board and roster and replay every deployment with the
    /// redeploy source. Player one moves next.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.state = self.redeployed(self.state.scores)?;
        tracing::info!("Board reset ({:?} scores)", self.score_policy);
        Ok(())
    }

    /// Freshly deployed state. `scores` carry over under `ScorePolicy::Persist`.
    fn redeployed(&mut self, scores: [u32; 2]) -> Result<GameState, GameError> {
        let mut fresh = GameState::new(self.state.board.grid_len())?;
        if self.score_policy == ScorePolicy::Persist {
            fresh.scores = scores;
        }

        for (player, abbr) in &self.deployments {
            let character = self.registry.lookup(abbr)?;
            deploy(
                &mut fresh.board,
                &mut fresh.roster,
                *player,
                character,
                &mut *self.redeploy_source,
            )?;
        }
        Ok(fresh)
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    /// Grid of cell labels: the dummy marker for empty cells,
    /// `<player>-<label>` for occupied ones
    pub fn board_snapshot(&self) -> Vec<Vec<String>> {
        let len = self.state.board.grid_len();
        (0..len)
            .map(|row| {
                self.state
                    .board
                    .row(row)
                    .iter()
                    .map(|cell| match cell {
                        Cell::Empty => self.dummy_marker.clone(),
                        Cell::Occupied(p) => format!("{}-{}", self.player_name(p.owner), p.label),
                    })
                    .collect()
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
