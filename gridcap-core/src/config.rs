//! GameConfig - board size, players and character roster definition

use std::path::Path;

use anyhow::Context;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Direction, DEFAULT_GRID_LEN};
use crate::characters::{direction_mask, CharacterType, DEFAULT_INSTANCE_COUNT};
use crate::error::GameError;
use crate::game::{Game, Player, ScorePolicy, DEFAULT_DUMMY_MARKER, DEFAULT_SEED};
use crate::roster::RandomSource;

fn default_count() -> usize {
    DEFAULT_INSTANCE_COUNT
}

/// One character type as written in a config file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSpec {
    pub name: String,
    pub abbreviation: String,
    pub directions: Vec<Direction>,
    #[serde(default = "default_count")]
    pub count: usize,
}

impl CharacterSpec {
    pub fn to_character_type(&self) -> CharacterType {
        CharacterType::new(
            self.name.clone(),
            self.abbreviation.clone(),
            direction_mask(&self.directions),
        )
        .with_count(self.count)
    }
}

/// Everything needed to set up a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub name: String,
    pub grid_len: usize,
    pub dummy_marker: String,
    pub player_names: [String; 2],
    pub characters: Vec<CharacterSpec>,
    /// `None` uses the first character type's instance count
    pub win_threshold: Option<u32>,
    pub score_policy: ScorePolicy,
    /// Seed for deployment and for redeploys after a reset
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            grid_len: DEFAULT_GRID_LEN,
            dummy_marker: DEFAULT_DUMMY_MARKER.to_string(),
            player_names: ["A".to_string(), "B".to_string()],
            characters: vec![CharacterSpec {
                name: "pawn".to_string(),
                abbreviation: "P".to_string(),
                directions: Direction::ALL.to_vec(),
                count: DEFAULT_INSTANCE_COUNT,
            }],
            win_threshold: None,
            score_policy: ScorePolicy::Reset,
            seed: DEFAULT_SEED,
        }
    }
}

impl GameConfig {
    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_grid_len(mut self, grid_len: usize) -> Self {
        self.grid_len = grid_len;
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

    /// Checks that do not need a board: names and character list
    pub fn validate(&self) -> Result<(), GameError> {
        let [one, two] = &self.player_names;
        if one.is_empty() || two.is_empty() {
            return Err(GameError::InvalidConfig("player names must be non-empty".to_string()));
        }
        if one == two {
            return Err(GameError::InvalidConfig(format!(
                "player names must differ, both are {:?}",
                one
            )));
        }
        if self.characters.is_empty() {
            return Err(GameError::InvalidConfig("no character types defined".to_string()));
        }
        if self.win_threshold == Some(0) {
            return Err(GameError::InvalidConfig("win threshold must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Game with every character type registered, nothing deployed yet
    pub fn new_game(&self) -> Result<Game, GameError> {
        self.validate()?;

        let mut game = Game::new(self.grid_len)?
            .with_player_names(self.player_names[0].clone(), self.player_names[1].clone())
            .with_dummy_marker(self.dummy_marker.clone())
            .with_score_policy(self.score_policy)
            .with_redeploy_source(ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(1)));
        if let Some(threshold) = self.win_threshold {
            game = game.with_win_threshold(threshold);
        }

        for spec in &self.characters {
            game.register_character_type(spec.to_character_type())?;
        }
        Ok(game)
    }

    /// Registered and deployed game: player one's types, then player two's
    pub fn build_game<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<Game, GameError> {
        let mut game = self.new_game()?;
        for player in Player::ALL {
            for spec in &self.characters {
                game.deploy(player, &spec.abbreviation, &mut *rng)?;
            }
        }
        Ok(game)
    }

    /// Build with a generator seeded from `seed`
    pub fn build_seeded(&self) -> Result<Game, GameError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.build_game(&mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::FixedOrder;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_len, 5);
        assert_eq!(config.dummy_marker, "0");
        assert_eq!(config.player_names, ["A".to_string(), "B".to_string()]);
        assert_eq!(config.characters.len(), 1);
        assert_eq!(config.score_policy, ScorePolicy::Reset);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_build_game_deploys_both_players() {
        let game = GameConfig::default()
            .build_game(&mut FixedOrder::identity())
            .unwrap();
        let snap = game.board_snapshot();
        assert_eq!(snap[4], vec!["A-P1", "A-P2", "A-P3", "A-P4", "A-P5"]);
        assert_eq!(snap[0], vec!["B-P1", "B-P2", "B-P3", "B-P4", "B-P5"]);
        assert_eq!(game.win_threshold(), 5);
    }

    #[test]
    fn test_build_seeded_is_reproducible() {
        let config = GameConfig::default().with_seed(9);
        let a = config.build_seeded().unwrap();
        let b = config.build_seeded().unwrap();
        assert_eq!(a.board_snapshot(), b.board_snapshot());
    }

    #[test]
    fn test_invalid_names() {
        let mut config = GameConfig::default();
        config.player_names = ["A".to_string(), "A".to_string()];
        assert!(matches!(config.new_game(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_win_threshold_rejected() {
        let config = GameConfig::default().with_win_threshold(0);
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
        assert!(config.build_seeded().is_err());
        assert!(GameConfig::default().with_win_threshold(1).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "grid_len": 6,
            "characters": [
                { "name": "rook", "abbreviation": "R", "directions": ["F", "b"], "count": 3 }
            ],
            "score_policy": "persist"
        }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid_len, 6);
        assert_eq!(config.dummy_marker, "0");
        assert_eq!(config.score_policy, ScorePolicy::Persist);

        let rook = config.characters[0].to_character_type();
        assert!(rook.allows(Direction::Backward));
        assert!(!rook.allows(Direction::Left));
        assert_eq!(rook.count, 3);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("gridcap-config-{}.json", std::process::id()));
        let config = GameConfig::default().with_grid_len(7).with_win_threshold(3);
        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
