//! Character type definitions and the registry

use rustc_hash::FxHashMap;

use crate::board::Direction;
use crate::error::GameError;

/// Direction bitmasks
pub const DIR_F: u8 = 1 << 0; // Forward
pub const DIR_B: u8 = 1 << 1; // Backward
pub const DIR_L: u8 = 1 << 2; // Left
pub const DIR_R: u8 = 1 << 3; // Right

pub const ALL_DIRS: u8 = DIR_F | DIR_B | DIR_L | DIR_R;
pub const FORWARD_BACK: u8 = DIR_F | DIR_B;
pub const SIDEWAYS: u8 = DIR_L | DIR_R;

/// Instances each player receives per character type
pub const DEFAULT_INSTANCE_COUNT: usize = 5;

/// Bit for a single direction
pub fn direction_bit(direction: Direction) -> u8 {
    1 << direction.index()
}

/// Fold a list of directions into a bitmask
pub fn direction_mask(directions: &[Direction]) -> u8 {
    directions.iter().fold(0, |mask, &d| mask | direction_bit(d))
}

/// A category of piece
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterType {
    pub name: String,
    pub abbreviation: String,
    pub directions: u8, // Bitmask of allowed directions
    pub count: usize,
}

impl CharacterType {
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>, directions: u8) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            directions,
            count: DEFAULT_INSTANCE_COUNT,
        }
    }

    /// The five-pawn type used by the default game
    pub fn pawn() -> Self {
        Self::new("pawn", "P", ALL_DIRS)
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn allows(&self, direction: Direction) -> bool {
        self.directions & direction_bit(direction) != 0
    }

    pub fn legal_directions(&self) -> Vec<Direction> {
        Direction::ALL.into_iter().filter(|&d| self.allows(d)).collect()
    }

    /// Label of the `n`th instance (1-based)
    pub fn label(&self, n: usize) -> String {
        format!("{}{}", self.abbreviation, n)
    }

    pub fn labels(&self) -> Vec<String> {
        (1..=self.count).map(|n| self.label(n)).collect()
    }
}

/// Abbreviation part of an instance label: everything before the
/// trailing digit run. `None` when there is no prefix or no number.
pub fn abbreviation_of(label: &str) -> Option<&str> {
    let abbr = label.trim_end_matches(|c: char| c.is_ascii_digit());
    if abbr.is_empty() || abbr.len() == label.len() {
        None
    } else {
        Some(abbr)
    }
}

/// Registered character types, keyed by abbreviation
#[derive(Clone, Debug, Default)]
pub struct CharacterRegistry {
    types: FxHashMap<String, CharacterType>,
    order: Vec<String>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, character: CharacterType) -> Result<&CharacterType, GameError> {
        let abbr = character.abbreviation.clone();
        if abbr.is_empty() || abbr.chars().any(|c| c.is_ascii_digit() || c.is_whitespace()) {
            return Err(GameError::InvalidAbbreviation(abbr));
        }
        if character.count == 0 {
            return Err(GameError::InvalidConfig(format!(
                "character type {} needs at least one instance",
                abbr
            )));
        }
        if self.types.contains_key(&abbr) {
            return Err(GameError::DuplicateAbbreviation(abbr));
        }

        self.order.push(abbr.clone());
        let registered: &CharacterType = self.types.entry(abbr).or_insert(character);
        Ok(registered)
    }

    pub fn lookup(&self, abbreviation: &str) -> Result<&CharacterType, GameError> {
        self.types
            .get(abbreviation)
            .ok_or_else(|| GameError::UnknownCharacterType(abbreviation.to_string()))
    }

    /// Character type an instance label belongs to
    pub fn resolve_label(&self, label: &str) -> Result<&CharacterType, GameError> {
        let abbr = abbreviation_of(label)
            .ok_or_else(|| GameError::UnknownCharacterType(label.to_string()))?;
        self.lookup(abbr)
    }

    /// First registered type; its instance count is the default win threshold
    pub fn primary(&self) -> Option<&CharacterType> {
        self.order.first().and_then(|abbr| self.types.get(abbr))
    }

    /// Types in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CharacterType> + '_ {
        self.order.iter().filter_map(move |abbr| self.types.get(abbr))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CharacterRegistry::new();
        registry.register(CharacterType::pawn()).unwrap();
        registry
            .register(CharacterType::new("rook", "Rk", FORWARD_BACK).with_count(2))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("P").unwrap().name, "pawn");
        assert_eq!(registry.lookup("Rk").unwrap().count, 2);
        assert_eq!(
            registry.lookup("K"),
            Err(GameError::UnknownCharacterType("K".to_string()))
        );
        assert_eq!(registry.primary().unwrap().abbreviation, "P");
    }

    #[test]
    fn test_duplicate_abbreviation() {
        let mut registry = CharacterRegistry::new();
        registry.register(CharacterType::pawn()).unwrap();
        let err = registry
            .register(CharacterType::new("prince", "P", DIR_F))
            .unwrap_err();
        assert_eq!(err, GameError::DuplicateAbbreviation("P".to_string()));
        assert_eq!(registry.lookup("P").unwrap().name, "pawn");
    }

    #[test]
    fn test_invalid_abbreviation() {
        let mut registry = CharacterRegistry::new();
        assert!(matches!(
            registry.register(CharacterType::new("x", "", ALL_DIRS)),
            Err(GameError::InvalidAbbreviation(_))
        ));
        assert!(matches!(
            registry.register(CharacterType::new("x", "P2", ALL_DIRS)),
            Err(GameError::InvalidAbbreviation(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_abbreviation_of() {
        assert_eq!(abbreviation_of("P3"), Some("P"));
        assert_eq!(abbreviation_of("Rk12"), Some("Rk"));
        assert_eq!(abbreviation_of("P"), None);
        assert_eq!(abbreviation_of("42"), None);
        assert_eq!(abbreviation_of(""), None);
    }

    #[test]
    fn test_resolve_label() {
        let mut registry = CharacterRegistry::new();
        registry.register(CharacterType::pawn()).unwrap();
        assert_eq!(registry.resolve_label("P4").unwrap().abbreviation, "P");
        assert_eq!(
            registry.resolve_label("K4"),
            Err(GameError::UnknownCharacterType("K".to_string()))
        );
    }

    #[test]
    fn test_directions_and_labels() {
        let rook = CharacterType::new("rook", "R", FORWARD_BACK).with_count(3);
        assert!(rook.allows(Direction::Forward));
        assert!(!rook.allows(Direction::Left));
        assert_eq!(rook.legal_directions(), vec![Direction::Forward, Direction::Backward]);
        assert_eq!(rook.labels(), vec!["R1", "R2", "R3"]);
        assert_eq!(direction_mask(&[Direction::Left, Direction::Right]), SIDEWAYS);
    }
}
