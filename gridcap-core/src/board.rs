//! Square board geometry with row/column coordinates

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::{PieceInstance, Player};

/// Default board side length
pub const DEFAULT_GRID_LEN: usize = 5;

/// Board coordinates. Row 0 is player two's home row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Move direction relative to the moving player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "F", alias = "f")]
    Forward,
    #[serde(rename = "B", alias = "b")]
    Backward,
    #[serde(rename = "L", alias = "l")]
    Left,
    #[serde(rename = "R", alias = "r")]
    Right,
}

/// Direction vectors (drow, dcol) as seen by player one
/// Index: 0=F, 1=B, 2=L, 3=R
pub const DIRECTIONS: [(i8, i8); 4] = [
    (-1, 0), // F
    (1, 0),  // B
    (0, -1), // L
    (0, 1),  // R
];

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Backward => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Single-letter token
    pub fn letter(self) -> char {
        match self {
            Direction::Forward => 'F',
            Direction::Backward => 'B',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    /// Vector for `player`. Forward/backward flip for player two,
    /// left/right never do.
    pub fn vector(self, player: Player) -> (i8, i8) {
        let (dr, dc) = DIRECTIONS[self.index()];
        match player {
            Player::One => (dr, dc),
            Player::Two => (-dr, dc),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "F" => Ok(Direction::Forward),
            "B" => Ok(Direction::Backward),
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            _ => Err(GameError::InvalidDirection(s.to_string())),
        }
    }
}

/// A board cell
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(PieceInstance),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn piece(&self) -> Option<&PieceInstance> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(piece) => Some(piece),
        }
    }
}

/// Fixed-size square grid, row-major
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    grid_len: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Allocate a `grid_len` x `grid_len` board of empty cells
    pub fn new(grid_len: usize) -> Result<Self, GameError> {
        if grid_len == 0 {
            return Err(GameError::InvalidConfig("grid length must be at least 1".to_string()));
        }
        Ok(Self {
            grid_len,
            cells: vec![Cell::Empty; grid_len * grid_len],
        })
    }

    pub fn grid_len(&self) -> usize {
        self.grid_len
    }

    fn index(&self, pos: Pos) -> Result<usize, GameError> {
        if pos.row < self.grid_len && pos.col < self.grid_len {
            Ok(pos.row * self.grid_len + pos.col)
        } else {
            Err(GameError::OutOfBounds {
                row: pos.row as isize,
                col: pos.col as isize,
            })
        }
    }

    pub fn get(&self, pos: Pos) -> Result<&Cell, GameError> {
        let idx = self.index(pos)?;
        Ok(&self.cells[idx])
    }

    /// Write a cell, returning what was there before
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<Cell, GameError> {
        let idx = self.index(pos)?;
        Ok(std::mem::replace(&mut self.cells[idx], cell))
    }

    /// Neighbouring position one step in `direction` for `player`
    pub fn neighbor(&self, pos: Pos, direction: Direction, player: Player) -> Result<Pos, GameError> {
        let (dr, dc) = direction.vector(player);
        let row = pos.row as isize + dr as isize;
        let col = pos.col as isize + dc as isize;
        let len = self.grid_len as isize;
        if row < 0 || row >= len || col < 0 || col >= len {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(Pos::new(row as usize, col as usize))
    }

    /// Iterate all cells with their positions
    pub fn cells(&self) -> impl Iterator<Item = (Pos, &Cell)> + '_ {
        let len = self.grid_len;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Pos::new(i / len, i % len), cell))
    }

    /// Iterate occupied cells
    pub fn pieces(&self) -> impl Iterator<Item = (Pos, &PieceInstance)> + '_ {
        self.cells().filter_map(|(pos, cell)| cell.piece().map(|p| (pos, p)))
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.grid_len;
        &self.cells[start..start + self.grid_len]
    }

    /// Board scan for the cell holding `owner`'s instance `label`
    pub fn find(&self, owner: Player, label: &str) -> Option<Pos> {
        self.pieces()
            .find(|(_, p)| p.owner == owner && p.label == label)
            .map(|(pos, _)| pos)
    }
}
