//! Rules engine boundary consumed by the move tree.
//!
//! The tree never generates or validates moves itself. Everything it knows
//! about legality, notation and positions comes through [`GameState`].

use serde::{Deserialize, Serialize};

use crate::error::TreeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Single-letter form used in FEN and node ids.
    pub fn letter(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl From<shakmaty::Color> for Side {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Side::White,
            shakmaty::Color::Black => Side::Black,
        }
    }
}

/// A move as supplied by a caller exploring the tree (e.g. a drag on a board).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInput {
    pub from: String,
    pub to: String,
    /// Lowercase promotion piece letter (`q`, `r`, `b`, `n`)
    pub promotion: Option<char>,
    /// Display text (SAN)
    pub san: String,
}

impl MoveInput {
    pub fn new(from: &str, to: &str, promotion: Option<char>, san: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            promotion,
            san: san.to_string(),
        }
    }

    /// Parse a UCI string such as `e2e4` or `e7e8q`. The SAN is left empty
    /// and filled in by the rules engine when the move is applied.
    pub fn from_uci(uci: &str) -> Option<Self> {
        let uci = uci.trim();
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            return None;
        }
        Some(Self {
            from: uci[0..2].to_string(),
            to: uci[2..4].to_string(),
            promotion: uci[4..].chars().next(),
            san: String::new(),
        })
    }
}

/// Verbose history record of a move accepted by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub san: String,
    pub from: String,
    pub to: String,
    pub promotion: Option<char>,
    pub side: Side,
    /// Long algebraic form, e.g. `e7e8q`
    pub uci: String,
}

impl PlayedMove {
    /// Two moves are the same if they share from, to and promotion.
    pub fn same_move(&self, other: &PlayedMove) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }

    pub fn to_input(&self) -> MoveInput {
        MoveInput {
            from: self.from.clone(),
            to: self.to.clone(),
            promotion: self.promotion,
            san: self.san.clone(),
        }
    }
}

/// Capability exposed by an external chess rules engine.
pub trait GameState {
    /// Load a full game record, replacing any previous state.
    fn load_notation(&mut self, text: &str) -> Result<(), TreeError>;

    /// Moves of the loaded game in play order.
    fn history_verbose(&self) -> Vec<PlayedMove>;

    /// Return to the initial position of the loaded game.
    fn reset(&mut self);

    fn position_encoding(&self) -> String;

    fn apply_move(&mut self, mv: &MoveInput) -> Result<PlayedMove, TreeError>;

    fn side_to_move(&self) -> Side;

    fn move_number(&self) -> u32;

    fn load_position(&mut self, encoding: &str) -> Result<(), TreeError>;
}
