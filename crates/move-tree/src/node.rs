//! Nodes of the move tree and their id scheme.

use std::cmp::Ordering;

use crate::analysis::ScoreKind;
use crate::game_state::{PlayedMove, Side};

/// Full-move number plus the side that made the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveNumber {
    pub number: u32,
    pub side: Side,
}

impl MoveNumber {
    pub fn new(number: u32, side: Side) -> Self {
        Self { number, side }
    }

    /// `n` for White's move, `n + 0.5` for Black's, so values interleave by ply.
    pub fn value(self) -> f32 {
        match self.side {
            Side::White => self.number as f32,
            Side::Black => self.number as f32 + 0.5,
        }
    }
}

impl Ord for MoveNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.side.cmp(&other.side))
    }
}

impl PartialOrd for MoveNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One ply of the game, or the synthetic root.
#[derive(Debug, Clone)]
pub struct MoveNode {
    pub id: String,
    /// None for the root
    pub move_number: Option<MoveNumber>,
    /// Display text of the move that produced this node (None for the root)
    pub move_text: Option<String>,
    pub detail: Option<PlayedMove>,
    /// Position encoding after the move, fixed at creation
    pub position_key: String,
    /// Index into the mainline when the node lies on it
    pub mainline_index: Option<usize>,
    pub clock_remaining: Option<String>,
    pub classification: Option<String>,
    pub evaluation_score: Option<f64>,
    pub evaluation_kind: Option<ScoreKind>,
    pub(crate) slot: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

impl MoveNode {
    pub(crate) fn root(position_key: String) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            move_number: None,
            move_text: None,
            detail: None,
            position_key,
            mainline_index: Some(0),
            clock_remaining: None,
            classification: None,
            evaluation_score: None,
            evaluation_kind: None,
            slot: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn new(
        id: String,
        slot: usize,
        parent: usize,
        move_number: MoveNumber,
        move_text: String,
        detail: PlayedMove,
        position_key: String,
    ) -> Self {
        Self {
            id,
            move_number: Some(move_number),
            move_text: Some(move_text),
            detail: Some(detail),
            position_key,
            mainline_index: None,
            clock_remaining: None,
            classification: None,
            evaluation_score: None,
            evaluation_kind: None,
            slot,
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_mainline(&self) -> bool {
        self.mainline_index.is_some()
    }
}

pub const ROOT_ID: &str = "root";

/// Id for a mainline ply: `{number}-{w|b}-{move text}` with check and mate
/// markers spelled out.
pub fn mainline_id(move_number: MoveNumber, move_text: &str) -> String {
    format!(
        "{}-{}-{}",
        move_number.number,
        move_number.side.letter(),
        sanitize_move_text(move_text)
    )
}

/// Mainline id plus a tree-scoped counter.
pub fn variation_id(move_number: MoveNumber, move_text: &str, counter: u64) -> String {
    format!("{}-v{}", mainline_id(move_number, move_text), counter)
}

fn sanitize_move_text(move_text: &str) -> String {
    move_text.replace('+', "check").replace('#', "mate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_number_value() {
        assert_eq!(MoveNumber::new(1, Side::White).value(), 1.0);
        assert_eq!(MoveNumber::new(1, Side::Black).value(), 1.5);
        assert!(MoveNumber::new(1, Side::Black) < MoveNumber::new(2, Side::White));
        assert!(MoveNumber::new(3, Side::White) < MoveNumber::new(3, Side::Black));
    }

    #[test]
    fn test_ids() {
        assert_eq!(mainline_id(MoveNumber::new(1, Side::White), "e4"), "1-w-e4");
        assert_eq!(mainline_id(MoveNumber::new(3, Side::Black), "Bb4+"), "3-b-Bb4check");
        assert_eq!(mainline_id(MoveNumber::new(4, Side::White), "Qxf7#"), "4-w-Qxf7mate");
        assert_eq!(variation_id(MoveNumber::new(1, Side::White), "d4", 7), "1-w-d4-v7");
    }
}
