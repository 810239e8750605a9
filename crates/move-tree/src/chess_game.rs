//! `GameState` backed by shakmaty positions and pgn-reader movetext parsing.

use std::io::Cursor;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{
    fen::Fen, san::San, uci::UciMove, CastlingMode, Chess, EnPassantMode, Move, Position,
};
use tracing::debug;

use crate::error::TreeError;
use crate::game_state::{GameState, MoveInput, PlayedMove, Side};

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Movetext collected from the first game of a PGN string.
struct Mainline {
    start_fen: Option<String>,
    moves: Vec<SanPlus>,
}

/// Visitor that keeps the FEN tag and the mainline SAN tokens, skipping variations.
struct MainlineCollector;

impl Visitor for MainlineCollector {
    type Tags = Option<String>;
    type Movetext = Mainline;
    type Output = Mainline;

    fn begin_tags(&mut self) -> ControlFlow<Mainline, Option<String>> {
        ControlFlow::Continue(None)
    }

    fn tag(&mut self, tags: &mut Option<String>, name: &[u8], value: RawTag<'_>) -> ControlFlow<Mainline> {
        if name == b"FEN" {
            *tags = Some(value.decode_utf8_lossy().into_owned());
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Option<String>) -> ControlFlow<Mainline, Mainline> {
        ControlFlow::Continue(Mainline {
            start_fen: tags,
            moves: Vec::new(),
        })
    }

    fn san(&mut self, movetext: &mut Mainline, san_plus: SanPlus) -> ControlFlow<Mainline> {
        movetext.moves.push(san_plus);
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _movetext: &mut Mainline) -> ControlFlow<Mainline, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Mainline) -> Mainline {
        movetext
    }
}

/// A chess game driven by shakmaty.
#[derive(Debug, Clone)]
pub struct ChessGame {
    initial: Chess,
    position: Chess,
    history: Vec<PlayedMove>,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self {
            initial: Chess::default(),
            position: Chess::default(),
            history: Vec::new(),
        }
    }
}

impl ChessGame {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_position(encoding: &str) -> Result<Chess, TreeError> {
    let fen: Fen = encoding
        .trim()
        .parse()
        .map_err(|e| TreeError::InvalidPosition(format!("{encoding}: {e}")))?;
    fen.into_position(CastlingMode::Standard)
        .map_err(|e| TreeError::InvalidPosition(format!("{encoding}: {e}")))
}

/// Play `mv` on a copy of `pos`, returning the verbose record and the new position.
fn play_move(pos: &Chess, mv: Move) -> (PlayedMove, Chess) {
    let side = Side::from(pos.turn());
    let san = San::from_move(pos, mv.clone()).to_string();
    let uci = mv.to_uci(CastlingMode::Standard).to_string();

    let mut after = pos.clone();
    after.play_unchecked(mv);

    let suffix = if after.is_checkmate() {
        "#"
    } else if after.is_check() {
        "+"
    } else {
        ""
    };

    let played = PlayedMove {
        san: format!("{san}{suffix}"),
        from: uci[0..2].to_string(),
        to: uci[2..4].to_string(),
        promotion: uci[4..].chars().next(),
        side,
        uci,
    };
    (played, after)
}

impl GameState for ChessGame {
    fn load_notation(&mut self, text: &str) -> Result<(), TreeError> {
        let mut reader = Reader::new(Cursor::new(text.as_bytes()));
        let mainline = reader
            .read_game(&mut MainlineCollector)
            .map_err(|e| TreeError::Notation(e.to_string()))?
            .ok_or_else(|| TreeError::Notation("no game found".into()))?;

        let initial = match mainline.start_fen.as_deref() {
            Some(fen) => parse_position(fen)?,
            None => Chess::default(),
        };

        let mut pos = initial.clone();
        let mut history = Vec::with_capacity(mainline.moves.len());
        for (ply, san_plus) in mainline.moves.iter().enumerate() {
            let mv = san_plus.san.to_move(&pos).map_err(|_| TreeError::IllegalMove {
                mv: san_plus.to_string(),
                ply,
            })?;
            let (played, after) = play_move(&pos, mv);
            history.push(played);
            pos = after;
        }

        debug!(plies = history.len(), "Loaded notation");
        self.initial = initial;
        self.position = pos;
        self.history = history;
        Ok(())
    }

    fn history_verbose(&self) -> Vec<PlayedMove> {
        self.history.clone()
    }

    fn reset(&mut self) {
        self.position = self.initial.clone();
        self.history.clear();
    }

    fn position_encoding(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    fn apply_move(&mut self, mv: &MoveInput) -> Result<PlayedMove, TreeError> {
        let promotion = mv.promotion.map(String::from).unwrap_or_default();
        let text = format!("{}{}{}", mv.from, mv.to, promotion);
        let uci: UciMove = text
            .parse()
            .map_err(|_| TreeError::InvalidSquare(text.clone()))?;
        let legal = uci.to_move(&self.position).map_err(|_| TreeError::IllegalMove {
            mv: text.clone(),
            ply: self.history.len(),
        })?;

        let (played, after) = play_move(&self.position, legal);
        self.position = after;
        self.history.push(played.clone());
        Ok(played)
    }

    fn side_to_move(&self) -> Side {
        self.position.turn().into()
    }

    fn move_number(&self) -> u32 {
        self.position.fullmoves().get()
    }

    fn load_position(&mut self, encoding: &str) -> Result<(), TreeError> {
        let pos = parse_position(encoding)?;
        self.initial = pos.clone();
        self.position = pos;
        self.history.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_notation_history() {
        let mut game = ChessGame::new();
        game.load_notation("[Event \"Casual\"]\n\n1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0")
            .unwrap();

        let history = game.history_verbose();
        assert_eq!(history.len(), 7);
        assert_eq!(history[0].san, "e4");
        assert_eq!(history[0].from, "e2");
        assert_eq!(history[0].to, "e4");
        assert_eq!(history[0].side, Side::White);
        assert_eq!(history[1].side, Side::Black);
        assert_eq!(history[6].san, "Qxf7#");
        assert_eq!(history[6].uci, "h5f7");
    }

    #[test]
    fn test_variations_are_skipped() {
        let mut game = ChessGame::new();
        game.load_notation("1. e4 (1. d4 d5) 1... c5 2. Nf3 *").unwrap();
        let sans: Vec<String> = game.history_verbose().into_iter().map(|m| m.san).collect();
        assert_eq!(sans, vec!["e4", "c5", "Nf3"]);
    }

    #[test]
    fn test_illegal_notation_is_an_error() {
        let mut game = ChessGame::new();
        let err = game.load_notation("1. e4 e5 2. Nf3 Nc6 3. Ke3 *").unwrap_err();
        assert!(matches!(err, TreeError::IllegalMove { ply: 4, .. }));
    }

    #[test]
    fn test_reset_and_apply_move() {
        let mut game = ChessGame::new();
        game.load_notation("1. e4 e5 *").unwrap();
        game.reset();
        assert_eq!(game.position_encoding(), STANDARD_START_FEN);
        assert_eq!(game.side_to_move(), Side::White);

        let played = game.apply_move(&MoveInput::new("g1", "f3", None, "Nf3")).unwrap();
        assert_eq!(played.san, "Nf3");
        assert_eq!(game.side_to_move(), Side::Black);
        assert_eq!(game.move_number(), 1);
        assert_eq!(game.history_verbose().len(), 1);
    }

    #[test]
    fn test_castling_and_promotion_moves() {
        let mut game = ChessGame::new();
        game.load_position("4k3/P7/8/8/8/8/8/4K2R w K - 0 1").unwrap();

        let castle = game.apply_move(&MoveInput::new("e1", "g1", None, "")).unwrap();
        assert_eq!(castle.san, "O-O");
        assert_eq!(castle.uci, "e1g1");

        game.apply_move(&MoveInput::new("e8", "d7", None, "")).unwrap();
        let promo = game.apply_move(&MoveInput::new("a7", "a8", Some('q'), "")).unwrap();
        assert_eq!(promo.promotion, Some('q'));
        assert_eq!(promo.san, "a8=Q");
    }

    #[test]
    fn test_illegal_apply_move() {
        let mut game = ChessGame::new();
        let err = game.apply_move(&MoveInput::new("e2", "e5", None, "")).unwrap_err();
        assert!(matches!(err, TreeError::IllegalMove { ply: 0, .. }));
        assert!(game.apply_move(&MoveInput::new("z9", "e5", None, "")).is_err());
    }

    #[test]
    fn test_fen_tag_sets_initial_position() {
        let pgn = "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 12\"]\n\n12... Kd7 13. e4 *";
        let mut game = ChessGame::new();
        game.load_notation(pgn).unwrap();
        assert_eq!(game.history_verbose().len(), 2);
        assert_eq!(game.history_verbose()[0].side, Side::Black);

        game.reset();
        assert_eq!(game.position_encoding(), "4k3/8/8/8/8/8/4P3/4K3 b - - 0 12");
        assert_eq!(game.move_number(), 12);
    }
}
