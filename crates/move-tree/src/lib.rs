pub mod analysis;
pub mod chess_game;
pub mod error;
pub mod game_data;
pub mod game_state;
pub mod node;
pub mod pgn;
pub mod summary;
pub mod tree;

pub use analysis::{AnalysisLine, AnalysisResult, Classification, ScoreKind};
pub use chess_game::{ChessGame, STANDARD_START_FEN};
pub use error::TreeError;
pub use game_data::GameMetadata;
pub use game_state::{GameState, MoveInput, PlayedMove, Side};
pub use node::{MoveNode, MoveNumber, ROOT_ID};
pub use pgn::{extract_clock_annotations, ClockAnnotation};
pub use summary::NodeSummary;
pub use tree::MoveTree;
