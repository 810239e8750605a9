use move_tree::{ChessGame, MoveInput, MoveTree};

/// A short Ruy Lopez with clocks on most plies.
pub const RUY_LOPEZ: &str = r#"[Event "Live Chess"]
[Site "Chess.com"]
[White "alice"]
[Black "bob"]
[Result "1-0"]
[TimeControl "180"]

1. e4 {[%clk 0:03:00]} 1... e5 {[%clk 0:02:59.1]} 2. Nf3 {[%clk 0:02:58]} 2... Nc6 {[%clk 0:02:57.5]} 3. Bb5 {[%clk 0:02:55]} 3... a6 4. Ba4 {[%clk 0:02:50]} 4... Nf6 {[%clk 0:02:49]} 5. O-O {[%clk 0:02:45.2]} 1-0"#;

/// Scholar's mate, no annotations.
pub const SCHOLARS_MATE: &str = "1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0";

/// Build a tree from `pgn` with a fresh rules engine.
pub fn build(pgn: &str) -> MoveTree {
    let mut tree = MoveTree::new();
    let mut game = ChessGame::new();
    tree.build_from_notation(pgn, &mut game)
        .unwrap_or_else(|e| panic!("failed to build tree: {e}"));
    tree
}

/// Add a UCI move below `parent` and return the resulting node id.
pub fn add_uci(tree: &mut MoveTree, parent: &str, uci: &str) -> String {
    let mv = MoveInput::from_uci(uci).unwrap_or_else(|| panic!("invalid UCI move: {uci}"));
    tree.add_move::<ChessGame>(parent, &mv)
        .unwrap_or_else(|e| panic!("move {uci} rejected: {e}"))
        .unwrap_or_else(|| panic!("unknown parent {parent}"))
        .id
        .clone()
}
