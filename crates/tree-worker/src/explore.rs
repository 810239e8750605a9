//! Scripted exploration of extra lines on top of a built tree.

use move_tree::{ChessGame, MoveInput, MoveTree, ROOT_ID};
use tracing::info;

use crate::error::WorkerError;

/// Play a UCI line from the root, reusing existing nodes where the line
/// follows moves already in the tree. Returns the ids along the line.
pub fn explore_line(tree: &mut MoveTree, line: &[String]) -> Result<Vec<String>, WorkerError> {
    let mut parent = ROOT_ID.to_string();
    let mut ids = Vec::with_capacity(line.len());

    for uci in line {
        let mv = MoveInput::from_uci(uci)
            .ok_or_else(|| WorkerError::Explore(format!("bad UCI move '{uci}'")))?;
        let node = tree
            .add_move::<ChessGame>(&parent, &mv)?
            .ok_or_else(|| WorkerError::Explore(format!("parent '{parent}' vanished")))?;
        parent = node.id.clone();
        ids.push(parent.clone());
    }

    info!(moves = ids.len(), tip = ids.last().map(String::as_str).unwrap_or(ROOT_ID), "Explored line");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(moves: &str) -> Vec<String> {
        moves.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_explore_line_reuses_mainline() {
        let mut tree = MoveTree::new();
        tree.build_from_notation("1. e4 e5 2. Nf3 *", &mut ChessGame::new()).unwrap();

        let ids = explore_line(&mut tree, &line("e2e4 e7e5 b1c3")).unwrap();
        assert_eq!(ids[0], "1-w-e4");
        assert_eq!(ids[1], "1-b-e5");
        assert!(ids[2].starts_with("2-w-Nc3-v"));
        assert_eq!(tree.mainline_len(), 4);
    }

    #[test]
    fn test_explore_line_errors() {
        let mut tree = MoveTree::new();
        assert!(matches!(
            explore_line(&mut tree, &line("e2")),
            Err(WorkerError::Explore(_))
        ));
        assert!(matches!(
            explore_line(&mut tree, &line("e2e5")),
            Err(WorkerError::Tree(_))
        ));
    }

    #[test]
    fn test_explore_on_empty_tree_extends_mainline() {
        let mut tree = MoveTree::new();
        let ids = explore_line(&mut tree, &line("d2d4 d7d5")).unwrap();
        assert_eq!(ids, vec!["1-w-d4".to_string(), "1-b-d5".to_string()]);
        assert_eq!(tree.mainline_len(), 3);
    }
}
