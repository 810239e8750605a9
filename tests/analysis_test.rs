//! Tests for attaching analysis results and clock extraction on real-looking PGNs.

mod common;

use common::{add_uci, build, RUY_LOPEZ};
use move_tree::{extract_clock_annotations, AnalysisResult, ChessGame, MoveTree, ScoreKind, Side};
use serde_json::json;

fn result(value: serde_json::Value) -> AnalysisResult {
    serde_json::from_value(value).expect("invalid analysis result")
}

#[test]
fn test_clock_alignment_example() {
    let clocks = extract_clock_annotations("1. e4 {[%clk 0:05:00]} e5 {[%clk 0:04:58]} 2. Nf3");
    assert_eq!(clocks.len(), 2);
    assert_eq!((clocks[0].move_index, clocks[0].side, clocks[0].time.as_str()), (0, Side::White, "0:05:00"));
    assert_eq!((clocks[1].move_index, clocks[1].side, clocks[1].time.as_str()), (1, Side::Black, "0:04:58"));
    assert!(clocks.iter().all(|c| c.move_index != 2));
}

#[test]
fn test_clock_extraction_never_fails_on_garbage() {
    for text in [
        "{[%clk 0:01:00]}",
        "1. {[%clk]} e4 {[%clk x:yy:zz]}",
        "}{ 1. e4 {[%clk 0:00:10] 2. d4",
        "((1. e4 {[%clk 0:00:10]}",
        "[Event \"?\"]\n",
    ] {
        let clocks = extract_clock_annotations(text);
        assert!(clocks.len() <= 1, "{text}: {clocks:?}");
    }
}

#[test]
fn test_clock_seconds_on_built_tree() {
    let clocks = extract_clock_annotations(RUY_LOPEZ);
    assert_eq!(clocks.len(), 8);
    assert!((clocks[1].seconds().unwrap() - 179.1).abs() < 1e-9);
    assert!(clocks.windows(2).all(|w| w[0].move_index < w[1].move_index));
}

#[test]
fn test_classification_on_mainline_and_variation() {
    let mut tree = build(RUY_LOPEZ);
    let var = add_uci(&mut tree, "3-w-Bb5", "g8f6");

    let blunder = result(json!({
        "classification": {"type": "mistake"},
        "lines": [
            {"id": 2, "score": 12.0, "type": "cp"},
            {"id": 1, "score": -85.0, "type": "cp"}
        ]
    }));
    let mate = result(json!({
        "classification": {"type": "best"},
        "lines": [{"id": 1, "score": 4, "type": "mate"}]
    }));

    assert!(tree.update_classification("3-b-a6", &blunder));
    assert!(tree.update_classification(&var, &mate));

    let a6 = tree.find_node("3-b-a6").unwrap();
    assert_eq!(a6.classification.as_deref(), Some("mistake"));
    assert_eq!(a6.evaluation_score, Some(-85.0));
    assert_eq!(a6.evaluation_kind, Some(ScoreKind::Cp));

    let berlin = tree.find_node(&var).unwrap();
    assert_eq!(berlin.evaluation_kind, Some(ScoreKind::Mate));
    assert_eq!(berlin.evaluation_score, Some(4.0));
}

#[test]
fn test_classification_without_top_line() {
    let mut tree = build(RUY_LOPEZ);
    let r = result(json!({
        "classification": {"type": "good"},
        "lines": [{"id": 2, "score": 30}]
    }));
    assert!(tree.update_classification("1-w-e4", &r));
    let node = tree.find_node("1-w-e4").unwrap();
    assert_eq!(node.classification.as_deref(), Some("good"));
    assert_eq!(node.evaluation_score, None);
    assert_eq!(node.evaluation_kind, None);
}

#[test]
fn test_stale_ids_after_rebuild_are_dropped() {
    let mut tree = build(RUY_LOPEZ);
    let var = add_uci(&mut tree, "1-w-e4", "c7c5");

    let mut game = ChessGame::new();
    tree.build_from_notation("1. d4 d5 *", &mut game).unwrap();

    let r = result(json!({"classification": {"type": "book"}}));
    assert!(!tree.update_classification(&var, &r));
    assert!(!tree.update_classification("2-w-Nf3", &r));
    assert!(tree.update_classification("1-w-d4", &r));
}

#[test]
fn test_annotation_does_not_touch_structure() {
    let mut tree: MoveTree = build(RUY_LOPEZ);
    let before: Vec<(String, usize)> = tree
        .iter()
        .map(|n| (n.id.clone(), tree.children(&n.id).len()))
        .collect();

    let r = result(json!({"classification": {"type": "inaccuracy"}, "lines": [{"id": 1, "score": 1.5}]}));
    for (id, _) in &before {
        tree.update_classification(id, &r);
    }

    let after: Vec<(String, usize)> = tree
        .iter()
        .map(|n| (n.id.clone(), tree.children(&n.id).len()))
        .collect();
    assert_eq!(before, after);
    assert_eq!(tree.root().classification.as_deref(), Some("inaccuracy"));
}
