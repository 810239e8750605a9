//! Flat, serializable views of tree nodes for rendering layers and JSON output.

use serde::Serialize;

use crate::analysis::ScoreKind;
use crate::node::MoveNode;
use crate::pgn::parse_clock;
use crate::tree::MoveTree;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub id: String,
    pub parent: Option<String>,
    pub move_number: Option<f32>,
    pub san: Option<String>,
    pub uci: Option<String>,
    pub fen: String,
    pub mainline: bool,
    pub clock: Option<String>,
    pub clock_seconds: Option<f64>,
    pub classification: Option<String>,
    pub eval: Option<f64>,
    pub eval_type: Option<ScoreKind>,
    pub children: Vec<String>,
}

impl MoveTree {
    pub fn summarize(&self, id: &str) -> Option<NodeSummary> {
        let node = self.find_node(id)?;
        Some(self.summary_of(node))
    }

    fn summary_of(&self, node: &MoveNode) -> NodeSummary {
        NodeSummary {
            id: node.id.clone(),
            parent: self.parent(&node.id).map(|p| p.id.clone()),
            move_number: node.move_number.map(|n| n.value()),
            san: node.move_text.clone(),
            uci: node.detail.as_ref().map(|d| d.uci.clone()),
            fen: node.position_key.clone(),
            mainline: node.is_mainline(),
            clock: node.clock_remaining.clone(),
            clock_seconds: node.clock_remaining.as_deref().and_then(parse_clock),
            classification: node.classification.clone(),
            eval: node.evaluation_score,
            eval_type: node.evaluation_kind,
            children: self.children(&node.id).iter().map(|c| c.id.clone()).collect(),
        }
    }

    /// Summaries of the mainline, root first.
    pub fn mainline_summaries(&self) -> Vec<NodeSummary> {
        self.mainline().into_iter().map(|n| self.summary_of(n)).collect()
    }

    /// Summaries of every node off the mainline, in creation order.
    pub fn variation_summaries(&self) -> Vec<NodeSummary> {
        self.iter()
            .filter(|n| !n.is_mainline())
            .map(|n| self.summary_of(n))
            .collect()
    }
}
