//! Analysis results attached to tree nodes.
//!
//! Results arrive from an external engine after the tree is built, so a
//! result may reference a node that no longer exists. Those are dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tree::MoveTree;

/// Line id of the engine's top-ranked candidate
const TOP_LINE_ID: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    Cp,
    Mate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisLine {
    pub id: u32,
    pub score: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ScoreKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<AnalysisLine>>,
}

impl AnalysisResult {
    pub fn top_line(&self) -> Option<&AnalysisLine> {
        self.lines
            .as_ref()?
            .iter()
            .find(|line| line.id == TOP_LINE_ID)
    }
}

impl MoveTree {
    /// Store a classification (and the top line's evaluation) on a node.
    /// Returns false when the node id does not resolve.
    pub fn update_classification(&mut self, node_id: &str, result: &AnalysisResult) -> bool {
        let Some(node) = self.find_node_mut(node_id) else {
            debug!(node_id, "Dropping analysis for unknown node");
            return false;
        };

        node.classification = Some(result.classification.kind.clone());
        if let Some(line) = result.top_line() {
            node.evaluation_score = Some(line.score);
            node.evaluation_kind = line.kind;
        }
        true
    }
}
