//! JSON report of a built tree

use std::path::Path;

use move_tree::{GameMetadata, MoveTree, NodeSummary};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::WorkerError;

#[derive(Debug, Serialize)]
pub struct Report {
    pub metadata: GameMetadata,
    pub node_count: usize,
    pub mainline: Vec<NodeSummary>,
    pub variations: Vec<NodeSummary>,
}

impl Report {
    pub fn new(metadata: GameMetadata, tree: &MoveTree) -> Self {
        Self {
            metadata,
            node_count: tree.len(),
            mainline: tree.mainline_summaries(),
            variations: tree.variation_summaries(),
        }
    }
}

/// Write the report as pretty JSON to `output`, or stdout when None.
pub async fn write_report(report: &Report, output: Option<&Path>) -> Result<(), WorkerError> {
    let mut json = serde_json::to_vec_pretty(report)?;
    json.push(b'\n');

    match output {
        Some(path) => tokio::fs::write(path, &json).await?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&json).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
