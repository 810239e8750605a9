//! Asynchronous analysis feed.
//!
//! A reader task parses JSON-lines analysis records and sends them over a
//! bounded channel. The task that owns the tree drains the channel, so
//! annotation writes never race with structural changes.

use std::path::PathBuf;

use move_tree::{AnalysisResult, MoveTree};
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::WorkerError;

/// One analysis record addressed to a node id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRecord {
    pub node_id: String,
    pub result: AnalysisResult,
}

/// Spawn a task that streams records from `path` into the returned receiver.
/// The handle resolves to the number of records sent.
pub fn spawn_feed(
    path: PathBuf,
    capacity: usize,
) -> (mpsc::Receiver<FeedRecord>, JoinHandle<Result<usize, WorkerError>>) {
    let (tx, rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(async move { read_feed(path, tx).await });
    (rx, handle)
}

async fn read_feed(path: PathBuf, tx: mpsc::Sender<FeedRecord>) -> Result<usize, WorkerError> {
    let file = File::open(&path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut sent = 0usize;
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: FeedRecord = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed analysis record");
                continue;
            }
        };

        if tx.send(record).await.is_err() {
            debug!("Feed receiver dropped, stopping");
            break;
        }
        sent += 1;
    }

    info!(path = %path.display(), sent, "Analysis feed finished");
    Ok(sent)
}

/// Drain the channel into the tree. Returns (applied, dropped) counts.
pub async fn apply_feed(tree: &mut MoveTree, rx: &mut mpsc::Receiver<FeedRecord>) -> (usize, usize) {
    let mut applied = 0;
    let mut dropped = 0;

    while let Some(record) = rx.recv().await {
        if tree.update_classification(&record.node_id, &record.result) {
            applied += 1;
        } else {
            dropped += 1;
        }
    }

    (applied, dropped)
}
