//! Worker error types

use move_tree::TreeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Move tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Exploration error: {0}")]
    Explore(String),
}
