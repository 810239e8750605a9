//! Move tree error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Notation error: {0}")]
    Notation(String),

    #[error("Illegal move {mv} at ply {ply}")]
    IllegalMove { mv: String, ply: usize },

    #[error("Invalid position encoding: {0}")]
    InvalidPosition(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),
}
