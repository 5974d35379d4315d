//! Setup-time errors. Game-logic outcomes (no move, timeout) are values, not errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("i/o error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid evaluation weights: {0}")]
    InvalidWeights(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
