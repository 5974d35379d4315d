// Pijersi engine: board rules, alpha-beta and MCTS search
pub mod board;
pub mod error;
pub mod mcts;
pub mod perft;
pub mod search;
pub mod selfplay;

use std::fs;
use std::path::Path;

pub use board::{Move, Player, Position, PositionRecord};
pub use error::{EngineError, EngineResult};
pub use mcts::{search_by_mcts, search_mcts, MctsParams, MctsResult};
pub use search::{evaluate, search_by_depth, search_by_time, SearchParams, SearchResult, Searcher};

/// Reads a JSON [`PositionRecord`] and validates it.
pub fn load_position<P: AsRef<Path>>(path: P) -> EngineResult<Position> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| EngineError::Io { path: path.to_path_buf(), source })?;
    let record: PositionRecord = serde_json::from_str(&text)?;
    Position::try_from(record)
}
