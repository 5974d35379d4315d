pub mod alphabeta;
pub mod eval;
pub mod noise;
pub mod tt;
pub mod weights;
pub mod zobrist;

use std::time::Duration;

use crate::board::{Move, Position};

pub use alphabeta::{SearchParams, SearchResult, Searcher, MAX_DEPTH};
pub use eval::{Evaluator, MATE_SCORE};
pub use weights::EvalWeights;

/// Best move at a fixed depth with a fresh cache on all hardware threads.
pub fn search_by_depth(position: &Position, depth: u32, randomize: bool) -> Option<Move> {
    let params = SearchParams { depth, randomize, ..SearchParams::default() };
    Searcher::from_params(&params).search_with_params(position, params).bestmove
}

/// Best move found within `budget`.
pub fn search_by_time(position: &Position, budget: Duration, randomize: bool) -> Option<Move> {
    let params = SearchParams { depth: MAX_DEPTH, movetime: Some(budget), randomize, ..SearchParams::default() };
    Searcher::from_params(&params).search_with_params(position, params).bestmove
}

/// White-positive static score with the built-in weights.
pub fn evaluate(position: &Position) -> i32 {
    Evaluator::shared().evaluate(position.cells())
}
