//! Tunable evaluation weights, loadable from JSON.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::board::NUM_ROWS;
use crate::error::{EngineError, EngineResult};

/// Pieces per side in the starting position.
const PIECES_PER_SIDE: i32 = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalWeights {
    /// Score of a non-Wise piece indexed by its distance to the goal row.
    pub row_scores: [i32; NUM_ROWS],
    /// Applied to `row_scores[0]` when a piece stands on its goal row.
    pub win_multiplier: i32,
    pub wise: i32,
    /// Added to twice the top piece score for a stack.
    pub stack_bonus: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights { row_scores: [15, 14, 13, 12, 11, 10, 9], win_multiplier: 128, wise: 8, stack_bonus: 3 }
    }
}

impl EvalWeights {
    /// Saturates on weights that [`validate`](Self::validate) rejects.
    pub fn win_score(&self) -> i32 {
        self.row_scores[0].saturating_mul(self.win_multiplier)
    }

    /// Largest magnitude a single cell can contribute without a goal-row piece.
    pub fn max_positional(&self) -> i32 {
        let best_row = self.row_scores[1..].iter().copied().max().unwrap_or(0);
        stacked(best_row, self.stack_bonus).max(stacked(self.wise, self.stack_bonus))
    }

    /// Goal-row pieces must outweigh any material and positional sum.
    pub fn validate(&self) -> EngineResult<()> {
        if self.row_scores.iter().any(|&s| s < 0) || self.wise < 0 || self.stack_bonus < 0 {
            return Err(EngineError::InvalidWeights("scores must be non-negative".into()));
        }
        if self.win_multiplier < 1 {
            return Err(EngineError::InvalidWeights(format!(
                "win multiplier must be at least 1, got {}",
                self.win_multiplier
            )));
        }
        let too_large = || EngineError::InvalidWeights("weights overflow the score range".into());
        let win = self.row_scores[0].checked_mul(self.win_multiplier).ok_or_else(too_large)?;
        let best_row = self.row_scores[1..].iter().copied().max().unwrap_or(0);
        let positional = checked_stacked(best_row, self.stack_bonus)
            .zip(checked_stacked(self.wise, self.stack_bonus))
            .map(|(row, wise)| row.max(wise))
            .ok_or_else(too_large)?;
        let bound = positional.checked_mul(2 * PIECES_PER_SIDE).ok_or_else(too_large)?;
        if win <= bound {
            return Err(EngineError::InvalidWeights(format!(
                "goal-row score {win} does not dominate positional total {bound}"
            )));
        }
        // Keep every reachable total well inside the search score range.
        let total = checked_stacked(win, self.stack_bonus).and_then(|s| s.checked_mul(2 * PIECES_PER_SIDE));
        if total.map_or(true, |t| t >= crate::search::eval::WIN_SCORE_CEILING) {
            return Err(EngineError::InvalidWeights(format!("goal-row score {win} is too large")));
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> EngineResult<EvalWeights> {
        let weights: EvalWeights = serde_json::from_str(text)?;
        weights.validate()?;
        Ok(weights)
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<EvalWeights> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EngineError::Io { path: path.to_path_buf(), source })?;
        let weights = EvalWeights::from_json(&text)?;
        info!("loaded evaluation weights from {}", path.display());
        Ok(weights)
    }
}

/// Score of a stack whose top piece scores `score`.
fn stacked(score: i32, bonus: i32) -> i32 {
    score.saturating_mul(2).saturating_add(bonus)
}

fn checked_stacked(score: i32, bonus: i32) -> Option<i32> {
    score.checked_mul(2)?.checked_add(bonus)
}
