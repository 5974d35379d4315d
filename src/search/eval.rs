use std::sync::{Arc, OnceLock};

use crate::board::piece::{is_stack, is_wise, COLOUR_MASK, COLOUR_WHITE, EMPTY};
use crate::board::{index_to_line, play_move, Cells, Move, NUM_CELLS, NUM_ROWS};
use crate::error::EngineResult;

use super::weights::EvalWeights;

// Search-facing score bounds.
pub const MATE_SCORE: i32 = 1_000_000;
pub const DRAW_SCORE: i32 = 0;
pub const INFINITY: i32 = MATE_SCORE + 1;
/// Static evaluations always stay strictly below this magnitude.
pub const WIN_SCORE_CEILING: i32 = MATE_SCORE / 2;

/// Per-cell scores of a position, 0 on empty cells.
pub type Breakdown = [i32; NUM_CELLS];

type ScoreTable = [[i32; NUM_CELLS]; 256];

/// Static piece-square evaluator. Scores are White-positive.
pub struct Evaluator {
    weights: EvalWeights,
    table: Box<ScoreTable>,
}

fn score_piece(weights: &EvalWeights, piece: u8, index: usize) -> i32 {
    if piece == EMPTY {
        return 0;
    }
    let white = piece & COLOUR_MASK == COLOUR_WHITE;
    let sign = if white { 1 } else { -1 };
    let mut score = if is_wise(piece) {
        weights.wise
    } else {
        let row = index_to_line(index);
        let distance = if white { row } else { NUM_ROWS - 1 - row };
        if distance == 0 {
            weights.win_score()
        } else {
            weights.row_scores[distance]
        }
    };
    if is_stack(piece) {
        score = 2 * score + weights.stack_bonus;
    }
    sign * score
}

impl Evaluator {
    pub fn new(weights: EvalWeights) -> EngineResult<Evaluator> {
        weights.validate()?;
        Ok(Evaluator::build(weights))
    }

    /// Process-wide evaluator with the built-in weights.
    pub fn shared() -> Arc<Evaluator> {
        static DEFAULT: OnceLock<Arc<Evaluator>> = OnceLock::new();
        DEFAULT.get_or_init(|| Arc::new(Evaluator::build(EvalWeights::default()))).clone()
    }

    fn build(weights: EvalWeights) -> Evaluator {
        let mut table: Box<ScoreTable> = Box::new([[0; NUM_CELLS]; 256]);
        for (piece, row) in table.iter_mut().enumerate() {
            for (index, slot) in row.iter_mut().enumerate() {
                *slot = score_piece(&weights, piece as u8, index);
            }
        }
        Evaluator { weights, table }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    /// Magnitude of a single non-stacked goal-row piece.
    pub fn win_score(&self) -> i32 {
        self.weights.win_score()
    }

    #[inline]
    pub fn piece_score(&self, piece: u8, index: usize) -> i32 {
        self.table[piece as usize][index]
    }

    pub fn evaluate(&self, cells: &Cells) -> i32 {
        cells.iter().enumerate().map(|(index, &piece)| self.piece_score(piece, index)).sum()
    }

    /// Full evaluation that also records each cell's contribution.
    pub fn evaluate_with_breakdown(&self, cells: &Cells, breakdown: &mut Breakdown) -> i32 {
        let mut total = 0;
        for (index, &piece) in cells.iter().enumerate() {
            let score = self.piece_score(piece, index);
            breakdown[index] = score;
            total += score;
        }
        total
    }

    #[inline]
    fn cell_delta(&self, previous: i32, piece: u8, index: usize) -> i32 {
        if piece == EMPTY {
            -previous
        } else {
            self.piece_score(piece, index) - previous
        }
    }

    /// Rescores only the cells that differ from `previous_cells`.
    pub fn evaluate_incremental(
        &self,
        previous_score: i32,
        previous_breakdown: &Breakdown,
        previous_cells: &Cells,
        cells: &Cells,
    ) -> i32 {
        let mut score = previous_score;
        for index in 0..NUM_CELLS {
            if cells[index] != previous_cells[index] {
                score += self.cell_delta(previous_breakdown[index], cells[index], index);
            }
        }
        score
    }

    /// Plays `mv` into `buffer` and rescores the cells it wrote.
    pub fn evaluate_move_incremental(
        &self,
        previous_score: i32,
        previous_breakdown: &Breakdown,
        previous_cells: &Cells,
        mv: Move,
        buffer: &mut Cells,
    ) -> i32 {
        *buffer = *previous_cells;
        play_move(buffer, mv);
        let mut score = previous_score;
        for index in mv.touched() {
            if buffer[index] != previous_cells[index] {
                score += self.cell_delta(previous_breakdown[index], buffer[index], index);
            }
        }
        score
    }
}
