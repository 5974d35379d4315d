//! Game state: cells, side to move and the draw counters.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::coords::{Cells, NUM_CELLS};
use super::movegen::{has_moves, player_moves, player_moves_into};
use super::moves::Move;
use super::piece::{is_valid_cell, make_piece, make_stack, PieceType, Player, EMPTY};
use super::rules::{count_pieces, is_move_win, play_move, winning_player};
use crate::error::EngineError;

/// Half moves without a capture after which the game is drawn.
pub const DRAW_HALF_MOVES: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    cells: Cells,
    side_to_move: Player,
    half_moves: u32,
    full_moves: u32,
    pieces: u32,
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

const fn starting_cells() -> Cells {
    use PieceType::{Paper as P, Rock as R, Scissors as S, Wise as W};
    const BLACK_BACK: [PieceType; 6] = [S, P, R, S, P, R];
    const BLACK_FRONT: [PieceType; 7] = [P, R, S, W, R, S, P];
    const WHITE_FRONT: [PieceType; 7] = [P, S, R, W, S, R, P];
    const WHITE_BACK: [PieceType; 6] = [R, P, S, R, P, S];

    let mut cells = [EMPTY; NUM_CELLS];
    let mut j = 0;
    while j < 6 {
        cells[j] = make_piece(Player::Black, BLACK_BACK[j]);
        cells[39 + j] = make_piece(Player::White, WHITE_BACK[j]);
        j += 1;
    }
    j = 0;
    while j < 7 {
        cells[6 + j] = make_piece(Player::Black, BLACK_FRONT[j]);
        cells[32 + j] = make_piece(Player::White, WHITE_FRONT[j]);
        j += 1;
    }
    let black_wise = make_piece(Player::Black, W);
    let white_wise = make_piece(Player::White, W);
    cells[9] = make_stack(black_wise, black_wise);
    cells[35] = make_stack(white_wise, white_wise);
    cells
}

impl Position {
    /// Starting arrangement, White to move.
    pub fn start() -> Position {
        Position::from_cells(starting_cells(), Player::White)
    }

    /// Position with fresh counters.
    pub fn from_cells(cells: Cells, side_to_move: Player) -> Position {
        Position { cells, side_to_move, half_moves: 0, full_moves: 1, pieces: count_pieces(&cells) }
    }

    pub fn with_counters(mut self, half_moves: u32, full_moves: u32) -> Position {
        self.half_moves = half_moves;
        self.full_moves = full_moves;
        self
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    pub fn half_moves(&self) -> u32 {
        self.half_moves
    }

    pub fn full_moves(&self) -> u32 {
        self.full_moves
    }

    pub fn piece_count(&self) -> u32 {
        self.pieces
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        player_moves(self.side_to_move, &self.cells)
    }

    pub fn legal_moves_into(&self, out: &mut Vec<Move>) {
        player_moves_into(self.side_to_move, &self.cells, out);
    }

    pub fn is_move_legal(&self, mv: Move) -> bool {
        !mv.is_null() && self.legal_moves().contains(&mv)
    }

    pub fn is_move_win(&self, mv: Move) -> bool {
        is_move_win(&self.cells, mv)
    }

    /// Plays a legal move and runs the end-of-turn bookkeeping.
    pub fn play(&mut self, mv: Move) {
        play_move(&mut self.cells, mv);
        let pieces = count_pieces(&self.cells);
        if pieces == self.pieces {
            self.half_moves += 1;
        } else {
            self.half_moves = 0;
            self.pieces = pieces;
        }
        if self.side_to_move == Player::Black {
            self.full_moves += 1;
        }
        self.side_to_move = self.side_to_move.other();
    }

    pub fn played(&self, mv: Move) -> Position {
        let mut next = *self;
        next.play(mv);
        next
    }

    pub fn is_win(&self) -> bool {
        winning_player(&self.cells).is_some()
    }

    pub fn is_draw(&self) -> bool {
        self.half_moves >= DRAW_HALF_MOVES
    }

    pub fn is_stalemate(&self) -> bool {
        !has_moves(self.side_to_move, &self.cells)
    }

    /// Home-row winner, else the opponent of a stalemated side.
    pub fn winner(&self) -> Option<Player> {
        winning_player(&self.cells).or_else(|| self.is_stalemate().then(|| self.side_to_move.other()))
    }

    pub fn is_over(&self) -> bool {
        self.is_win() || self.is_draw() || self.is_stalemate()
    }

    /// Uniformly random legal move, `None` when stalemated.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.legal_moves().choose(rng).copied()
    }
}

/// Serialisable snapshot of a [`Position`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub cells: Vec<u8>,
    pub side_to_move: Player,
    #[serde(default)]
    pub half_moves: u32,
    #[serde(default = "first_move")]
    pub full_moves: u32,
}

fn first_move() -> u32 {
    1
}

impl From<&Position> for PositionRecord {
    fn from(position: &Position) -> Self {
        PositionRecord {
            cells: position.cells.to_vec(),
            side_to_move: position.side_to_move,
            half_moves: position.half_moves,
            full_moves: position.full_moves,
        }
    }
}

impl TryFrom<PositionRecord> for Position {
    type Error = EngineError;

    fn try_from(record: PositionRecord) -> Result<Self, Self::Error> {
        let cells: Cells = record.cells.as_slice().try_into().map_err(|_| {
            EngineError::InvalidPosition(format!("expected {NUM_CELLS} cells, got {}", record.cells.len()))
        })?;
        if let Some(index) = cells.iter().position(|&c| !is_valid_cell(c)) {
            return Err(EngineError::InvalidPosition(format!(
                "cell {index} holds invalid value {:#04x}",
                cells[index]
            )));
        }
        if record.full_moves == 0 {
            return Err(EngineError::InvalidPosition("full move counter starts at 1".into()));
        }
        Ok(Position::from_cells(cells, record.side_to_move).with_counters(record.half_moves, record.full_moves))
    }
}
