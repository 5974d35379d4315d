//! Board mutation and the home-row win rule.

use super::coords::Cells;
use super::moves::Move;
use super::piece::{
    bottom, is_wise, piece_count, same_colour, top, Player, COLOUR_MASK, COLOUR_BLACK, COLOUR_WHITE, EMPTY,
};

/// Last index of row 0, White's goal.
pub const WHITE_GOAL_END: usize = 5;
/// First index of row 6, Black's goal.
pub const BLACK_GOAL_START: usize = 39;

#[inline]
fn move_unit(cells: &mut Cells, from: usize, to: usize) {
    if from != to {
        cells[to] = cells[from];
        cells[from] = EMPTY;
    }
}

/// Top piece of `from` lands on the single piece at `to`.
#[inline]
fn stack_unit(cells: &mut Cells, from: usize, to: usize) {
    let moving = cells[from];
    let target = cells[to];
    cells[from] = bottom(moving);
    cells[to] = top(moving) | (target << 4);
}

/// Top piece of `from` leaves for `to`, replacing whatever was there.
#[inline]
fn unstack_unit(cells: &mut Cells, from: usize, to: usize) {
    let moving = cells[from];
    cells[from] = bottom(moving);
    cells[to] = top(moving);
}

/// Applies a generated move in place. Illegal moves leave the board in an
/// unspecified but memory-safe state.
pub fn play_move(cells: &mut Cells, mv: Move) {
    let start = mv.start();
    let end = mv.end();
    let Some(mid) = mv.mid() else {
        move_unit(cells, start, end);
        return;
    };

    let piece = cells[start];
    let mid_piece = cells[mid];
    let end_piece = cells[end];

    if mid_piece != EMPTY && same_colour(mid_piece, piece) && mid != start {
        stack_unit(cells, start, mid);
        move_unit(cells, mid, end);
    } else if end_piece != EMPTY && same_colour(end_piece, piece) {
        move_unit(cells, start, mid);
        stack_unit(cells, mid, end);
    } else {
        move_unit(cells, start, mid);
        unstack_unit(cells, mid, end);
    }
}

/// Copying variant of [`play_move`].
pub fn apply_move(cells: &Cells, mv: Move) -> Cells {
    let mut next = *cells;
    play_move(&mut next, mv);
    next
}

#[inline]
fn scores_goal(piece: u8, colour: u8) -> bool {
    piece != EMPTY && piece & COLOUR_MASK == colour && !is_wise(piece)
}

/// A non-Wise piece stands on its opponent's home row.
pub fn is_position_win(cells: &Cells) -> bool {
    winning_player(cells).is_some()
}

/// Colour owning a goal-row piece. White is checked first.
pub fn winning_player(cells: &Cells) -> Option<Player> {
    if cells[..=WHITE_GOAL_END].iter().any(|&p| scores_goal(p, COLOUR_WHITE)) {
        return Some(Player::White);
    }
    if cells[BLACK_GOAL_START..].iter().any(|&p| scores_goal(p, COLOUR_BLACK)) {
        return Some(Player::Black);
    }
    None
}

#[inline]
fn on_goal_row(index: usize, colour: u8) -> bool {
    if colour == COLOUR_WHITE {
        index <= WHITE_GOAL_END
    } else {
        index >= BLACK_GOAL_START
    }
}

/// Whether playing `mv` leaves one of the mover's non-Wise pieces on its goal
/// row. Covers the carried piece left behind by a move-then-unstack.
pub fn is_move_win(cells: &Cells, mv: Move) -> bool {
    let piece = cells[mv.start()];
    if piece == EMPTY {
        return false;
    }
    let colour = piece & COLOUR_MASK;
    if !mv.touched().any(|index| on_goal_row(index, colour)) {
        return false;
    }
    let next = apply_move(cells, mv);
    mv.touched().any(|index| on_goal_row(index, colour) && scores_goal(next[index], colour))
}

/// Living pieces, stacks counting twice.
pub fn count_pieces(cells: &Cells) -> u32 {
    cells.iter().map(|&p| piece_count(p)).sum()
}
