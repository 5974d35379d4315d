//! Legal move generation.
//!
//! Moves come out in a fixed order: cells ascending, then per cell the action
//! shapes in the order the loops below visit them. Perft counts and the
//! deterministic tie-break in the searchers both depend on this order.

use super::coords::Cells;
use super::moves::{Move, NO_INDEX};
use super::neighbours::{neighbours, neighbours2};
use super::piece::{can_take, is_stack, is_wise, same_colour, Player, COLOUR_MASK, EMPTY};

/// Moving `piece` onto `end` is legal: the cell is empty or holds an enemy it dominates.
#[inline]
pub fn is_move_valid(piece: u8, end: usize, cells: &Cells) -> bool {
    let target = cells[end];
    if target == EMPTY {
        return true;
    }
    !same_colour(piece, target) && can_take(piece, target)
}

/// 2-range variant: the cell between `start` and `end` must be empty as well.
#[inline]
pub fn is_move2_valid(piece: u8, start: usize, end: usize, cells: &Cells) -> bool {
    cells[(start + end) / 2] == EMPTY && is_move_valid(piece, end, cells)
}

/// `piece` may land on `end` to form a stack: an ally single piece, Wise only on Wise.
#[inline]
pub fn is_stack_valid(piece: u8, end: usize, cells: &Cells) -> bool {
    let target = cells[end];
    if target == EMPTY || !same_colour(piece, target) || is_stack(target) {
        return false;
    }
    !is_wise(piece) || is_wise(target)
}

/// The top of a stack may leave it for `end`. Same rule as a plain move.
#[inline]
pub fn is_unstack_valid(piece: u8, end: usize, cells: &Cells) -> bool {
    is_move_valid(piece, end, cells)
}

/// Appends every legal move of the unit on `start`.
pub fn piece_moves_into(start: usize, cells: &Cells, out: &mut Vec<Move>) {
    let piece = cells[start];
    if piece == EMPTY {
        return;
    }
    if is_stack(piece) {
        stack_moves_into(start, piece, cells, out);
    } else {
        single_moves_into(start, piece, cells, out);
    }
}

fn single_moves_into(start: usize, piece: u8, cells: &Cells, out: &mut Vec<Move>) {
    for &mid in neighbours(start) {
        let mid = mid as usize;
        if is_stack_valid(piece, mid, cells) {
            // Stack on the ally, then carry the new stack away.
            for &end in neighbours2(mid) {
                let end = end as usize;
                if is_move2_valid(piece, mid, end, cells)
                    || (start == (mid + end) / 2 && is_move_valid(piece, end, cells))
                {
                    out.push(Move::new(start, mid, end));
                }
            }
            for &end in neighbours(mid) {
                let end = end as usize;
                if is_move_valid(piece, end, cells) || start == end {
                    out.push(Move::new(start, mid, end));
                }
            }
            out.push(Move::new(start, start, mid));
        } else if is_move_valid(piece, mid, cells) {
            out.push(Move::new(start, NO_INDEX, mid));
        }
    }
}

fn stack_moves_into(start: usize, piece: u8, cells: &Cells, out: &mut Vec<Move>) {
    for &mid in neighbours2(start) {
        let mid = mid as usize;
        if is_move2_valid(piece, start, mid, cells) {
            for &end in neighbours(mid) {
                let end = end as usize;
                if is_unstack_valid(piece, end, cells) || is_stack_valid(piece, end, cells) {
                    out.push(Move::new(start, mid, end));
                }
            }
            out.push(Move::new(start, NO_INDEX, mid));
        }
    }

    for &mid in neighbours(start) {
        let mid = mid as usize;
        if is_move_valid(piece, mid, cells) {
            for &end in neighbours(mid) {
                let end = end as usize;
                if is_unstack_valid(piece, end, cells) || is_stack_valid(piece, end, cells) {
                    out.push(Move::new(start, mid, end));
                }
            }
            out.push(Move::new(start, mid, start));
            out.push(Move::new(start, NO_INDEX, mid));
        } else if is_stack_valid(piece, mid, cells) {
            // Top piece joins an ally, then the new stack moves on.
            for &end in neighbours2(mid) {
                let end = end as usize;
                if is_move2_valid(piece, mid, end, cells) {
                    out.push(Move::new(start, mid, end));
                }
            }
            for &end in neighbours(mid) {
                let end = end as usize;
                if is_move_valid(piece, end, cells) {
                    out.push(Move::new(start, mid, end));
                }
            }
            out.push(Move::new(start, start, mid));
        }
        if is_unstack_valid(piece, mid, cells) {
            out.push(Move::new(start, start, mid));
        }
    }
}

/// Every legal move of the unit on `start`. Empty for an empty cell.
pub fn piece_moves(start: usize, cells: &Cells) -> Vec<Move> {
    let mut out = Vec::new();
    piece_moves_into(start, cells, &mut out);
    out
}

/// Appends every legal move of `player`, cells ascending.
pub fn player_moves_into(player: Player, cells: &Cells, out: &mut Vec<Move>) {
    let colour = player.colour_bits();
    for (start, &piece) in cells.iter().enumerate() {
        if piece != EMPTY && piece & COLOUR_MASK == colour {
            piece_moves_into(start, cells, out);
        }
    }
}

pub fn player_moves(player: Player, cells: &Cells) -> Vec<Move> {
    let mut out = Vec::with_capacity(256);
    player_moves_into(player, cells, &mut out);
    out
}

/// True as soon as one legal move exists for `player`.
pub fn has_moves(player: Player, cells: &Cells) -> bool {
    let colour = player.colour_bits();
    let mut scratch = Vec::with_capacity(64);
    for (start, &piece) in cells.iter().enumerate() {
        if piece != EMPTY && piece & COLOUR_MASK == colour {
            piece_moves_into(start, cells, &mut scratch);
            if !scratch.is_empty() {
                return true;
            }
        }
    }
    false
}
