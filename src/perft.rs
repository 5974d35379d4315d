use rayon::prelude::*;

use crate::board::{apply_move, is_move_win, is_position_win, player_moves, Cells, Move, Player, Position};

/// Leaf count of the legal game tree, `depth` plies deep.
///
/// A won position has no continuation and counts 0; moves that win on the
/// spot are counted at the last ply but never expanded further.
pub fn perft_cells(cells: &Cells, side: Player, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    if is_position_win(cells) {
        return 0;
    }
    let moves = player_moves(side, cells);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .into_iter()
        .filter(|&mv| !is_move_win(cells, mv))
        .map(|mv| perft_cells(&apply_move(cells, mv), side.other(), depth - 1))
        .sum()
}

pub fn perft(position: &Position, depth: u32) -> u64 {
    perft_cells(position.cells(), position.side_to_move(), depth)
}

/// Per-root-move counts, root moves searched in parallel.
pub fn perft_split(position: &Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 || position.is_win() {
        return Vec::new();
    }
    let cells = position.cells();
    let side = position.side_to_move();
    position
        .legal_moves()
        .par_iter()
        .map(|&mv| {
            let nodes = if depth == 1 {
                1
            } else if is_move_win(cells, mv) {
                0
            } else {
                perft_cells(&apply_move(cells, mv), side.other(), depth - 1)
            };
            (mv, nodes)
        })
        .collect()
}

/// Parallel root split, same total as [`perft`].
pub fn perft_parallel(position: &Position, depth: u32) -> u64 {
    if depth <= 1 {
        return perft(position, depth);
    }
    perft_split(position, depth).iter().map(|&(_, n)| n).sum()
}
