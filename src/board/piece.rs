//! Packed piece encoding.
//!
//! A cell byte is laid out as `TTCP TTCP`: the low nibble is the active (top)
//! piece and the high nibble, possibly empty, is the carried (bottom) piece.
//! In each nibble `P` marks a present piece, `C` is the colour and `TT` the type.

use serde::{Deserialize, Serialize};

pub const EMPTY: u8 = 0x00;
pub const PRESENT_MASK: u8 = 0x01;
pub const COLOUR_MASK: u8 = 0x02;
pub const TYPE_MASK: u8 = 0x0C;
pub const TOP_MASK: u8 = 0x0F;
pub const HALF_PIECE_WIDTH: u32 = 4;

pub const COLOUR_WHITE: u8 = 0x00;
pub const COLOUR_BLACK: u8 = 0x02;

pub const TYPE_SCISSORS: u8 = 0x00;
pub const TYPE_PAPER: u8 = 0x04;
pub const TYPE_ROCK: u8 = 0x08;
pub const TYPE_WISE: u8 = 0x0C;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub const fn index(self) -> usize {
        match self {
            Player::White => 0,
            Player::Black => 1,
        }
    }

    pub const fn from_index(index: usize) -> Option<Player> {
        match index {
            0 => Some(Player::White),
            1 => Some(Player::Black),
            _ => None,
        }
    }

    pub const fn other(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// +1 for White, -1 for Black. Scores are White-positive.
    pub const fn sign(self) -> i32 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }

    /// Colour bits as stored in a piece nibble.
    pub const fn colour_bits(self) -> u8 {
        match self {
            Player::White => COLOUR_WHITE,
            Player::Black => COLOUR_BLACK,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Scissors,
    Paper,
    Rock,
    Wise,
}

impl PieceType {
    pub const fn bits(self) -> u8 {
        match self {
            PieceType::Scissors => TYPE_SCISSORS,
            PieceType::Paper => TYPE_PAPER,
            PieceType::Rock => TYPE_ROCK,
            PieceType::Wise => TYPE_WISE,
        }
    }
}

/// Builds a single piece nibble.
pub const fn make_piece(colour: Player, kind: PieceType) -> u8 {
    PRESENT_MASK | colour.colour_bits() | kind.bits()
}

/// Puts `top` on `bottom`. Both must be single pieces.
pub const fn make_stack(top: u8, bottom: u8) -> u8 {
    (top & TOP_MASK) | (bottom << HALF_PIECE_WIDTH)
}

#[inline]
pub const fn top(piece: u8) -> u8 {
    piece & TOP_MASK
}

#[inline]
pub const fn bottom(piece: u8) -> u8 {
    piece >> HALF_PIECE_WIDTH
}

#[inline]
pub const fn is_stack(piece: u8) -> bool {
    piece >= 16
}

#[inline]
pub const fn is_wise(piece: u8) -> bool {
    piece & TYPE_MASK == TYPE_WISE
}

#[inline]
pub const fn same_colour(a: u8, b: u8) -> bool {
    a & COLOUR_MASK == b & COLOUR_MASK
}

/// Colour of the top piece. Meaningless on an empty cell.
#[inline]
pub const fn colour_of(piece: u8) -> Player {
    if piece & COLOUR_MASK == COLOUR_BLACK { Player::Black } else { Player::White }
}

pub const fn kind_of(piece: u8) -> PieceType {
    match piece & TYPE_MASK {
        TYPE_SCISSORS => PieceType::Scissors,
        TYPE_PAPER => PieceType::Paper,
        TYPE_ROCK => PieceType::Rock,
        _ => PieceType::Wise,
    }
}

/// Scissors > Paper, Paper > Rock, Rock > Scissors. Wise never takes nor is taken.
#[inline]
pub const fn can_take(source: u8, target: u8) -> bool {
    let source_type = source & TYPE_MASK;
    let target_type = target & TYPE_MASK;
    (source_type == TYPE_SCISSORS && target_type == TYPE_PAPER)
        || (source_type == TYPE_PAPER && target_type == TYPE_ROCK)
        || (source_type == TYPE_ROCK && target_type == TYPE_SCISSORS)
}

/// Number of living pieces held by a cell (a stack counts as 2).
#[inline]
pub const fn piece_count(piece: u8) -> u32 {
    if piece == EMPTY {
        0
    } else if is_stack(piece) {
        2
    } else {
        1
    }
}

/// Whether a byte is a reachable cell value: empty, a single piece, or a
/// same-colour stack whose top may only be Wise when the bottom is Wise too.
pub const fn is_valid_cell(piece: u8) -> bool {
    if piece == EMPTY {
        return true;
    }
    let top_piece = top(piece);
    if top_piece & PRESENT_MASK == 0 {
        return false;
    }
    let bottom_piece = bottom(piece);
    if bottom_piece == EMPTY {
        return true;
    }
    if bottom_piece & PRESENT_MASK == 0 || !same_colour(top_piece, bottom_piece) {
        return false;
    }
    !is_wise(top_piece) || is_wise(bottom_piece)
}
