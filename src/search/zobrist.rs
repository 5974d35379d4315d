use std::sync::{Arc, OnceLock};

use crate::board::piece::EMPTY;
use crate::board::{Cells, Player, NUM_CELLS};

/// Deepest remaining depth that gets its own key.
pub const MAX_KEYED_DEPTH: usize = 128;

const DEFAULT_SEED: u64 = 0xF00D_F00D_DEAD_BEEF;

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Random keys per (cell value, index), plus depth and side keys for the cache.
pub struct ZobristKeys {
    pieces: Box<[[u64; NUM_CELLS]; 256]>,
    depths: [u64; MAX_KEYED_DEPTH + 1],
    side: u64,
}

impl ZobristKeys {
    pub fn new(seed: u64) -> ZobristKeys {
        let mut state = seed;
        let mut next = || {
            state = splitmix64(state);
            state
        };
        let mut pieces = Box::new([[0u64; NUM_CELLS]; 256]);
        // Empty cells keep a zero key so they never perturb the hash.
        for row in pieces.iter_mut().skip(1) {
            for key in row.iter_mut() {
                *key = next();
            }
        }
        let mut depths = [0u64; MAX_KEYED_DEPTH + 1];
        for key in depths.iter_mut() {
            *key = next();
        }
        let side = next();
        ZobristKeys { pieces, depths, side }
    }

    /// Keys built once per process from a fixed seed.
    pub fn shared() -> Arc<ZobristKeys> {
        static TABLE: OnceLock<Arc<ZobristKeys>> = OnceLock::new();
        TABLE.get_or_init(|| Arc::new(ZobristKeys::new(DEFAULT_SEED))).clone()
    }

    #[inline]
    pub fn piece_key(&self, piece: u8, index: usize) -> u64 {
        self.pieces[piece as usize][index]
    }

    pub fn hash(&self, cells: &Cells) -> u64 {
        let mut key = 0u64;
        for (index, &piece) in cells.iter().enumerate() {
            if piece != EMPTY {
                key ^= self.piece_key(piece, index);
            }
        }
        key
    }

    /// Adds or removes `piece` on `index`.
    #[inline]
    pub fn toggle(&self, hash: u64, piece: u8, index: usize) -> u64 {
        hash ^ self.piece_key(piece, index)
    }

    /// Rehashes only the cells that changed between two boards.
    pub fn update(&self, hash: u64, previous: &Cells, cells: &Cells) -> u64 {
        let mut key = hash;
        for index in 0..NUM_CELLS {
            if previous[index] != cells[index] {
                key = self.toggle(key, previous[index], index);
                key = self.toggle(key, cells[index], index);
            }
        }
        key
    }

    /// Cache key of a search node: position, remaining depth and side to move.
    #[inline]
    pub fn search_key(&self, hash: u64, depth: u32, side: Player) -> u64 {
        let depth_key = self.depths[(depth as usize).min(MAX_KEYED_DEPTH)];
        match side {
            Player::White => hash ^ depth_key,
            Player::Black => hash ^ depth_key ^ self.side,
        }
    }
}
