use serde::{Deserialize, Serialize};
use std::fmt;

/// Marks an absent intermediate index.
pub const NO_INDEX: usize = 0xFF;

const INDEX_WIDTH: u32 = 8;
const INDEX_MASK: u32 = 0xFF;

/// A move packed as `start | mid << 8 | end << 16`.
///
/// Shapes, as produced by the generator:
/// - `(s, -, e)`: 1-range or 2-range move of the whole unit
/// - `(s, s, e)`: stack only, or unstack only
/// - `(s, m, e)` with `m` an ally: stack on `m`, then move the new stack to `e`
/// - `(s, m, e)` otherwise: move to `m`, then stack or unstack onto `e`
///   (`e == s` unstacks back on the starting cell)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move(u32);

impl Move {
    /// Packed "no move" value. Never produced by the generator.
    pub const NULL: Move = Move(0x00FF_FFFF);

    #[inline]
    pub const fn new(start: usize, mid: usize, end: usize) -> Move {
        Move((start as u32 & INDEX_MASK) | ((mid as u32 & INDEX_MASK) << INDEX_WIDTH) | ((end as u32 & INDEX_MASK) << (2 * INDEX_WIDTH)))
    }

    /// Single action with no intermediate cell.
    #[inline]
    pub const fn simple(start: usize, end: usize) -> Move {
        Move::new(start, NO_INDEX, end)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Move {
        Move(raw & 0x00FF_FFFF)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn start(self) -> usize {
        (self.0 & INDEX_MASK) as usize
    }

    #[inline]
    pub const fn mid_raw(self) -> usize {
        ((self.0 >> INDEX_WIDTH) & INDEX_MASK) as usize
    }

    #[inline]
    pub const fn mid(self) -> Option<usize> {
        let mid = self.mid_raw();
        if mid == NO_INDEX { None } else { Some(mid) }
    }

    #[inline]
    pub const fn end(self) -> usize {
        ((self.0 >> (2 * INDEX_WIDTH)) & INDEX_MASK) as usize
    }

    pub const fn is_null(self) -> bool {
        self.0 == Move::NULL.0
    }

    /// Distinct cells written by this move.
    pub fn touched(self) -> impl Iterator<Item = usize> {
        let start = self.start();
        let end = self.end();
        let mid = self.mid().filter(|&m| m != start && m != end);
        std::iter::once(start).chain(mid).chain((end != start).then_some(end))
    }

    pub const fn to_triple(self) -> [u8; 3] {
        [self.start() as u8, self.mid_raw() as u8, self.end() as u8]
    }

    pub const fn from_triple(triple: [u8; 3]) -> Move {
        Move::new(triple[0] as usize, triple[1] as usize, triple[2] as usize)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "null");
        }
        match self.mid() {
            Some(mid) => write!(f, "{}:{}:{}", self.start(), mid, self.end()),
            None => write!(f, "{}:-:{}", self.start(), self.end()),
        }
    }
}
