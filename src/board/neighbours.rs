//! Precomputed 1-range and 2-range neighbour tables.
//!
//! Entries are sorted ascending. For a 2-range neighbour `e` of `s`, the cell
//! jumped over is always `(s + e) / 2`.

use super::coords::{index_to_coords, NUM_CELLS};

#[derive(Clone, Copy)]
pub struct NeighbourTable {
    cells: [[u8; 6]; NUM_CELLS],
    counts: [u8; NUM_CELLS],
}

impl NeighbourTable {
    #[inline]
    pub fn get(&self, index: usize) -> &[u8] {
        &self.cells[index][..self.counts[index] as usize]
    }
}

const fn push(mut table: NeighbourTable, index: usize, neighbour: usize) -> NeighbourTable {
    let n = table.counts[index] as usize;
    table.cells[index][n] = neighbour as u8;
    table.counts[index] += 1;
    table
}

const fn build_neighbours() -> NeighbourTable {
    let mut table = NeighbourTable { cells: [[0; 6]; NUM_CELLS], counts: [0; NUM_CELLS] };
    let mut index = 0;
    while index < NUM_CELLS {
        let (i, j) = index_to_coords(index);
        let even = i % 2 == 0;
        let left = j > 0 || even;
        let right = even || j < 6;
        if left && i > 0 { table = push(table, index, index - 7); }
        if right && i > 0 { table = push(table, index, index - 6); }
        if j > 0 { table = push(table, index, index - 1); }
        if (even && j < 5) || (!even && j < 6) { table = push(table, index, index + 1); }
        if left && i < 6 { table = push(table, index, index + 6); }
        if right && i < 6 { table = push(table, index, index + 7); }
        index += 1;
    }
    table
}

const fn build_neighbours2() -> NeighbourTable {
    let mut table = NeighbourTable { cells: [[0; 6]; NUM_CELLS], counts: [0; NUM_CELLS] };
    let mut index = 0;
    while index < NUM_CELLS {
        let (i, j) = index_to_coords(index);
        let even = i % 2 == 0;
        let left = j > 1 || (even && j > 0);
        let right = (even && j < 5) || (!even && j < 6);
        if left && i > 1 { table = push(table, index, index - 14); }
        if right && i > 1 { table = push(table, index, index - 12); }
        if j > 1 { table = push(table, index, index - 2); }
        if (even && j < 4) || (!even && j < 5) { table = push(table, index, index + 2); }
        if left && i < 5 { table = push(table, index, index + 12); }
        if right && i < 5 { table = push(table, index, index + 14); }
        index += 1;
    }
    table
}

pub static NEIGHBOURS: NeighbourTable = build_neighbours();
pub static NEIGHBOURS2: NeighbourTable = build_neighbours2();

#[inline]
pub fn neighbours(index: usize) -> &'static [u8] {
    NEIGHBOURS.get(index)
}

#[inline]
pub fn neighbours2(index: usize) -> &'static [u8] {
    NEIGHBOURS2.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_rows() {
        assert_eq!(neighbours(0), &[1, 6, 7]);
        assert_eq!(neighbours(6), &[0, 7, 13]);
        assert_eq!(neighbours(7), &[0, 1, 6, 8, 13, 14]);
        assert_eq!(neighbours(44), &[37, 38, 43]);
        assert_eq!(neighbours2(0), &[2, 14]);
        assert_eq!(neighbours2(14), &[0, 2, 16, 26, 28]);
        assert_eq!(neighbours2(21), &[7, 9, 19, 23, 33, 35]);
        assert_eq!(neighbours2(44), &[30, 42]);
    }

    #[test]
    fn symmetric_and_sorted() {
        for table in [&NEIGHBOURS, &NEIGHBOURS2] {
            for index in 0..NUM_CELLS {
                let row = table.get(index);
                assert!(row.windows(2).all(|w| w[0] < w[1]));
                for &n in row {
                    assert!(table.get(n as usize).contains(&(index as u8)), "{index} -> {n}");
                }
            }
        }
    }

    #[test]
    fn jump_midpoint_is_a_shared_neighbour() {
        for index in 0..NUM_CELLS {
            for &far in neighbours2(index) {
                let mid = (index + far as usize) / 2;
                assert!(neighbours(index).contains(&(mid as u8)));
                assert!(neighbours(far as usize).contains(&(mid as u8)));
            }
        }
    }
}
