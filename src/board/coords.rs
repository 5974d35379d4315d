//! Hex grid geometry: 7 rows alternating 6 and 7 cells, 45 cells total.
//! Row 0 is White's goal (Black's home), row 6 is Black's goal.

pub const NUM_CELLS: usize = 45;
pub const NUM_ROWS: usize = 7;

pub type Cells = [u8; NUM_CELLS];

#[inline]
pub const fn row_width(row: usize) -> usize {
    if row % 2 == 0 { 6 } else { 7 }
}

pub const fn coords_to_index(row: usize, column: usize) -> usize {
    if row % 2 == 0 {
        13 * row / 2 + column
    } else {
        6 + 13 * (row - 1) / 2 + column
    }
}

pub const fn index_to_coords(index: usize) -> (usize, usize) {
    let mut row = 2 * (index / 13);
    let mut column = index % 13;
    if column > 5 {
        column -= 6;
        row += 1;
    }
    (row, column)
}

const fn build_lines() -> [usize; NUM_CELLS] {
    let mut lines = [0usize; NUM_CELLS];
    let mut index = 0;
    while index < NUM_CELLS {
        lines[index] = index_to_coords(index).0;
        index += 1;
    }
    lines
}

static INDEX_TO_LINE: [usize; NUM_CELLS] = build_lines();

/// Row of a cell index.
#[inline]
pub fn index_to_line(index: usize) -> usize {
    INDEX_TO_LINE[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_round_trip() {
        for index in 0..NUM_CELLS {
            let (row, column) = index_to_coords(index);
            assert!(row < NUM_ROWS);
            assert!(column < row_width(row));
            assert_eq!(coords_to_index(row, column), index);
        }
    }

    #[test]
    fn rows_partition_the_board() {
        let total: usize = (0..NUM_ROWS).map(row_width).sum();
        assert_eq!(total, NUM_CELLS);
        assert_eq!(index_to_line(0), 0);
        assert_eq!(index_to_line(5), 0);
        assert_eq!(index_to_line(6), 1);
        assert_eq!(index_to_line(38), 5);
        assert_eq!(index_to_line(44), 6);
    }
}
