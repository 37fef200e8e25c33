//! Neighbor lookup for the offset layout
//!
//! A shifted (even) row sits half a cell to the right of the rows above and
//! below it, so its diagonal neighbors are at `column + 1`. An unshifted
//! (odd) row sits half a cell to the left, so its diagonals are at
//! `column - 1`.

use super::coords::Cell;

/// The six cells touching `cell`. Unoccupied or out-of-level cells are included.
///
/// Coordinates wrap at the `i32` limits, so cells at the edge of the range
/// still get six distinct neighbors and row parity keeps alternating.
pub fn neighbors_of(cell: Cell) -> [Cell; 6] {
    let Cell { row, column } = cell;
    let (up, down) = (row.wrapping_sub(1), row.wrapping_add(1));
    let (left, right) = (column.wrapping_sub(1), column.wrapping_add(1));
    let diagonal = if cell.is_shifted_row() { right } else { left };

    [
        Cell::new(up, column),
        Cell::new(down, column),
        Cell::new(row, right),
        Cell::new(row, left),
        Cell::new(up, diagonal),
        Cell::new(down, diagonal),
    ]
}

/// Whether two cells touch
pub fn are_adjacent(a: Cell, b: Cell) -> bool {
    neighbors_of(a).contains(&b)
}
