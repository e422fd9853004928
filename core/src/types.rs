/// Single coordinate axis used for board rows, columns and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Index into an `ndarray` grid for `(row, col)`.
#[inline]
pub const fn grid_index((row, col): Coord2) -> [usize; 2] {
    [row as usize, col as usize]
}

/// Number of cells on a `rows x cols` grid.
pub const fn cell_count(rows: Coord, cols: Coord) -> CellCount {
    (rows as CellCount).saturating_mul(cols as CellCount)
}

/// Walks the 3x3 window around a cell, clipped to the grid, in row-major order and
/// skipping the centre. A centre outside the grid has no neighbours.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    first_col: Coord,
    last: Coord2,
    cursor: Option<Coord2>,
}

impl NeighborIter {
    pub fn new(center: Coord2, (rows, cols): Coord2) -> Self {
        let (row, col) = center;
        let inside = row < rows && col < cols;
        Self {
            center,
            first_col: col.saturating_sub(1),
            last: (
                row.saturating_add(1).min(rows.saturating_sub(1)),
                col.saturating_add(1).min(cols.saturating_sub(1)),
            ),
            cursor: inside.then(|| (row.saturating_sub(1), col.saturating_sub(1))),
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (row, col) = self.cursor?;
            let (last_row, last_col) = self.last;
            self.cursor = if col < last_col {
                Some((row, col + 1))
            } else if row < last_row {
                Some((row + 1, self.first_col))
            } else {
                None
            };

            if (row, col) != self.center {
                return Some((row, col));
            }
        }
    }
}
