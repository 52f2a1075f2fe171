use smallvec::SmallVec;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Position of a cell in the flattened, row-major board.
pub type CellIndex = usize;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Neighbour indices of a single cell, at most eight.
pub type Neighbors = SmallVec<[CellIndex; 8]>;

pub trait ToCellIndex {
    fn to_cell_index(self, width: Coord) -> CellIndex;
}

impl ToCellIndex for Coord2 {
    fn to_cell_index(self, width: Coord) -> CellIndex {
        usize::from(self.1) * usize::from(width) + usize::from(self.0)
    }
}

/// Inverse of [`ToCellIndex`]; `index` must lie on a board of the given width.
pub const fn index_to_coords(index: CellIndex, width: Coord) -> Coord2 {
    let width = width as usize;
    ((index % width) as Coord, (index / width) as Coord)
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

// NW, N, NE, E, SE, S, SW, W
const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

/// Flattened indices of the edge-clipped 8-neighbourhood of `index`, in NW..W order.
pub fn neighbor_indexes(index: CellIndex, size: Coord2) -> Neighbors {
    let width = size.0;
    NeighborIter::new(index_to_coords(index, width), size)
        .map(|coords| coords.to_cell_index(width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_coords_round_trip_on_row_boundaries() {
        assert_eq!(index_to_coords(9, 10), (9, 0));
        assert_eq!(index_to_coords(10, 10), (0, 1));
        assert_eq!((0, 1).to_cell_index(10), 10);
        assert_eq!((29, 15).to_cell_index(30), 479);
    }

    #[test]
    fn neighbors_follow_compass_order() {
        let neighbors = neighbor_indexes(11, (10, 10));

        assert_eq!(neighbors.as_slice(), &[0, 1, 2, 12, 22, 21, 20, 10]);
    }

    #[test]
    fn neighbors_do_not_wrap_across_rows() {
        // right edge of the first row; 10 is the start of the next row
        let neighbors = neighbor_indexes(9, (10, 10));

        assert_eq!(neighbors.as_slice(), &[19, 18, 8]);
        assert!(!neighbors.contains(&10));
    }

    #[test]
    fn single_row_board_has_only_horizontal_neighbors() {
        let neighbors = neighbor_indexes(1, (3, 1));

        assert_eq!(neighbors.as_slice(), &[2, 0]);
    }
}
