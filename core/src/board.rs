use alloc::vec;
use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Flattened, row-major minefield. Cells are allocated lazily by [`Board::initialize`] so the
/// layout can be chosen after the first click.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: Coord,
    height: Coord,
    bomb_count: CellCount,
    initialized: bool,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_config(difficulty.config())
    }

    /// Any level other than 1 or 2 gives the hardest board.
    pub fn for_level(level: u8) -> Self {
        Self::new(Difficulty::from_level(level))
    }

    pub fn with_config(config: GameConfig) -> Self {
        assert!(
            config.mines < config.total_cells(),
            "a board needs at least one safe cell"
        );
        Self {
            width: config.size.0,
            height: config.size.1,
            bomb_count: config.mines,
            initialized: false,
            cells: Vec::new(),
        }
    }

    /// Builds an initialized board with mines at exactly the given indices.
    pub fn from_mine_indexes(size: Coord2, mine_indexes: &[CellIndex]) -> Result<Self> {
        let total = mult(size.0, size.1);
        let mut cells = vec![Cell::default(); usize::from(total)];

        for &index in mine_indexes {
            let cell = cells
                .get_mut(index)
                .ok_or(GameError::InvalidIndex { index, total })?;
            *cell = Cell::mine();
        }

        let mines = cells.iter().filter(|cell| cell.is_mined()).count() as CellCount;
        if mines >= total {
            return Err(GameError::TooManyMines { mines, total });
        }

        let mut board = Self {
            width: size.0,
            height: size.1,
            bomb_count: mines,
            initialized: true,
            cells,
        };
        board.compute_adjacent_counts();
        Ok(board)
    }

    /// Lays out a fresh random minefield, replacing any previous one.
    pub fn initialize<R: Rng>(&mut self, rng: &mut R) {
        let total = usize::from(self.total_cells());
        let mines = usize::from(self.bomb_count);

        let mut cells = Vec::with_capacity(total);
        cells.resize(total - mines, Cell::default());
        cells.resize(total, Cell::mine());
        shuffle(&mut cells, rng);

        self.cells = cells;
        self.compute_adjacent_counts();
        self.initialized = true;
        log::trace!(
            "laid out {} mines on {}x{}",
            self.bomb_count,
            self.width,
            self.height
        );
    }

    pub fn adjacency(&self, index: CellIndex) -> Neighbors {
        assert!(
            index < usize::from(self.total_cells()),
            "cell index {} outside {}x{} board",
            index,
            self.width,
            self.height
        );
        neighbor_indexes(index, self.size())
    }

    pub fn used_flag_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_flagged())
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn height(&self) -> Coord {
        self.height
    }

    pub fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.bomb_count
    }

    /// Empty until the board is initialized.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: CellIndex) -> Cell {
        self.check_index(index);
        self.cells[index]
    }

    pub fn coords_of(&self, index: CellIndex) -> Coord2 {
        index_to_coords(index, self.width)
    }

    pub fn index_of(&self, coords: Coord2) -> CellIndex {
        coords.to_cell_index(self.width)
    }

    pub(crate) fn cell_mut(&mut self, index: CellIndex) -> &mut Cell {
        self.check_index(index);
        &mut self.cells[index]
    }

    pub(crate) fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        // cell counts always fit, the board is at most Coord::MAX squared
        self.cells.iter().filter(|&cell| predicate(cell)).count() as CellCount
    }

    pub(crate) fn check_index(&self, index: CellIndex) {
        assert!(self.initialized, "board has not been initialized");
        assert!(
            index < self.cells.len(),
            "cell index {} outside {}x{} board",
            index,
            self.width,
            self.height
        );
    }

    fn compute_adjacent_counts(&mut self) {
        let size = self.size();
        for index in 0..self.cells.len() {
            let count = neighbor_indexes(index, size)
                .into_iter()
                .filter(|&neighbor| self.cells[neighbor].is_mined())
                .count();
            // at most eight neighbours
            self.cells[index].set_adjacent_mine_count(count as u8);
        }
    }
}

/// Fisher-Yates: every permutation is equally likely.
fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn mine_count(board: &Board) -> CellCount {
        board.count_cells(|cell| cell.is_mined())
    }

    #[test]
    fn construct_does_not_allocate_cells() {
        let board = Board::for_level(1);

        assert!(!board.is_initialized());
        assert!(board.cells().is_empty());
        assert_eq!(board.size(), (10, 10));
        assert_eq!(board.bomb_count(), 20);
    }

    #[test]
    fn easy_board_initializes_with_exact_mine_count() {
        let mut board = Board::for_level(1);
        let mut rng = SmallRng::seed_from_u64(7);

        board.initialize(&mut rng);

        assert!(board.is_initialized());
        assert_eq!(board.cells().len(), 100);
        assert_eq!(mine_count(&board), 20);
    }

    #[test]
    fn reinitialize_replaces_layout() {
        let mut board = Board::for_level(3);
        let mut rng = SmallRng::seed_from_u64(99);

        board.initialize(&mut rng);
        let first = board.cells().to_vec();
        board.initialize(&mut rng);

        assert_eq!(mine_count(&board), 99);
        assert_ne!(first.as_slice(), board.cells());
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let mut a = Board::for_level(2);
        let mut b = Board::for_level(2);

        a.initialize(&mut SmallRng::seed_from_u64(3));
        b.initialize(&mut SmallRng::seed_from_u64(3));

        assert_eq!(a, b);
    }

    #[test]
    fn adjacency_sizes_for_corner_edge_and_interior() {
        let board = Board::for_level(1);

        assert_eq!(board.adjacency(0).len(), 3);
        assert_eq!(board.adjacency(9).len(), 3);
        assert_eq!(board.adjacency(90).len(), 3);
        assert_eq!(board.adjacency(99).len(), 3);
        assert_eq!(board.adjacency(5).len(), 5);
        assert_eq!(board.adjacency(40).len(), 5);
        assert_eq!(board.adjacency(55).len(), 8);
    }

    #[test]
    fn interior_cell_counts_three_mined_neighbors() {
        let board = Board::from_mine_indexes((10, 10), &[44, 46, 56]).unwrap();

        assert_eq!(board.cell(45).adjacent_mine_count(), 3);
        assert_eq!(board.cell(55).adjacent_mine_count(), 3);
        assert_eq!(board.cell(0).adjacent_mine_count(), 0);
    }

    #[test]
    fn from_mine_indexes_rejects_bad_input() {
        assert_eq!(
            Board::from_mine_indexes((2, 2), &[4]),
            Err(GameError::InvalidIndex { index: 4, total: 4 })
        );
        assert_eq!(
            Board::from_mine_indexes((1, 2), &[0, 1]),
            Err(GameError::TooManyMines { mines: 2, total: 2 })
        );
    }

    #[test]
    fn duplicate_mine_indexes_count_once() {
        let board = Board::from_mine_indexes((3, 3), &[4, 4]).unwrap();

        assert_eq!(board.bomb_count(), 1);
    }

    #[test]
    fn shuffle_keeps_every_element() {
        let mut items: Vec<u16> = (0..64).collect();
        shuffle(&mut items, &mut SmallRng::seed_from_u64(1));

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn board_snapshot_serializes() {
        let board = Board::from_mine_indexes((2, 2), &[3]).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, board);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_range_index_fails_fast() {
        let board = Board::from_mine_indexes((2, 2), &[0]).unwrap();

        board.cell(4);
    }
}
