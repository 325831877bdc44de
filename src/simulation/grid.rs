use rand::Rng;

use crate::config::SimulationConfig;
use crate::error::GridError;

/// Row-major matrix of live/dead cells with fixed dimensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-dead grid. `SimulationConfig::new` is where dimensions
    /// whose product overflows get rejected.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![false; rows * columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells (`rows * columns`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounds-checked cell lookup
    pub fn get(&self, row: usize, column: usize) -> Result<bool, GridError> {
        self.index(row, column).map(|idx| self.cells[idx])
    }

    /// Cells in row-major order
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Coordinates of every live cell, row-major
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(idx, _)| (idx / columns, idx % columns))
    }

    /// Full-scan count of live cells
    pub fn count_alive(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Live cells in the Moore neighborhood of `(row, column)`.
    ///
    /// The neighborhood is clipped at the grid edges (no wraparound) and never
    /// includes the cell itself. Callers outside the crate go through the
    /// checked `GridState::neighbor_count`.
    pub(crate) fn neighbor_count(&self, row: usize, column: usize) -> u8 {
        debug_assert!(
            row < self.rows && column < self.columns,
            "({}, {}) outside {}x{} grid",
            row,
            column,
            self.rows,
            self.columns
        );
        let row_end = (row + 1).min(self.rows - 1);
        let col_end = (column + 1).min(self.columns - 1);

        let mut count = 0;
        for r in row.saturating_sub(1)..=row_end {
            let base = r * self.columns;
            for c in column.saturating_sub(1)..=col_end {
                if (r, c) != (row, column) && self.cells[base + c] {
                    count += 1;
                }
            }
        }
        count
    }

    /// Overwrite this grid with `other`, reusing the allocation
    pub fn copy_from(&mut self, other: &Grid) {
        self.rows = other.rows;
        self.columns = other.columns;
        self.cells.clone_from(&other.cells);
    }

    fn index(&self, row: usize, column: usize) -> Result<usize, GridError> {
        if row >= self.rows || column >= self.columns {
            return Err(GridError::OutOfRange {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(row * self.columns + column)
    }
}

/// Sole mutable owner of the current generation and its live-cell count.
///
/// The live count is adjusted on every flip and always equals
/// `current().count_alive()`.
#[derive(Clone, Debug)]
pub struct GridState {
    current: Grid,
    live_count: usize,
}

impl GridState {
    /// Create an all-dead grid
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            current: Grid::new(rows, columns),
            live_count: 0,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.rows(), config.columns())
    }

    pub fn rows(&self) -> usize {
        self.current.rows
    }

    pub fn columns(&self) -> usize {
        self.current.columns
    }

    pub fn max_cells(&self) -> usize {
        self.current.len()
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Read-only view of the current generation
    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn is_alive(&self, row: usize, column: usize) -> Result<bool, GridError> {
        self.current.get(row, column)
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.current.cells.fill(false);
        self.live_count = 0;
    }

    /// Set one cell. Returns whether the state actually changed.
    pub fn set_cell(&mut self, row: usize, column: usize, alive: bool) -> Result<bool, GridError> {
        let idx = self.current.index(row, column)?;
        Ok(self.write(idx, alive))
    }

    /// Flip one cell. Returns its new state.
    pub fn toggle_cell(&mut self, row: usize, column: usize) -> Result<bool, GridError> {
        let idx = self.current.index(row, column)?;
        let alive = !self.current.cells[idx];
        self.write(idx, alive);
        Ok(alive)
    }

    /// Clear the grid, then bring exactly `count` distinct cells to life,
    /// chosen uniformly without replacement.
    pub fn randomize<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<(), GridError> {
        let max = self.max_cells();
        if count > max {
            return Err(GridError::InvalidArgument { count, max });
        }

        self.clear();
        for idx in rand::seq::index::sample(rng, max, count) {
            self.current.cells[idx] = true;
        }
        self.live_count = count;
        Ok(())
    }

    /// Immutable copy of the current generation
    pub fn snapshot(&self) -> Grid {
        self.current.clone()
    }

    /// Copy the current generation into a preallocated buffer
    pub fn snapshot_into(&self, target: &mut Grid) {
        target.copy_from(&self.current);
    }

    /// Live neighbors of `(row, column)` counted in `source`, not in the
    /// current generation.
    pub fn neighbor_count(&self, row: usize, column: usize, source: &Grid) -> Result<u8, GridError> {
        source.index(row, column)?;
        Ok(source.neighbor_count(row, column))
    }

    /// Unchecked write used once the index is known to be valid
    pub(crate) fn write(&mut self, idx: usize, alive: bool) -> bool {
        let cell = &mut self.current.cells[idx];
        if *cell == alive {
            return false;
        }
        *cell = alive;
        if alive {
            self.live_count += 1;
        } else {
            self.live_count -= 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid_with(rows: usize, columns: usize, alive: &[(usize, usize)]) -> GridState {
        let mut state = GridState::new(rows, columns);
        for &(r, c) in alive {
            state.set_cell(r, c, true).unwrap();
        }
        state
    }

    #[test]
    fn test_grid_creation() {
        let state = GridState::new(10, 20);
        assert_eq!(state.rows(), 10);
        assert_eq!(state.columns(), 20);
        assert_eq!(state.max_cells(), 200);
        assert_eq!(state.live_count(), 0);
        assert_eq!(state.current().count_alive(), 0);
    }

    #[test]
    fn test_set_cell_counts_real_changes_only() {
        let mut state = GridState::new(3, 3);
        assert_eq!(state.set_cell(1, 1, true), Ok(true));
        assert_eq!(state.live_count(), 1);

        // Same state again is a valid no-op
        assert_eq!(state.set_cell(1, 1, true), Ok(false));
        assert_eq!(state.live_count(), 1);

        assert_eq!(state.set_cell(1, 1, false), Ok(true));
        assert_eq!(state.live_count(), 0);
        assert_eq!(state.set_cell(0, 2, false), Ok(false));
        assert_eq!(state.live_count(), 0);
    }

    #[test]
    fn test_set_cell_out_of_range() {
        let mut state = grid_with(3, 4, &[(0, 0)]);

        let err = state.set_cell(3, 0, true).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfRange {
                row: 3,
                column: 0,
                rows: 3,
                columns: 4
            }
        );
        assert!(state.set_cell(0, 4, true).is_err());
        assert_eq!(state.live_count(), 1);
        assert_eq!(state.current().count_alive(), 1);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut state = grid_with(4, 4, &[(2, 2)]);
        let before = state.snapshot();

        for &(r, c) in &[(0, 0), (2, 2), (3, 1)] {
            let was = state.is_alive(r, c).unwrap();
            assert_eq!(state.toggle_cell(r, c), Ok(!was));
            assert_eq!(state.toggle_cell(r, c), Ok(was));
        }
        assert_eq!(state.current(), &before);
        assert_eq!(state.live_count(), 1);
        assert!(state.toggle_cell(4, 0).is_err());
    }

    #[test]
    fn test_clear() {
        let mut state = grid_with(3, 3, &[(0, 0), (1, 2), (2, 1)]);
        assert_eq!(state.live_count(), 3);
        state.clear();
        assert_eq!(state.live_count(), 0);
        assert_eq!(state.current().count_alive(), 0);
    }

    #[test]
    fn test_randomize_exact_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = grid_with(5, 5, &[(0, 0), (4, 4)]);

        for count in [0, 1, 12, 25] {
            state.randomize(count, &mut rng).unwrap();
            assert_eq!(state.live_count(), count);
            assert_eq!(state.current().count_alive(), count);
        }
    }

    #[test]
    fn test_randomize_rejects_overfull() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = grid_with(2, 2, &[(1, 1)]);

        assert_eq!(
            state.randomize(5, &mut rng),
            Err(GridError::InvalidArgument { count: 5, max: 4 })
        );
        // No partial mutation
        assert_eq!(state.live_count(), 1);
        assert_eq!(state.is_alive(1, 1), Ok(true));
    }

    #[test]
    fn test_neighbor_count_interior_and_edges() {
        let full = {
            let mut state = GridState::new(3, 3);
            state.randomize(9, &mut StdRng::seed_from_u64(1)).unwrap();
            state.snapshot()
        };
        assert_eq!(full.neighbor_count(1, 1), 8);
        assert_eq!(full.neighbor_count(0, 0), 3);
        assert_eq!(full.neighbor_count(0, 1), 5);
        assert_eq!(full.neighbor_count(2, 2), 3);
    }

    #[test]
    fn test_neighbor_count_excludes_self_and_does_not_wrap() {
        let state = grid_with(4, 4, &[(0, 0), (3, 3), (0, 3)]);
        let grid = state.current();
        assert_eq!(grid.neighbor_count(0, 0), 0);
        assert_eq!(grid.neighbor_count(3, 0), 0);
        assert_eq!(grid.neighbor_count(1, 1), 1);
        assert_eq!(grid.neighbor_count(2, 2), 1);
    }

    #[test]
    fn test_single_cell_grid() {
        let mut state = GridState::new(1, 1);
        state.set_cell(0, 0, true).unwrap();
        assert_eq!(state.current().neighbor_count(0, 0), 0);
    }

    #[test]
    fn test_neighbor_count_reads_source_not_current() {
        let mut state = grid_with(3, 3, &[(0, 1), (1, 0)]);
        let snapshot = state.snapshot();
        state.clear();

        assert_eq!(state.neighbor_count(1, 1, &snapshot), Ok(2));
        assert_eq!(state.current().neighbor_count(1, 1), 0);
        assert!(state.neighbor_count(3, 3, &snapshot).is_err());
    }

    #[test]
    fn test_neighbor_count_one_past_last_row_is_rejected() {
        let state = grid_with(3, 3, &[(2, 0), (2, 1)]);
        let snapshot = state.snapshot();
        assert_eq!(
            state.neighbor_count(3, 0, &snapshot),
            Err(GridError::OutOfRange {
                row: 3,
                column: 0,
                rows: 3,
                columns: 3
            })
        );
        assert_eq!(state.neighbor_count(2, 0, &snapshot), Ok(1));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside 3x3 grid")]
    fn test_unchecked_neighbor_count_asserts_bounds() {
        let state = grid_with(3, 3, &[(2, 0)]);
        state.current().neighbor_count(3, 0);
    }

    #[test]
    fn test_snapshot_into_reuses_buffer() {
        let state = grid_with(3, 3, &[(2, 0)]);
        let mut target = Grid::new(3, 3);
        state.snapshot_into(&mut target);
        assert_eq!(&target, state.current());
        assert_eq!(target.live_cells().collect::<Vec<_>>(), vec![(2, 0)]);
    }

    proptest! {
        #[test]
        fn prop_live_count_tracks_edits(
            edits in prop::collection::vec((0usize..6, 0usize..5, any::<bool>(), any::<bool>()), 0..64)
        ) {
            let mut state = GridState::new(6, 5);
            for (r, c, toggle, alive) in edits {
                if toggle {
                    state.toggle_cell(r, c).unwrap();
                } else {
                    state.set_cell(r, c, alive).unwrap();
                }
                prop_assert_eq!(state.live_count(), state.current().count_alive());
            }
        }

        #[test]
        fn prop_randomize_yields_count(rows in 1usize..12, columns in 1usize..12, seed in any::<u64>(), pick in 0.0f64..=1.0) {
            let mut state = GridState::new(rows, columns);
            let count = (pick * (rows * columns) as f64) as usize;
            state.randomize(count, &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert_eq!(state.live_count(), count);
            prop_assert_eq!(state.current().count_alive(), count);
        }
    }
}
