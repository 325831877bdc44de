use crate::config::{BIRTH_COUNT, SURVIVAL_MAX, SURVIVAL_MIN};
use crate::simulation::cell::{CellChange, ChangeRecord};
use crate::simulation::grid::{Grid, GridState};

/// B3/S23: whether a cell is alive in the next generation
pub fn life_rule(alive: bool, neighbors: u8) -> bool {
    if alive {
        (SURVIVAL_MIN..=SURVIVAL_MAX).contains(&neighbors)
    } else {
        neighbors == BIRTH_COUNT
    }
}

/// Applies one generation of the Life rule to a `GridState`.
///
/// Keeps the previous generation in a buffer that is refilled at the start of
/// every step, so neighbor counts never see cells already updated in the same
/// step.
pub struct Evolver {
    previous: Grid,
    generation: u64,
}

impl Evolver {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            previous: Grid::new(rows, columns),
            generation: 0,
        }
    }

    pub fn for_state(state: &GridState) -> Self {
        Self::new(state.rows(), state.columns())
    }

    /// Steps taken so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The generation the last step was computed from
    pub fn previous(&self) -> &Grid {
        &self.previous
    }

    /// Advance `state` by one generation and return the cells that flipped.
    ///
    /// An empty record means the population is stable; that is not an error.
    pub fn step(&mut self, state: &mut GridState) -> ChangeRecord {
        state.snapshot_into(&mut self.previous);

        let columns = self.previous.columns();
        let mut changes = ChangeRecord::new();

        for (idx, &alive) in self.previous.cells().iter().enumerate() {
            let (row, column) = (idx / columns, idx % columns);
            let next = life_rule(alive, self.previous.neighbor_count(row, column));
            if next != alive {
                state.write(idx, next);
                changes.push(CellChange::new(row, column, next));
            }
        }

        self.generation += 1;
        log::trace!(
            "generation {}: {} changes, {} alive",
            self.generation,
            changes.len(),
            state.live_count()
        );
        changes
    }
}
