use crate::error::ConfigError;

/// Default grid dimensions (100x100 = 10K cells)
pub const DEFAULT_ROWS: usize = 100;
pub const DEFAULT_COLUMNS: usize = 100;

/// Default drawing surface size in logical pixels
pub const DEFAULT_SURFACE_WIDTH: u32 = 600;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 600;

// ============================================
// Seeding
// ============================================

/// Lower bound of a random seed population, in percent of all cells
pub const SEED_MIN_PERCENT: usize = 3;

/// Upper bound of a random seed population, in percent of all cells
pub const SEED_MAX_PERCENT: usize = 15;

// ============================================
// Life rule (B3/S23)
// ============================================

/// Neighbors needed for a dead cell to come alive
pub const BIRTH_COUNT: u8 = 3;
/// Min neighbors for a live cell to survive
pub const SURVIVAL_MIN: u8 = 2;
/// Max neighbors for a live cell to survive
pub const SURVIVAL_MAX: u8 = 3;

// ============================================
// Palette
// ============================================

/// Field background (#262626)
pub const BACKGROUND_COLOR: [f32; 4] = [0.149, 0.149, 0.149, 1.0];

/// Grid lines (#666)
pub const LINE_COLOR: [f32; 4] = [0.4, 0.4, 0.4, 1.0];

/// Live cells (#f00)
pub const CELL_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Grid line thickness in pixels
pub const LINE_WIDTH: f32 = 0.3;

/// Immutable per-instance simulation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    rows: usize,
    columns: usize,
    seed: Option<u64>,
}

impl SimulationConfig {
    /// Create a configuration for a `rows` x `columns` grid.
    pub fn new(rows: usize, columns: usize) -> Result<Self, ConfigError> {
        if rows == 0 || columns == 0 {
            return Err(ConfigError::ZeroDimension { rows, columns });
        }
        if rows.checked_mul(columns).is_none() {
            return Err(ConfigError::TooLarge { rows, columns });
        }
        Ok(Self {
            rows,
            columns,
            seed: None,
        })
    }

    /// Fix the RNG seed so randomized populations are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Total number of cells on the grid. `new` guarantees it fits in `usize`.
    pub fn max_cells(&self) -> usize {
        self.rows * self.columns
    }

    /// Inclusive bounds of a random seed population, rounded down
    pub fn seed_range(&self) -> (usize, usize) {
        let max = self.max_cells();
        (percent_of(max, SEED_MIN_PERCENT), percent_of(max, SEED_MAX_PERCENT))
    }
}

/// `floor(value * percent / 100)` without overflowing for large `value`
fn percent_of(value: usize, percent: usize) -> usize {
    value / 100 * percent + value % 100 * percent / 100
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let config = SimulationConfig::default();
        assert_eq!(config.rows(), 100);
        assert_eq!(config.columns(), 100);
        assert_eq!(config.max_cells(), 10_000);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            SimulationConfig::new(0, 5),
            Err(ConfigError::ZeroDimension { rows: 0, columns: 5 })
        );
        assert!(SimulationConfig::new(5, 0).is_err());
        assert!(SimulationConfig::new(1, 1).is_ok());
    }

    #[test]
    fn test_seed_range() {
        let config = SimulationConfig::default();
        assert_eq!(config.seed_range(), (300, 1500));

        // 7x7 = 49 cells: 1.47 and 7.35 round down
        let small = SimulationConfig::new(7, 7).unwrap();
        assert_eq!(small.seed_range(), (1, 7));

        let tiny = SimulationConfig::new(1, 1).unwrap();
        assert_eq!(tiny.seed_range(), (0, 0));
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        assert_eq!(
            SimulationConfig::new(usize::MAX, 2),
            Err(ConfigError::TooLarge {
                rows: usize::MAX,
                columns: 2
            })
        );
        let half = 1usize << (usize::BITS / 2);
        assert!(SimulationConfig::new(half, half).is_err());
        assert!(SimulationConfig::new(half, half - 1).is_ok());
    }

    #[test]
    fn test_seed_range_on_huge_grid() {
        // max * 15 would overflow; the bounds must still come out exact
        let config = SimulationConfig::new(usize::MAX, 1).unwrap();
        let exact = |percent: u128| (usize::MAX as u128 * percent / 100) as usize;
        assert_eq!(config.seed_range(), (exact(3), exact(15)));

        let half = 1usize << (usize::BITS / 2 - 1);
        let config = SimulationConfig::new(half, half).unwrap();
        let max = (half * half) as u128;
        assert_eq!(
            config.seed_range(),
            ((max * 3 / 100) as usize, (max * 15 / 100) as usize)
        );
    }

    #[test]
    fn test_with_seed() {
        let config = SimulationConfig::new(3, 4).unwrap().with_seed(42);
        assert_eq!(config.seed(), Some(42));
        assert_eq!(config.max_cells(), 12);
    }
}
