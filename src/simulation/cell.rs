/// Value of a dead cell in GPU memory
pub const DEAD: u32 = 0;
/// Value of a live cell in GPU memory
pub const ALIVE: u32 = 1;

/// A single cell-state delta produced by one generation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellChange {
    pub row: usize,
    pub column: usize,
    /// State of the cell after the change
    pub alive: bool,
}

impl CellChange {
    pub fn new(row: usize, column: usize, alive: bool) -> Self {
        Self { row, column, alive }
    }
}

/// Deltas of one step, in row-major order. Consumed right away, never stored.
pub type ChangeRecord = Vec<CellChange>;

/// GPU-compatible cell, one `u32` per cell (storage buffers have no `bool`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuCell {
    pub state: u32,
}

impl GpuCell {
    pub fn is_alive(&self) -> bool {
        self.state != DEAD
    }
}

impl From<bool> for GpuCell {
    fn from(alive: bool) -> Self {
        Self {
            state: if alive { ALIVE } else { DEAD },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        assert_eq!(std::mem::size_of::<GpuCell>(), 4);
    }

    #[test]
    fn test_gpu_cell_from_bool() {
        assert_eq!(GpuCell::from(true).state, ALIVE);
        assert_eq!(GpuCell::from(false).state, DEAD);
        assert!(GpuCell::from(true).is_alive());
        assert!(!GpuCell::default().is_alive());
    }
}
