mod cell;
mod evolver;
mod grid;
mod lifecycle;

pub use cell::{CellChange, ChangeRecord, GpuCell};
pub use evolver::{life_rule, Evolver};
pub use grid::{Grid, GridState};
pub use lifecycle::{FrameHandle, FrameScheduler, Renderer, Simulation, Status, UNKNOWN_ERROR};
