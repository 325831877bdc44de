//! Error types for the simulation core and its host adapters.

use thiserror::Error;

/// Failures of grid operations. Raised before any mutation happens.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Cell coordinate outside the grid bounds
    #[error("cell ({row}, {column}) is outside the {rows}x{columns} grid")]
    OutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    /// Requested population does not fit on the grid
    #[error("cannot place {count} live cells on a grid of {max} cells")]
    InvalidArgument { count: usize, max: usize },
}

/// Rejected simulation configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {rows}x{columns}")]
    ZeroDimension { rows: usize, columns: usize },

    #[error("grid of {rows}x{columns} cells is too large to address")]
    TooLarge { rows: usize, columns: usize },
}

/// Construction-time failures of the rendering surface.
///
/// These never escape the lifecycle layer; they are recorded through
/// `Simulation::report_error` and surface only as the `Error` status.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("window creation failed: {0}")]
    Window(String),

    #[error("surface creation failed: {0}")]
    Surface(String),

    #[error("no suitable GPU adapter found")]
    Adapter,

    #[error("device request failed: {0}")]
    Device(String),

    #[error("surface not supported by adapter")]
    SurfaceUnsupported,

    /// Cell buffer exceeds what the device can bind
    #[error("{rows}x{columns} grid needs {bytes} bytes of cell storage, device limit is {limit}")]
    GridTooLarge {
        rows: usize,
        columns: usize,
        bytes: u64,
        limit: u64,
    },
}
