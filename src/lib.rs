//! Conway's Game of Life on an edge-bounded grid, driven one generation per
//! host frame and drawn with wgpu.

pub mod app;
pub mod config;
pub mod error;
pub mod gpu;
pub mod simulation;
