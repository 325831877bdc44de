mod buffers;
mod context;
mod render;

pub use buffers::{CellBufferLayout, CellBuffers, RenderParams};
pub use context::GpuContext;
pub use render::RenderPipeline;
