use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::{BACKGROUND_COLOR, CELL_COLOR, LINE_COLOR, LINE_WIDTH};
use crate::error::InitError;
use crate::simulation::{CellChange, GpuCell, Grid, Renderer};

/// Cell storage buffer plus a CPU mirror that change records are applied to.
///
/// The mirror is uploaded once per frame, and only when something changed.
pub struct CellBuffers {
    /// One `GpuCell` per grid cell, row-major
    pub cells_buffer: Buffer,
    /// Uniform buffer for render parameters
    pub render_params_buffer: Buffer,
    mirror: Vec<GpuCell>,
    dirty: bool,
    pub rows: u32,
    pub columns: u32,
}

/// Render parameters passed to the fragment shader (80 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderParams {
    // Grid info (8 bytes) + surface size (8 bytes)
    pub rows: u32,
    pub columns: u32,
    pub surface_width: f32,
    pub surface_height: f32,

    // Line width + padding so the colors start on a 16-byte boundary
    pub line_width: f32,
    pub _padding: [f32; 3],

    // Palette (48 bytes)
    pub background: [f32; 4],
    pub line_color: [f32; 4],
    pub cell_color: [f32; 4],
}

/// Dimensions and byte size of a cell storage buffer the device can bind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellBufferLayout {
    pub rows: u32,
    pub columns: u32,
    pub bytes: u64,
}

impl CellBufferLayout {
    /// Check a `rows` x `columns` grid against the device `limits`
    pub fn new(rows: usize, columns: usize, limits: &wgpu::Limits) -> Result<Self, InitError> {
        let limit = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
        let bytes = (rows as u64)
            .checked_mul(columns as u64)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<GpuCell>() as u64))
            .unwrap_or(u64::MAX);
        let too_large = || InitError::GridTooLarge {
            rows,
            columns,
            bytes,
            limit,
        };

        if bytes > limit {
            return Err(too_large());
        }
        Ok(Self {
            rows: u32::try_from(rows).map_err(|_| too_large())?,
            columns: u32::try_from(columns).map_err(|_| too_large())?,
            bytes,
        })
    }
}

impl CellBuffers {
    /// Create an all-dead cell buffer and the render params uniform
    pub fn new(device: &Device, rows: usize, columns: usize) -> Result<Self, InitError> {
        let layout = CellBufferLayout::new(rows, columns, &device.limits())?;

        let cells_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cells-buffer"),
            size: layout.bytes,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let render_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("render-params-buffer"),
            size: std::mem::size_of::<RenderParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            cells_buffer,
            render_params_buffer,
            mirror: vec![GpuCell::default(); rows * columns],
            dirty: true,
            rows: layout.rows,
            columns: layout.columns,
        })
    }

    /// Upload the mirror if it changed since the last upload
    pub fn upload(&mut self, queue: &Queue) {
        if self.dirty {
            queue.write_buffer(&self.cells_buffer, 0, bytemuck::cast_slice(&self.mirror));
            self.dirty = false;
        }
    }

    /// Update render parameters for the current surface size
    pub fn update_render_params(&self, queue: &Queue, surface_size: (u32, u32)) {
        let params = RenderParams {
            rows: self.rows,
            columns: self.columns,
            surface_width: surface_size.0 as f32,
            surface_height: surface_size.1 as f32,
            line_width: LINE_WIDTH,
            _padding: [0.0, 0.0, 0.0],
            background: BACKGROUND_COLOR,
            line_color: LINE_COLOR,
            cell_color: CELL_COLOR,
        };
        queue.write_buffer(&self.render_params_buffer, 0, bytemuck::bytes_of(&params));
    }
}

impl Renderer for CellBuffers {
    fn redraw_all(&mut self, grid: &Grid) {
        for (slot, &alive) in self.mirror.iter_mut().zip(grid.cells()) {
            *slot = GpuCell::from(alive);
        }
        self.dirty = true;
    }

    fn apply_changes(&mut self, changes: &[CellChange]) {
        let columns = self.columns as usize;
        for change in changes {
            if let Some(slot) = self.mirror.get_mut(change.row * columns + change.column) {
                *slot = GpuCell::from(change.alive);
                self.dirty = true;
            }
        }
    }
}
