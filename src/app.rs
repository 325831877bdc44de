use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::SimulationConfig;
use crate::error::InitError;
use crate::gpu::{CellBuffers, GpuContext, RenderPipeline};
use crate::simulation::{FrameHandle, FrameScheduler, Simulation};

/// Frame scheduler backed by `Window::request_redraw`.
///
/// winit redraws cannot be cancelled, so cancelling only forgets the pending
/// handle; the redraw still arrives but finds nothing due.
#[derive(Default)]
pub struct RedrawScheduler {
    window: Option<Arc<Window>>,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl RedrawScheduler {
    pub fn attach(&mut self, window: Arc<Window>) {
        self.window = Some(window);
    }

    /// Take the frame that is due on this redraw, if any
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle::new(self.next_id);
        self.pending = Some(handle);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Map a pointer position on the surface to `(row, column)`
pub fn cell_at(
    position: PhysicalPosition<f64>,
    surface_size: (u32, u32),
    rows: usize,
    columns: usize,
) -> Option<(usize, usize)> {
    let (width, height) = surface_size;
    if width == 0 || height == 0 || position.x < 0.0 || position.y < 0.0 {
        return None;
    }

    let cell_w = width as f64 / columns as f64;
    let cell_h = height as f64 / rows as f64;
    let column = (position.x / cell_w).floor() as usize;
    let row = (position.y / cell_h).floor() as usize;

    (row < rows && column < columns).then_some((row, column))
}

/// Application state
pub struct App {
    simulation: Simulation<RedrawScheduler>,
    window_size: (u32, u32),
    autostart: bool,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    cell_buffers: Option<CellBuffers>,
    render_pipeline: Option<RenderPipeline>,
    cursor: Option<PhysicalPosition<f64>>,
    title_counter: FpsCounter,
}

impl App {
    pub fn new(config: SimulationConfig, window_size: (u32, u32), autostart: bool) -> Self {
        Self {
            simulation: Simulation::new(config, RedrawScheduler::default()),
            window_size,
            autostart,
            window: None,
            gpu: None,
            cell_buffers: None,
            render_pipeline: None,
            cursor: None,
            title_counter: FpsCounter::new(),
        }
    }

    pub fn simulation(&self) -> &Simulation<RedrawScheduler> {
        &self.simulation
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), InitError> {
        let config = *self.simulation.config();
        log::info!("Grid size: {}x{}", config.rows(), config.columns());

        let window_attrs = Window::default_attributes()
            .with_title("Canvas Life - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.window_size.0,
                self.window_size.1,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| InitError::Window(e.to_string()))?,
        );

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;

        let mut cell_buffers = CellBuffers::new(&gpu.device, config.rows(), config.columns())?;
        cell_buffers.update_render_params(&gpu.queue, gpu.size());
        let render_pipeline = RenderPipeline::new(&gpu.device, gpu.format(), &cell_buffers);

        self.simulation.scheduler_mut().attach(window.clone());
        self.simulation.redraw(&mut cell_buffers);

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Space: Start/stop");
        log::info!("  R: Random population");
        log::info!("  C: Clear");
        log::info!("  Left click: Toggle cell");
        log::info!("  Escape: Quit");

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.cell_buffers = Some(cell_buffers);
        self.render_pipeline = Some(render_pipeline);
        Ok(())
    }

    fn render(&mut self) {
        let (Some(gpu), Some(buffers), Some(render)) = (
            self.gpu.as_ref(),
            self.cell_buffers.as_mut(),
            self.render_pipeline.as_ref(),
        ) else {
            return;
        };

        buffers.update_render_params(&gpu.queue, gpu.size());
        buffers.upload(&gpu.queue);

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        render.draw(&mut encoder, &view);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.title_counter.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "Canvas Life - {} - generation {} - {} alive - {:.0} FPS",
                    self.simulation.status(),
                    self.simulation.generation(),
                    self.simulation.live_count(),
                    fps
                ));
            }
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        let Some(buffers) = self.cell_buffers.as_mut() else {
            return;
        };

        match key_code {
            KeyCode::Space => {
                if self.simulation.is_started() {
                    self.simulation.stop();
                } else {
                    self.simulation.start(buffers);
                }
            }
            KeyCode::KeyR => {
                self.simulation.randomize_and_seed(buffers);
            }
            KeyCode::KeyC => {
                self.simulation.clear(buffers);
            }
            _ => return,
        }
        self.request_redraw();
    }

    fn handle_click(&mut self) {
        let (Some(gpu), Some(buffers), Some(position)) =
            (self.gpu.as_ref(), self.cell_buffers.as_mut(), self.cursor)
        else {
            return;
        };

        let config = self.simulation.config();
        let Some((row, column)) = cell_at(position, gpu.size(), config.rows(), config.columns())
        else {
            log::debug!("click at ({:.0}, {:.0}) is off the grid", position.x, position.y);
            return;
        };

        match self.simulation.toggle_cell(row, column, buffers) {
            Ok(alive) => log::debug!("cell ({}, {}) -> {}", row, column, alive),
            Err(e) => log::debug!("toggle rejected: {}", e),
        }
        self.request_redraw();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.simulation.is_error() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.simulation.report_error(e.to_string());
            event_loop.exit();
            return;
        }

        if self.autostart {
            if let Some(buffers) = self.cell_buffers.as_mut() {
                self.simulation.randomize_and_seed(buffers);
                self.simulation.start(buffers);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.simulation.stop();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && !event.repeat {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            self.simulation.stop();
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_click();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(handle) = self.simulation.scheduler_mut().take_due() {
                    if let Some(buffers) = self.cell_buffers.as_mut() {
                        self.simulation.on_frame(handle, buffers);
                    }
                }
                self.render();
            }
            _ => {}
        }
    }
}

/// Frame rate sampled once per second, used for the title bar
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_maps_columns_across_rows_down() {
        let size = (600, 300);
        assert_eq!(cell_at(PhysicalPosition::new(0.0, 0.0), size, 10, 20), Some((0, 0)));
        // 30px wide, 30px tall cells
        assert_eq!(cell_at(PhysicalPosition::new(95.0, 31.0), size, 10, 20), Some((1, 3)));
        assert_eq!(cell_at(PhysicalPosition::new(599.9, 299.9), size, 10, 20), Some((9, 19)));
    }

    #[test]
    fn test_cell_at_off_grid() {
        let size = (100, 100);
        assert_eq!(cell_at(PhysicalPosition::new(100.0, 50.0), size, 10, 10), None);
        assert_eq!(cell_at(PhysicalPosition::new(-1.0, 50.0), size, 10, 10), None);
        assert_eq!(cell_at(PhysicalPosition::new(5.0, 5.0), (0, 0), 10, 10), None);
    }

    #[test]
    fn test_redraw_scheduler_cancel() {
        let mut scheduler = RedrawScheduler::default();
        let first = scheduler.request_frame();
        scheduler.cancel_frame(first);
        assert_eq!(scheduler.take_due(), None);

        let second = scheduler.request_frame();
        assert_ne!(first, second);
        // Cancelling a stale handle leaves the current one armed
        scheduler.cancel_frame(first);
        assert_eq!(scheduler.take_due(), Some(second));
        assert_eq!(scheduler.take_due(), None);
    }
}
