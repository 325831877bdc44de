use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::error::GridError;
use crate::simulation::cell::CellChange;
use crate::simulation::evolver::Evolver;
use crate::simulation::grid::{Grid, GridState};

/// Recorded in place of an empty error message
pub const UNKNOWN_ERROR: &str = "N/A";

/// Lifecycle status of a simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ready,
    Started,
    /// Recognized but never entered: no operation transitions into it
    Paused,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Ready => "ready",
            Status::Started => "started",
            Status::Paused => "paused",
            Status::Error => "error",
        };
        f.write_str(name)
    }
}

/// Opaque token for one scheduled frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host "next frame" primitive.
///
/// When a requested frame fires, the host calls [`Simulation::on_frame`]
/// with the handle it returned here.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Consumer of grid state. Owns every drawing decision.
pub trait Renderer {
    /// Full redraw, on attach, randomize and clear
    fn redraw_all(&mut self, grid: &Grid);
    /// Incremental redraw after a step or an edit
    fn apply_changes(&mut self, changes: &[CellChange]);
}

/// Grid, evolver and the status machine that gates stepping.
///
/// The drive loop is a chain of scheduled frames: each step requests the
/// next frame, and `stop` cancels the pending one. Only a frame whose handle
/// matches the pending handle may run a step.
pub struct Simulation<S: FrameScheduler> {
    config: SimulationConfig,
    grid: GridState,
    evolver: Evolver,
    status: Status,
    errors: Vec<String>,
    scheduler: S,
    pending: Option<FrameHandle>,
    rng: StdRng,
}

impl<S: FrameScheduler> Simulation<S> {
    pub fn new(config: SimulationConfig, scheduler: S) -> Self {
        let grid = GridState::from_config(&config);
        let evolver = Evolver::for_state(&grid);
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        log::info!("Simulation ready: {}x{} grid", config.rows(), config.columns());

        Self {
            config,
            grid,
            evolver,
            status: Status::Ready,
            errors: Vec::new(),
            scheduler,
            pending: None,
            rng,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Every error reported since construction, oldest first
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn generation(&self) -> u64 {
        self.evolver.generation()
    }

    pub fn live_count(&self) -> usize {
        self.grid.live_count()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The frame the drive loop is waiting on, if any
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_ready(&self) -> bool {
        self.status == Status::Ready
    }

    pub fn is_started(&self) -> bool {
        self.status == Status::Started
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    /// Push the whole grid to `renderer`
    pub fn redraw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.redraw_all(self.grid.current());
    }

    /// Start the drive loop. Runs the first step right away and schedules the
    /// next one; returns without waiting for it. No-op unless `Ready`.
    pub fn start<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> bool {
        if !self.is_ready() {
            log::debug!("start ignored in {} state", self.status);
            return false;
        }
        self.status = Status::Started;
        log::info!("Simulation started at generation {}", self.generation());
        self.advance(renderer);
        true
    }

    /// Scheduled callback. Steps only if still started and `handle` is the
    /// pending frame; stale or cancelled frames are dropped.
    pub fn on_frame<R: Renderer + ?Sized>(&mut self, handle: FrameHandle, renderer: &mut R) -> bool {
        if !self.is_started() || self.pending != Some(handle) {
            log::trace!("dropping frame {}", handle.id());
            return false;
        }
        self.pending = None;
        self.advance(renderer);
        true
    }

    /// Stop the drive loop, cancelling the pending frame. No-op unless `Started`.
    pub fn stop(&mut self) -> bool {
        if !self.is_started() {
            log::debug!("stop ignored in {} state", self.status);
            return false;
        }
        self.cancel_pending();
        self.status = Status::Ready;
        log::info!("Simulation stopped at generation {}", self.generation());
        true
    }

    /// Clear the grid and seed a random population of 3%..=15% of all cells.
    /// Refused while started; never changes the status.
    pub fn randomize_and_seed<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> bool {
        if self.is_started() {
            log::warn!("randomize ignored while the simulation is running");
            return false;
        }

        let (min, max) = self.config.seed_range();
        let count = self.rng.gen_range(min..=max);
        if let Err(e) = self.grid.randomize(count, &mut self.rng) {
            log::warn!("randomize failed: {}", e);
            return false;
        }

        log::info!("Seeded {} live cells", count);
        self.redraw(renderer);
        true
    }

    /// Stop if running, then kill every cell
    pub fn clear<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        self.stop();
        self.grid.clear();
        log::info!("Grid cleared");
        self.redraw(renderer);
    }

    /// Interactive edit: flip one cell and redraw it. Returns the new state.
    pub fn toggle_cell<R: Renderer + ?Sized>(
        &mut self,
        row: usize,
        column: usize,
        renderer: &mut R,
    ) -> Result<bool, GridError> {
        let alive = self.grid.toggle_cell(row, column)?;
        renderer.apply_changes(&[CellChange::new(row, column, alive)]);
        Ok(alive)
    }

    /// Record a failure and enter `Error`. Never fails.
    pub fn report_error(&mut self, message: impl Into<String>) {
        let mut message = message.into();
        if message.is_empty() {
            message = UNKNOWN_ERROR.to_string();
        }
        log::error!("Simulation error: {}", message);

        self.cancel_pending();
        self.status = Status::Error;
        self.errors.push(message);
    }

    fn advance<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let changes = self.evolver.step(&mut self.grid);
        renderer.apply_changes(&changes);
        self.pending = Some(self.scheduler.request_frame());
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}
