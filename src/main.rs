use anyhow::{bail, Context, Result};
use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use canvas_life::app::App;
use canvas_life::config::{
    SimulationConfig, DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of grid rows
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// Number of grid columns
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,

    /// RNG seed for reproducible random populations
    #[arg(long)]
    seed: Option<u64>,

    /// Window width in logical pixels
    #[arg(long, default_value_t = DEFAULT_SURFACE_WIDTH)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = DEFAULT_SURFACE_HEIGHT)]
    height: u32,

    /// Seed a random population and start running immediately
    #[arg(long)]
    autostart: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"),
    )
    .init();

    let args = Args::parse();
    let mut config = SimulationConfig::new(args.rows, args.columns)?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, (args.width, args.height), args.autostart);
    event_loop.run_app(&mut app)?;

    let simulation = app.simulation();
    if simulation.is_error() {
        bail!("simulation failed: {}", simulation.errors().join("; "));
    }
    log::info!(
        "Exited after {} generations with {} live cells",
        simulation.generation(),
        simulation.live_count()
    );
    Ok(())
}
