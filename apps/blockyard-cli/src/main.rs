mod script;

use std::path::PathBuf;

use blockyard_common::CellCoord;
use blockyard_cull::VisibilitySelector;
use blockyard_input::{CameraMode, InputEvent};
use blockyard_render::{RecordingSink, WorldPainter};
use blockyard_sim::{Frame, SimConfig, Simulation};
use blockyard_view::ViewPose;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockyard-cli", about = "Headless tools for the blockyard world")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, world stats and the effective config
    Info,
    /// Print the carved world as ASCII
    Map {
        /// Blank out cells beyond the render radius from the start pose
        #[arg(long)]
        visible: bool,
    },
    /// Run a scripted walk, e.g. "w:30,wd:10,q:18"
    Walk {
        script: String,
    },
    /// Walk a script, then paint the last frame into a recording sink
    Render {
        #[arg(short, long, default_value = "")]
        script: String,
        /// Print every recorded draw call
        #[arg(long)]
        list: bool,
        /// View through the orbit camera; W/S/A/D in the script step it
        #[arg(long)]
        orbit: bool,
        /// Orbit field-of-view scale
        #[arg(long, default_value = "1.0")]
        zoom: f32,
        #[arg(long, default_value = "1280")]
        width: f32,
        #[arg(long, default_value = "720")]
        height: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let mut sim = Simulation::new(config)?;
    // Headless: there are no textures to wait for.
    sim.finish_loading(Ok::<(), String>(()));

    match cli.command {
        Commands::Info => {
            let grid = sim.grid();
            let goal = sim.goal().goal();
            let start = CellCoord::from_world(sim.camera().eye());
            println!("blockyard-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "world: {0}x{0}, solid cells={1}",
                grid.size(),
                grid.solid_count()
            );
            println!(
                "goal: {goal}, carve fits={}, reachable from {start}={}",
                sim.config().carve.is_valid_for(goal, grid.size()),
                grid.reachable_from(start).contains(&goal)
            );
            println!("config:\n{}", sim.config().to_json_pretty()?);
        }
        Commands::Map { visible } => {
            let eye = sim.camera().eye();
            let walker = CellCoord::from_world(eye);
            let goal = sim.goal().goal();
            let selector = VisibilitySelector::new(sim.config().render_radius);
            let grid = sim.grid();
            let size = grid.size() as i32;
            for z in 0..size {
                let row: String = (0..size)
                    .map(|x| {
                        let cell = CellCoord::new(x, z);
                        if cell == walker {
                            '@'
                        } else if cell == goal {
                            'G'
                        } else if visible && !selector.is_visible(cell, eye) {
                            ' '
                        } else {
                            match grid.height_at(cell) {
                                0 => '.',
                                h => char::from(b'0' + h),
                            }
                        }
                    })
                    .collect();
                println!("{row}");
            }
        }
        Commands::Walk { script } => {
            let segments = script::parse(&script)?;
            run_script(&mut sim, &segments)?;
            let eye = sim.camera().eye();
            println!(
                "final: eye=({:.2}, {:.2}) yaw={:.1} ticks={} goal={}",
                eye.x,
                eye.z,
                sim.camera().yaw(),
                sim.tick_count(),
                if sim.goal_state().reached() { "reached" } else { "not reached" }
            );
        }
        Commands::Render {
            script,
            list,
            orbit,
            zoom,
            width,
            height,
        } => {
            sim.set_viewport(width, height);
            if orbit {
                sim.set_camera_mode(CameraMode::Orbit);
                sim.set_orbit_zoom(zoom);
            }
            let segments = script::parse(&script)?;
            let frame = match run_script(&mut sim, &segments)? {
                Some(frame) => frame,
                None => sim.tick()?,
            };
            let painter = WorldPainter::new(sim.grid().size(), sim.goal().goal())?;
            let mut sink = RecordingSink::new();
            painter.paint_frame(&frame.visible, &mut sink);

            let eye = sim.active_view().eye();
            println!(
                "tick {}: eye=({:.2}, {:.2}, {:.2}) visible={}",
                frame.tick,
                eye.x,
                eye.y,
                eye.z,
                frame.visible.len()
            );
            println!("{}", sink.summary());
            if list {
                for call in &sink.calls {
                    println!(
                        "  {:?} half={:?} {:?} tint={:?} weight={}",
                        call.center,
                        call.half_extents,
                        call.surface.texture,
                        call.surface.texture.tint(),
                        call.surface.texture_weight
                    );
                }
            }
        }
    }

    for event in sim.drain_status() {
        tracing::debug!(?event, "status");
    }

    Ok(())
}

/// Drive the simulation through `segments`, returning the last frame.
fn run_script(
    sim: &mut Simulation,
    segments: &[script::Segment],
) -> anyhow::Result<Option<Frame>> {
    let mut last = None;
    for segment in segments {
        for &key in &segment.keys {
            if let Some(outcome) = sim.handle_event(InputEvent::KeyDown(key)) {
                println!("edit: {outcome:?}");
            }
        }
        for _ in 0..segment.frames {
            let frame = sim.tick()?;
            if frame.goal_reached_now {
                println!("goal reached at tick {}", frame.tick);
            }
            last = Some(frame);
        }
        for &key in &segment.keys {
            sim.handle_event(InputEvent::KeyUp(key));
        }

        let eye = sim.camera().eye();
        println!(
            "{:?} x{}: eye=({:.2}, {:.2}) yaw={:.1}",
            segment.keys,
            segment.frames,
            eye.x,
            eye.z,
            sim.camera().yaw()
        );
    }
    Ok(last)
}
