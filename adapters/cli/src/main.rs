#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the life simulation in a terminal.

mod config;
mod render;

use std::{
    io::{self, Write},
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use life_sim_core::{Action, CellCoord, Event, RunState};
use life_sim_session::Session;
use life_sim_world::{query, World};
use log::info;

use crate::{config::Overrides, render::Theme};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Parser)]
#[command(
    name = "life-sim",
    about = "Conway's Game of Life on a wrapping grid",
    version
)]
struct Args {
    /// Configuration file (defaults to ./life-sim.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Grid width in cells.
    #[arg(long)]
    width: Option<u32>,
    /// Grid height in cells.
    #[arg(long)]
    height: Option<u32>,
    /// Milliseconds between scheduled generations.
    #[arg(long = "tick-ms", value_name = "MS")]
    tick_ms: Option<u64>,
    /// Probability that each cell starts alive.
    #[arg(long)]
    probability: Option<f64>,
    /// Seed for the initial distribution.
    #[arg(long)]
    seed: Option<u64>,
    /// Start with the clock running.
    #[arg(long)]
    running: bool,
    /// Snapshot file used by --load and --save.
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,
    /// Replace the seeded grid with the snapshot before doing anything else.
    #[arg(long)]
    load: bool,
    /// Write the final grid to the snapshot file.
    #[arg(long)]
    save: bool,
    /// Flip a cell, given as X,Y. May be repeated.
    #[arg(long = "toggle", value_name = "X,Y")]
    toggles: Vec<CellCoord>,
    /// Number of manual steps to apply.
    #[arg(long, default_value_t = 0)]
    generations: u64,
    /// Number of frames to drive with the clock running.
    #[arg(long, default_value_t = 0)]
    frames: u32,
    /// Duration of each frame.
    #[arg(long = "frame-ms", value_name = "MS", default_value_t = 16)]
    frame_ms: u64,
    /// Sleep between frames and redraw the grid after each one.
    #[arg(long)]
    realtime: bool,
    /// Suppress the grid and status output.
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            width: self.width,
            height: self.height,
            tick_interval_ms: self.tick_ms,
            alive_probability: self.probability,
            seed: self.seed,
            start: self.running.then_some(RunState::Running),
            snapshot_path: self.snapshot.clone(),
        }
    }
}

/// Entry point for the life simulation command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run(&Args::parse())
}

fn run(args: &Args) -> Result<()> {
    let settings = config::load(args.config.as_deref(), &args.overrides())
        .context("failed to load configuration")?;
    info!(
        "seeding a {} grid with seed {}",
        settings.world.size(),
        settings.world.seed()
    );

    let mut session = Session::new(World::new(&settings.world));
    if settings.start.is_running() {
        let _ = session.perform(Action::TogglePlayback)?;
    }

    if args.load {
        let _ = session.perform(Action::Load(settings.snapshot_path.clone()))?;
    }

    for &cell in &args.toggles {
        let events = session.perform(Action::ToggleCell(cell))?;
        if events.contains(&Event::CellToggleRejected { cell }) {
            bail!(
                "cell {cell} lies outside the {} grid",
                query::size(session.world())
            );
        }
    }

    for _ in 0..args.generations {
        let _ = session.perform(Action::Step)?;
    }

    if args.frames > 0 {
        drive_frames(&mut session, args, settings.theme)?;
    }

    if args.save {
        let _ = session.perform(Action::Save(settings.snapshot_path.clone()))?;
    }

    if !args.quiet {
        draw(&session, settings.theme, args.realtime && args.frames > 0)?;
    }
    Ok(())
}

fn drive_frames(session: &mut Session, args: &Args, theme: Theme) -> Result<()> {
    if !query::run_state(session.world()).is_running() {
        let _ = session.perform(Action::TogglePlayback)?;
    }

    let frame = Duration::from_millis(args.frame_ms);
    let mut last = Instant::now();
    for _ in 0..args.frames {
        let elapsed = if args.realtime {
            thread::sleep(frame);
            let now = Instant::now();
            let elapsed = now.duration_since(last);
            last = now;
            elapsed
        } else {
            frame
        };
        let _ = session.frame(elapsed);
        if args.realtime && !args.quiet {
            draw(session, theme, true)?;
        }
    }
    Ok(())
}

fn draw(session: &Session, theme: Theme, clear: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if clear {
        write!(out, "{CLEAR_SCREEN}")?;
    }
    write!(out, "{}", render::grid(query::grid(session.world()), theme))?;
    writeln!(out, "{}", render::status_line(session.world()))?;
    out.flush().context("failed to write to stdout")
}
