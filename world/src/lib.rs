#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for the life engine.
//!
//! The world owns the current [`Grid`], the [`SimulationClock`] and the
//! generation counter. All mutation flows through [`apply`], which executes a
//! [`Command`] and reports the outcome as [`Event`] values. Read access goes
//! through the [`query`] module.

use life_sim_core::{Advance, Command, Event, Grid, GridSize};
use life_sim_system_clock::{self as clock, SimulationClock};
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Probability that a cell starts alive when none is configured.
pub const DEFAULT_ALIVE_PROBABILITY: f64 = 0.2;
/// Seed used for the initial distribution when none is configured.
pub const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

const DEFAULT_GRID_SIZE: GridSize = match GridSize::new(40, 30) {
    Some(size) => size,
    None => panic!("default grid dimensions must be non-zero"),
};

/// Configuration parameters required to construct a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    size: GridSize,
    clock: clock::Config,
    alive_probability: f64,
    seed: u64,
}

impl Config {
    /// Creates a configuration for a grid of `size` driven by `clock`, using
    /// the default alive probability and seed.
    #[must_use]
    pub const fn new(size: GridSize, clock: clock::Config) -> Self {
        Self {
            size,
            clock,
            alive_probability: DEFAULT_ALIVE_PROBABILITY,
            seed: DEFAULT_SEED,
        }
    }

    /// Replaces the probability that a cell starts alive. Returns `None`
    /// unless the value lies within `0.0..=1.0`.
    #[must_use]
    pub fn with_alive_probability(mut self, probability: f64) -> Option<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return None;
        }
        self.alive_probability = probability;
        Some(self)
    }

    /// Replaces the seed of the initial distribution.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Dimensions of the simulated grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Clock configuration.
    #[must_use]
    pub const fn clock(&self) -> clock::Config {
        self.clock
    }

    /// Probability that a cell starts alive.
    #[must_use]
    pub const fn alive_probability(&self) -> f64 {
        self.alive_probability
    }

    /// Seed of the initial distribution.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, clock::Config::default())
    }
}

/// Represents the authoritative simulation state.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    clock: SimulationClock,
    generation: u64,
}

impl World {
    /// Creates a stopped world whose grid is randomly populated from the
    /// configured seed and alive probability.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let grid = seed_grid(config.size, config.alive_probability, config.seed);
        Self::with_grid(grid, config.clock)
    }

    /// Creates a stopped world starting from an explicit grid.
    #[must_use]
    pub fn with_grid(grid: Grid, clock: clock::Config) -> Self {
        Self {
            grid,
            clock: SimulationClock::new(clock),
            generation: 0,
        }
    }

    fn advance(&mut self, cause: Advance, out_events: &mut Vec<Event>) {
        self.grid = life_sim_system_rules::advance(&self.grid);
        self.generation = self.generation.saturating_add(1);
        let population = self.grid.population();
        debug!(
            "generation {} ({cause:?}): {population} live cells",
            self.generation
        );
        out_events.push(Event::GenerationAdvanced {
            generation: self.generation,
            population,
            cause,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if let Some(cause) = world.clock.tick(dt) {
                world.advance(cause, out_events);
            }
        }
        Command::Step => {
            let cause = world.clock.step();
            world.advance(cause, out_events);
        }
        Command::TogglePlayback => {
            let state = world.clock.toggle();
            debug!("clock is now {state:?}");
            out_events.push(Event::RunStateChanged { state });
        }
        Command::ToggleCell { cell } => {
            if world.grid.contains(cell) {
                let alive = world.grid.toggle(cell);
                out_events.push(Event::CellToggled { cell, alive });
            } else {
                warn!("ignoring edit of {cell} outside the {} grid", world.grid.size());
                out_events.push(Event::CellToggleRejected { cell });
            }
        }
        Command::ReplaceGrid { grid } => {
            let expected = world.grid.size();
            let actual = grid.size();
            if expected != actual {
                warn!("refusing {actual} replacement for the {expected} grid");
                out_events.push(Event::GridReplaceRejected { expected, actual });
                return;
            }
            world.grid = grid;
            world.generation = 0;
            out_events.push(Event::GridReplaced {
                population: world.grid.population(),
            });
        }
    }
}

/// Builds a grid where each cell is independently alive with `probability`.
///
/// The same seed always yields the same grid. `probability` is clamped to
/// `0.0..=1.0`.
#[must_use]
pub fn seed_grid(size: GridSize, probability: f64, seed: u64) -> Grid {
    let probability = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Grid::from_fn(size, |_| rng.gen_bool(probability))
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use life_sim_core::{Grid, GridSize, RunState};

    /// Provides read-only access to the current generation's grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Dimensions of the simulated grid.
    #[must_use]
    pub fn size(world: &World) -> GridSize {
        world.grid.size()
    }

    /// Current run state of the clock, used for play/pause labelling.
    #[must_use]
    pub fn run_state(world: &World) -> RunState {
        world.clock.run_state()
    }

    /// Number of advances since the grid was seeded or last replaced.
    #[must_use]
    pub fn generation(world: &World) -> u64 {
        world.generation
    }

    /// Number of live cells in the current generation.
    #[must_use]
    pub fn population(world: &World) -> usize {
        world.grid.population()
    }

    /// Interval between scheduled advances.
    #[must_use]
    pub fn tick_interval(world: &World) -> Duration {
        world.clock.interval()
    }
}
