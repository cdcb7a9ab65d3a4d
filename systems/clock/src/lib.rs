#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run-state machine that decides when the next generation is due.
//!
//! The clock never touches the grid. The driver reports frame durations
//! through [`SimulationClock::tick`] and performs an advance whenever the
//! clock answers with an [`Advance`].

use std::time::Duration;

use life_sim_core::{Advance, RunState};

/// Interval used when a configuration does not override it.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Determines what happens to surplus accumulated time once a tick fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TickPolicy {
    /// Discard the accumulator after firing. A long frame yields one advance,
    /// never a burst, which bounds the work done per frame.
    #[default]
    Reset,
    /// Subtract one interval after firing and keep the remainder, so slow
    /// frames are made up over the following frames (one advance per frame).
    CatchUp,
}

/// Configuration parameters required to construct the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    interval: Duration,
    policy: TickPolicy,
}

impl Config {
    /// Creates a configuration with the provided interval and the reset
    /// policy. Returns `None` for a zero interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Option<Self> {
        if interval.is_zero() {
            None
        } else {
            Some(Self {
                interval,
                policy: TickPolicy::Reset,
            })
        }
    }

    /// Replaces the accumulator policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: TickPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Interval between scheduled advances.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Accumulator policy applied after firing.
    #[must_use]
    pub const fn policy(&self) -> TickPolicy {
        self.policy
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: DEFAULT_TICK_INTERVAL,
            policy: TickPolicy::Reset,
        }
    }
}

/// Stopped/running state machine with a fixed tick interval.
#[derive(Clone, Debug)]
pub struct SimulationClock {
    state: RunState,
    interval: Duration,
    policy: TickPolicy,
    accumulator: Duration,
}

impl SimulationClock {
    /// Creates a stopped clock using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            state: RunState::Stopped,
            interval: config.interval,
            policy: config.policy,
            accumulator: Duration::ZERO,
        }
    }

    /// Flips between stopped and running and returns the new state.
    ///
    /// Starting arms the timer from zero; stopping disarms it and drops any
    /// partially accumulated time.
    pub fn toggle(&mut self) -> RunState {
        self.state = self.state.toggled();
        self.accumulator = Duration::ZERO;
        self.state
    }

    /// Records the wall-clock time of one frame and reports whether a
    /// scheduled advance is due.
    ///
    /// At most one advance is reported per call. While stopped the elapsed
    /// time is discarded.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Advance> {
        if !self.state.is_running() {
            return None;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);
        if self.accumulator < self.interval {
            return None;
        }

        self.accumulator = match self.policy {
            TickPolicy::Reset => Duration::ZERO,
            TickPolicy::CatchUp => self.accumulator - self.interval,
        };
        Some(Advance::Scheduled)
    }

    /// Requests one immediate advance. Neither the run state nor the
    /// accumulator changes.
    #[must_use]
    pub const fn step(&self) -> Advance {
        Advance::Manual
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.state
    }

    /// Reports whether scheduled advances are enabled.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Interval between scheduled advances.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Accumulator policy applied after firing.
    #[must_use]
    pub const fn policy(&self) -> TickPolicy {
        self.policy
    }

    /// Time accumulated toward the next scheduled advance.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulator
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
