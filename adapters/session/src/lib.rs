#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Driver that sits between a presentation layer and the simulation world.
//!
//! A [`Session`] is the sole owner and mutator of its [`World`]. Adapters call
//! [`Session::frame`] once per rendered frame with the elapsed wall-clock time
//! and forward user intent through [`Session::perform`]. Snapshot I/O happens
//! here, outside the world, and a loaded grid is only swapped in after it has
//! been parsed completely.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use life_sim_core::{Action, Command, Event};
use life_sim_system_persistence::{self as persistence, SnapshotError};
use life_sim_world::{self as world, query, World};
use log::info;
use thiserror::Error;

/// Errors surfaced while performing user actions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Writing the snapshot failed; the world is unchanged.
    #[error("could not save snapshot to {}", .path.display())]
    Save {
        /// Destination that was being written.
        path: PathBuf,
        /// Underlying codec failure.
        #[source]
        source: SnapshotError,
    },
    /// Reading or parsing the snapshot failed; the world is unchanged.
    #[error("could not load snapshot from {}", .path.display())]
    Load {
        /// Source that was being read.
        path: PathBuf,
        /// Underlying codec failure.
        #[source]
        source: SnapshotError,
    },
}

impl SessionError {
    /// Codec failure that caused the action to fail.
    #[must_use]
    pub fn snapshot_error(&self) -> &SnapshotError {
        match self {
            Self::Save { source, .. } | Self::Load { source, .. } => source,
        }
    }
}

/// Owns the world and translates frames and actions into commands.
#[derive(Debug)]
pub struct Session {
    world: World,
    events: Vec<Event>,
}

impl Session {
    /// Wraps an existing world.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            world,
            events: Vec::new(),
        }
    }

    /// Read-only access to the simulated world for rendering.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Reports the time elapsed since the previous frame. The returned events
    /// include a generation advance when the clock is running and due.
    pub fn frame(&mut self, elapsed: Duration) -> &[Event] {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::Tick { dt: elapsed },
            &mut self.events,
        );
        &self.events
    }

    /// Executes a single user action and returns the events it produced.
    ///
    /// Save and load failures are returned to the caller and leave the world
    /// untouched. Nothing is retried.
    pub fn perform(&mut self, action: Action) -> Result<&[Event], SessionError> {
        self.events.clear();
        match action {
            Action::Step => self.submit(Command::Step),
            Action::TogglePlayback => self.submit(Command::TogglePlayback),
            Action::ToggleCell(cell) => self.submit(Command::ToggleCell { cell }),
            Action::Save(path) => self.save(&path)?,
            Action::Load(path) => self.load(&path)?,
        }
        Ok(&self.events)
    }

    fn submit(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn save(&self, path: &Path) -> Result<(), SessionError> {
        persistence::save_to_path(query::grid(&self.world), path).map_err(|source| {
            SessionError::Save {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!(
            "saved generation {} to {}",
            query::generation(&self.world),
            path.display()
        );
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<(), SessionError> {
        let grid = persistence::load_from_path(path, query::size(&self.world)).map_err(
            |source| SessionError::Load {
                path: path.to_path_buf(),
                source,
            },
        )?;
        info!(
            "loaded {} live cells from {}",
            grid.population(),
            path.display()
        );
        self.submit(Command::ReplaceGrid { grid });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_sim_core::RunState;

    #[test]
    fn frame_reports_elapsed_time() {
        let mut session = Session::new(World::default());
        let events = session.frame(Duration::from_millis(16));
        assert_eq!(
            events,
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(16)
            }]
        );
    }

    #[test]
    fn toggle_playback_flips_run_state() {
        let mut session = Session::new(World::default());
        let events = session
            .perform(Action::TogglePlayback)
            .expect("toggle never fails")
            .to_vec();
        assert_eq!(
            events,
            vec![Event::RunStateChanged {
                state: RunState::Running
            }]
        );
        assert_eq!(query::run_state(session.world()), RunState::Running);
    }
}
