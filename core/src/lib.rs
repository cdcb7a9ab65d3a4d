#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the life simulation engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate user intent into
//! [`Action`] values, the session turns those into [`Command`] values for the
//! world's `apply` entry point, and the world reports what happened through
//! [`Event`] values. The [`Grid`] cell buffer lives here so every system can
//! operate on it without depending on the world.

mod grid;

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

pub use grid::Grid;

/// Describes whether the simulation clock advances generations on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// No automatic advance occurs regardless of elapsed time.
    #[default]
    Stopped,
    /// One advance occurs every time the tick interval elapses.
    Running,
}

impl RunState {
    /// Returns the opposite run state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Stopped => Self::Running,
            Self::Running => Self::Stopped,
        }
    }

    /// Reports whether the state advances generations automatically.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Reason a generation advance was performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Advance {
    /// The clock accumulated a full tick interval while running.
    Scheduled,
    /// The user requested a single step.
    Manual,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the wall-clock time of one frame.
    Tick {
        /// Duration that elapsed since the previous tick.
        dt: Duration,
    },
    /// Advances exactly one generation regardless of the run state.
    Step,
    /// Flips the clock between stopped and running.
    TogglePlayback,
    /// Flips a single cell between alive and dead.
    ToggleCell {
        /// Cell targeted by the edit.
        cell: CellCoord,
    },
    /// Swaps in a fully parsed grid, typically restored from a snapshot.
    ReplaceGrid {
        /// Grid that should become the current generation.
        grid: Grid,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock observed elapsed time.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a new generation replaced the previous grid.
    GenerationAdvanced {
        /// Index of the generation that is now current.
        generation: u64,
        /// Number of live cells in the new generation.
        population: usize,
        /// Whether the clock or the user triggered the advance.
        cause: Advance,
    },
    /// Announces that the clock entered a new run state.
    RunStateChanged {
        /// State that became active.
        state: RunState,
    },
    /// Confirms that a user edit flipped a cell.
    CellToggled {
        /// Cell that was edited.
        cell: CellCoord,
        /// State of the cell after the edit.
        alive: bool,
    },
    /// Reports that a cell edit targeted a coordinate outside the grid.
    CellToggleRejected {
        /// Coordinate supplied by the edit request.
        cell: CellCoord,
    },
    /// Confirms that a replacement grid became the current generation.
    GridReplaced {
        /// Number of live cells in the replacement grid.
        population: usize,
    },
    /// Reports that a replacement grid was refused because its size differs.
    GridReplaceRejected {
        /// Size of the grid currently owned by the world.
        expected: GridSize,
        /// Size of the grid offered as a replacement.
        actual: GridSize,
    },
}

/// Closed set of user intents the presentation layer may submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Advance one generation immediately.
    Step,
    /// Play or pause the automatic advance.
    TogglePlayback,
    /// Flip a single cell after a direct click.
    ToggleCell(CellCoord),
    /// Write the current grid to the provided snapshot path.
    Save(PathBuf),
    /// Replace the current grid with the snapshot stored at the provided path.
    Load(PathBuf),
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell (the `x` axis).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell (the `y` axis).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Error returned when a textual cell coordinate cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseCellCoordError(String);

impl fmt::Display for ParseCellCoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a cell as 'column,row' but found '{}'", self.0)
    }
}

impl std::error::Error for ParseCellCoordError {}

impl FromStr for CellCoord {
    type Err = ParseCellCoordError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCellCoordError(value.to_owned());
        let (column, row) = value.split_once(',').ok_or_else(invalid)?;
        let column = column.trim().parse::<u32>().map_err(|_| invalid())?;
        let row = row.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(column, row))
    }
}

/// Dimensions of a grid measured in whole cells. Both axes are non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new size descriptor, rejecting empty dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Number of cells along the horizontal axis.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cells along the vertical axis.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells covered by the size.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the provided cell lies inside the dimensions.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
