//! Terminal presentation of the world.

use life_sim_core::{Grid, RunState};
use life_sim_world::{query, World};

/// Glyphs used to draw cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Theme {
    alive: char,
    dead: char,
}

impl Theme {
    pub(crate) const DEFAULT_ALIVE: char = '#';
    pub(crate) const DEFAULT_DEAD: char = '.';

    pub(crate) const fn new(alive: char, dead: char) -> Self {
        Self { alive, dead }
    }

    const fn glyph(self, alive: bool) -> char {
        if alive {
            self.alive
        } else {
            self.dead
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALIVE, Self::DEFAULT_DEAD)
    }
}

/// Draws one line per grid row, each terminated by a newline.
pub(crate) fn grid(grid: &Grid, theme: Theme) -> String {
    let width = grid.width() as usize;
    let mut out = String::with_capacity((width + 1) * grid.height() as usize);
    for row in grid.rows() {
        out.extend(row.iter().map(|&alive| theme.glyph(alive)));
        out.push('\n');
    }
    out
}

/// Summary shown beneath the grid. The trailing label names the action the
/// play/pause control would perform next.
pub(crate) fn status_line(world: &World) -> String {
    let state = query::run_state(world);
    format!(
        "generation {} | population {} | {} [{}]",
        query::generation(world),
        query::population(world),
        state_name(state),
        control_label(state),
    )
}

const fn state_name(state: RunState) -> &'static str {
    match state {
        RunState::Stopped => "stopped",
        RunState::Running => "running",
    }
}

const fn control_label(state: RunState) -> &'static str {
    match state {
        RunState::Stopped => "play",
        RunState::Running => "pause",
    }
}
