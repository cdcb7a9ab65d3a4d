#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure rule system that computes the next generation of a grid.
//!
//! Every cell of the output is derived from the neighbour counts of the input
//! grid, which is only ever borrowed immutably. The update therefore cannot
//! observe partially written state and is independent of iteration order.

use life_sim_core::Grid;

/// Applies Conway's birth/survival rule to a single cell.
///
/// A live cell survives with two or three live neighbours and dies otherwise;
/// a dead cell becomes alive with exactly three.
#[must_use]
pub const fn next_state(alive: bool, neighbours: u8) -> bool {
    matches!((alive, neighbours), (true, 2) | (true, 3) | (false, 3))
}

/// Produces the generation that follows `grid`.
///
/// The result has the same dimensions as the input. Runs in `O(width * height)`
/// time and allocates one output buffer of the same size.
#[must_use]
pub fn advance(grid: &Grid) -> Grid {
    Grid::from_fn(grid.size(), |cell| {
        next_state(grid.get(cell), grid.neighbor_count(cell))
    })
}
