#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Plain-text snapshot codec for grids.
//!
//! A snapshot holds one line per row, top to bottom. Each line lists the
//! row's cells left to right as `0` (dead) or `1` (alive) separated by single
//! spaces and ends with `\n`. A 3x2 grid with its centre-top cell alive is
//! stored as:
//!
//! ```text
//! 0 1 0
//! 0 0 0
//! ```
//!
//! Loading is all-or-nothing: the whole source is parsed into a fresh grid
//! before anything is returned, so a failed load never leaves a caller with a
//! partially restored state.

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use life_sim_core::{Grid, GridSize};
use thiserror::Error;

/// File name used when no snapshot path is configured.
pub const DEFAULT_SNAPSHOT_PATH: &str = "game_state.txt";

/// Errors surfaced while saving or loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The sink or source could not be written, read or opened.
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The snapshot content does not describe a grid of the expected size.
    #[error("malformed snapshot at line {line}: {issue}")]
    Format {
        /// One-based line number where the problem was detected.
        line: usize,
        /// Specific defect found on that line.
        issue: FormatIssue,
    },
}

/// Specific defects that make snapshot content unreadable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatIssue {
    /// A row lists a different number of cells than the grid width.
    #[error("expected {expected} cells but found {found}")]
    CellCount {
        /// Width of the expected grid.
        expected: u32,
        /// Number of tokens present on the line.
        found: usize,
    },
    /// A token is something other than `0` or `1`.
    #[error("token '{token}' is not 0 or 1")]
    InvalidToken {
        /// Offending token, lossily decoded.
        token: String,
    },
    /// The snapshot has a different number of rows than the grid height.
    #[error("expected {expected} rows but found {found}")]
    RowCount {
        /// Height of the expected grid.
        expected: u32,
        /// Number of rows present in the snapshot.
        found: usize,
    },
}

impl SnapshotError {
    fn format(line: usize, issue: FormatIssue) -> Self {
        Self::Format { line, issue }
    }
}

/// Renders the grid in snapshot format.
#[must_use]
pub fn encode(grid: &Grid) -> String {
    let width = grid.width() as usize;
    let mut text = String::with_capacity(grid.as_slice().len() * 2);
    for row in grid.rows() {
        for (column, &alive) in row.iter().enumerate() {
            text.push(if alive { '1' } else { '0' });
            text.push(if column + 1 == width { '\n' } else { ' ' });
        }
    }
    text
}

/// Writes the grid to `sink` in snapshot format.
///
/// Write failures are returned as [`SnapshotError::Io`]; nothing is retried.
pub fn save(grid: &Grid, mut sink: impl Write) -> Result<(), SnapshotError> {
    sink.write_all(encode(grid).as_bytes())?;
    sink.flush()?;
    Ok(())
}

/// Creates (or truncates) the file at `path` and writes the grid into it.
pub fn save_to_path(grid: &Grid, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let file = File::create(path)?;
    save(grid, BufWriter::new(file))
}

/// Parses snapshot text describing a grid of the `expected` size.
pub fn decode(text: &str, expected: GridSize) -> Result<Grid, SnapshotError> {
    decode_bytes(text.as_bytes(), expected)
}

/// Reads a snapshot of the `expected` size from `source`.
///
/// Fails with [`SnapshotError::Io`] when the source cannot be read and with
/// [`SnapshotError::Format`] when the content does not match `expected`.
pub fn load(mut source: impl Read, expected: GridSize) -> Result<Grid, SnapshotError> {
    let mut bytes = Vec::new();
    let _ = source.read_to_end(&mut bytes)?;
    decode_bytes(&bytes, expected)
}

/// Opens the file at `path` and loads a snapshot of the `expected` size.
///
/// A missing file surfaces as [`SnapshotError::Io`] with
/// [`io::ErrorKind::NotFound`].
pub fn load_from_path(path: impl AsRef<Path>, expected: GridSize) -> Result<Grid, SnapshotError> {
    let file = File::open(path)?;
    load(file, expected)
}

fn decode_bytes(bytes: &[u8], expected: GridSize) -> Result<Grid, SnapshotError> {
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let lines: Vec<&[u8]> = if bytes.is_empty() {
        Vec::new()
    } else {
        body.split(|&byte| byte == b'\n').collect()
    };

    let height = expected.height() as usize;
    if lines.len() != height {
        return Err(SnapshotError::format(
            lines.len().min(height) + 1,
            FormatIssue::RowCount {
                expected: expected.height(),
                found: lines.len(),
            },
        ));
    }

    let mut cells = Vec::with_capacity(expected.cell_count());
    for (index, line) in lines.into_iter().enumerate() {
        parse_row(line, expected.width(), &mut cells)
            .map_err(|issue| SnapshotError::format(index + 1, issue))?;
    }

    // `height` rows of exactly `width` cells each: one value per coordinate.
    let width = expected.width() as usize;
    Ok(Grid::from_fn(expected, |cell| {
        cells[cell.row() as usize * width + cell.column() as usize]
    }))
}

fn parse_row(line: &[u8], width: u32, cells: &mut Vec<bool>) -> Result<(), FormatIssue> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let tokens: Vec<&[u8]> = line
        .split(|byte| byte.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.len() != width as usize {
        return Err(FormatIssue::CellCount {
            expected: width,
            found: tokens.len(),
        });
    }

    for token in tokens {
        match token {
            b"0" => cells.push(false),
            b"1" => cells.push(true),
            other => {
                return Err(FormatIssue::InvalidToken {
                    token: String::from_utf8_lossy(other).into_owned(),
                })
            }
        }
    }
    Ok(())
}
