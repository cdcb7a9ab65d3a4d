use std::{
    io::{self, Write},
    path::PathBuf,
};

use life_sim_core::{CellCoord, Grid, GridSize};
use life_sim_system_persistence::{
    encode, load, load_from_path, save, save_to_path, FormatIssue, SnapshotError,
};
use proptest::prelude::*;

fn size(width: u32, height: u32) -> GridSize {
    GridSize::new(width, height).expect("valid size")
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "life-sim-persistence-{}-{name}.txt",
        std::process::id()
    ))
}

struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only sink"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn saved_bytes_match_the_documented_layout() {
    let grid = Grid::with_alive(
        size(4, 3),
        &[CellCoord::new(0, 0), CellCoord::new(3, 1), CellCoord::new(1, 2)],
    );
    let mut bytes = Vec::new();
    save(&grid, &mut bytes).expect("in-memory save");

    assert_eq!(bytes, b"1 0 0 0\n0 0 0 1\n0 1 0 0\n");
}

#[test]
fn non_numeric_token_fails_and_keeps_the_current_grid() {
    let mut current = Grid::with_alive(size(3, 3), &[CellCoord::new(1, 1)]);
    let before = current.clone();

    let result = load(&b"0 0 0\n0 x 0\n0 0 0\n"[..], size(3, 3));
    match result {
        Ok(grid) => current = grid,
        Err(SnapshotError::Format { line, issue }) => {
            assert_eq!(line, 2);
            assert_eq!(
                issue,
                FormatIssue::InvalidToken {
                    token: "x".to_owned()
                }
            );
        }
        Err(other) => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(current, before, "failed load must not touch the grid");
}

#[test]
fn tokens_other_than_zero_or_one_are_rejected() {
    for token in ["2", "-1", "01", "true"] {
        let text = format!("0 {token}\n0 0\n");
        assert!(
            matches!(
                load(text.as_bytes(), size(2, 2)),
                Err(SnapshotError::Format {
                    issue: FormatIssue::InvalidToken { .. },
                    ..
                })
            ),
            "token {token} should be rejected",
        );
    }
}

#[test]
fn short_row_reports_cell_count() {
    let error = load(&b"0 0 0\n0 0\n"[..], size(3, 2)).expect_err("short row");
    assert!(matches!(
        error,
        SnapshotError::Format {
            line: 2,
            issue: FormatIssue::CellCount {
                expected: 3,
                found: 2
            },
        }
    ));
}

#[test]
fn snapshot_of_another_size_is_rejected() {
    let grid = Grid::new(size(4, 4));
    let text = encode(&grid);

    assert!(matches!(
        load(text.as_bytes(), size(5, 4)),
        Err(SnapshotError::Format {
            issue: FormatIssue::CellCount { .. },
            ..
        })
    ));
    assert!(matches!(
        load(text.as_bytes(), size(4, 5)),
        Err(SnapshotError::Format {
            issue: FormatIssue::RowCount { .. },
            ..
        })
    ));
}

#[test]
fn missing_file_surfaces_not_found() {
    let path = scratch_path("missing");
    let _ = std::fs::remove_file(&path);

    match load_from_path(&path, size(2, 2)) {
        Err(SnapshotError::Io(error)) => assert_eq!(error.kind(), io::ErrorKind::NotFound),
        other => panic!("expected not-found error, got {other:?}"),
    }
}

#[test]
fn unwritable_sink_surfaces_io_error() {
    let grid = Grid::new(size(2, 2));
    assert!(matches!(save(&grid, BrokenSink), Err(SnapshotError::Io(_))));
}

#[test]
fn file_round_trip_restores_identical_grid() {
    let path = scratch_path("round-trip");
    let grid = Grid::from_fn(size(40, 30), |cell| (cell.column() * 7 + cell.row()) % 5 == 0);

    save_to_path(&grid, &path).expect("save to temp file");
    let restored = load_from_path(&path, grid.size()).expect("load from temp file");
    std::fs::remove_file(&path).expect("cleanup");

    assert_eq!(restored, grid);
}

proptest! {
    #[test]
    fn load_of_save_reproduces_the_grid(
        width in 1_u32..16,
        height in 1_u32..16,
        alive in prop::collection::vec(any::<bool>(), 225),
    ) {
        let size = size(width, height);
        let grid = Grid::from_cells(size, alive[..size.cell_count()].to_vec())
            .expect("length matches");

        let mut bytes = Vec::new();
        save(&grid, &mut bytes).expect("in-memory save");
        let restored = load(bytes.as_slice(), size).expect("load saved bytes");

        prop_assert_eq!(restored, grid);
    }
}
