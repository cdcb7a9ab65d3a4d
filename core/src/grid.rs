use crate::{CellCoord, GridSize};

/// Dense row-major buffer holding the alive/dead state of every cell.
///
/// The grid is a torus for neighbour counting only. Direct access through
/// [`Grid::get`], [`Grid::set`] and [`Grid::toggle`] never wraps: an
/// out-of-range coordinate is a contract violation and panics. Callers that
/// handle untrusted coordinates use [`Grid::cell`] or [`Grid::contains`]
/// first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: GridSize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates a grid of the provided size with every cell dead.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![false; size.cell_count()],
        }
    }

    /// Builds a grid by evaluating `alive` for every cell in row-major order.
    #[must_use]
    pub fn from_fn(size: GridSize, mut alive: impl FnMut(CellCoord) -> bool) -> Self {
        let mut cells = Vec::with_capacity(size.cell_count());
        for row in 0..size.height() {
            for column in 0..size.width() {
                cells.push(alive(CellCoord::new(column, row)));
            }
        }
        Self { size, cells }
    }

    /// Wraps an existing row-major buffer, returning `None` when its length
    /// differs from the cell count of `size`.
    #[must_use]
    pub fn from_cells(size: GridSize, cells: Vec<bool>) -> Option<Self> {
        (cells.len() == size.cell_count()).then_some(Self { size, cells })
    }

    /// Creates a grid with exactly the listed cells alive.
    ///
    /// # Panics
    ///
    /// Panics when any listed cell lies outside `size`, like [`Grid::set`].
    #[must_use]
    pub fn with_alive(size: GridSize, alive: &[CellCoord]) -> Self {
        let mut grid = Self::new(size);
        for &cell in alive {
            grid.set(cell, true);
        }
        grid
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width()
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height()
    }

    /// Reports whether the coordinate addresses a cell of this grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        self.size.contains(cell)
    }

    /// Returns the state of the cell, or `None` when out of range.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<bool> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Returns the state of the cell.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> bool {
        self.cells[self.expect_index(cell)]
    }

    /// Overwrites the state of a single cell.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the grid.
    pub fn set(&mut self, cell: CellCoord, alive: bool) {
        let index = self.expect_index(cell);
        self.cells[index] = alive;
    }

    /// Flips a single cell and returns its new state.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the grid.
    pub fn toggle(&mut self, cell: CellCoord) -> bool {
        let index = self.expect_index(cell);
        let alive = !self.cells[index];
        self.cells[index] = alive;
        alive
    }

    /// Counts the live cells among the eight neighbours of `cell`, wrapping
    /// both axes so opposite edges touch.
    ///
    /// On grids narrower than three cells a neighbour offset can land on the
    /// same cell more than once (or on `cell` itself); every offset is still
    /// counted, so the result stays within `0..=8`.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the grid.
    #[must_use]
    pub fn neighbor_count(&self, cell: CellCoord) -> u8 {
        let _ = self.expect_index(cell);
        let width = self.width() as usize;
        let height = self.height() as usize;
        let column = cell.column() as usize;
        let row = cell.row() as usize;

        // Offsets expressed as additions modulo the axis length: `len - 1` is -1.
        let columns = [(column + width - 1) % width, column, (column + 1) % width];
        let rows = [(row + height - 1) % height, row, (row + 1) % height];

        let mut count = 0;
        for (dy, &y) in rows.iter().enumerate() {
            for (dx, &x) in columns.iter().enumerate() {
                if dx == 1 && dy == 1 {
                    continue;
                }
                if self.cells[y * width + x] {
                    count += 1;
                }
            }
        }
        count
    }

    /// Number of live cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, bool)> + '_ {
        let width = self.width();
        self.cells.iter().enumerate().map(move |(index, &alive)| {
            let index = index as u64;
            let width = u64::from(width);
            let cell = CellCoord::new((index % width) as u32, (index / width) as u32);
            (cell, alive)
        })
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks_exact(self.width() as usize)
    }

    /// Raw row-major cell buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width()).ok()?;
        Some(row * width + column)
    }

    fn expect_index(&self, cell: CellCoord) -> usize {
        match self.index(cell) {
            Some(index) => index,
            None => panic!("cell {cell} lies outside the {} grid", self.size),
        }
    }
}
