//! Maze grid data module.
//!
//! This module contains the [`Grid`] container shared by the generator and the solver, together
//! with the [`Cell`] states it stores and the [`Position`] coordinates used to address it.

use color_eyre::eyre::{ensure, eyre, OptionExt as _, Result};

/// Smallest side length that still leaves one carvable room inside the border.
pub(crate) const MIN_DIMENSION: usize = 3;

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cell {
    /// Solid cell that cannot be walked through.
    Wall,
    /// Open cell, either a room or a corridor.
    Path,
    /// Open cell that belongs to the path shown in an animation frame.
    SolutionMark,
}

/// Column and row coordinates of a grid cell.
///
/// The origin is the top-left corner, `x` grows to the right and `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Position {
    /// Column index.
    pub(crate) x: usize,
    /// Row index.
    pub(crate) y: usize,
}

impl Position {
    /// Builds a position from a column and a row.
    pub(crate) const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Moves the position by a signed offset.
    ///
    /// Returns [`None`] when either coordinate would become negative or overflow, which lets the
    /// direction arithmetic of both algorithms skip impossible neighbors before any bounds test.
    pub(crate) const fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        let Some(x) = self.x.checked_add_signed(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add_signed(dy) else {
            return None;
        };

        Some(Self { x, y })
    }
}

/// Rectangular container of cell states.
///
/// The grid is created fully walled, carved in place by the generator and afterwards only read.
/// Both dimensions are odd and at least [`MIN_DIMENSION`], so rooms sit on odd coordinates and the
/// border rows and columns stay walled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Cell states in row-major order.
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid of the given size with every cell set to [`Cell::Wall`].
    ///
    /// # Errors
    ///
    /// This function returns an error if either dimension is even or smaller than
    /// [`MIN_DIMENSION`], or if the cell count does not fit in memory addressing.
    pub(crate) fn new(width: usize, height: usize) -> Result<Self> {
        ensure!(
            width >= MIN_DIMENSION && height >= MIN_DIMENSION,
            "maze dimensions must be at least {MIN_DIMENSION}x{MIN_DIMENSION}, got {width}x{height}"
        );
        ensure!(
            width % 2 == 1 && height % 2 == 1,
            "maze dimensions must be odd, got {width}x{height}"
        );

        let len = width
            .checked_mul(height)
            .ok_or_eyre("maze dimensions overflow the cell count")?;

        Ok(Self {
            width,
            height,
            cells: vec![Cell::Wall; len],
        })
    }

    /// Number of columns.
    pub(crate) const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    /// Fixed entrance in the top-left room.
    pub(crate) const fn entrance(&self) -> Position {
        Position::new(1, 1)
    }

    /// Fixed exit in the bottom-right room.
    pub(crate) const fn exit(&self) -> Position {
        Position::new(self.width - 2, self.height - 2)
    }

    /// Whether the position lies inside the grid.
    pub(crate) const fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Whether the position lies strictly inside the walled border.
    pub(crate) const fn is_interior(&self, pos: Position) -> bool {
        pos.x > 0 && pos.y > 0 && pos.x < self.width - 1 && pos.y < self.height - 1
    }

    /// Row-major index of a position, or [`None`] when out of bounds.
    pub(crate) const fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    /// Reads a cell, returning [`None`] for out-of-bounds positions.
    pub(crate) fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos)
            .and_then(|idx| self.cells.get(idx))
            .copied()
    }

    /// Writes a cell.
    ///
    /// # Errors
    ///
    /// This function returns an error if the position lies outside the grid.
    pub(crate) fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let slot = self
            .index(pos)
            .and_then(|idx| self.cells.get_mut(idx))
            .ok_or_else(|| {
                eyre!(
                    "position ({}, {}) is outside the {}x{} grid",
                    pos.x,
                    pos.y,
                    self.width,
                    self.height
                )
            })?;
        *slot = cell;

        Ok(())
    }

    /// Whether the position holds an open cell.
    pub(crate) fn is_open(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Cell::Path | Cell::SolutionMark))
    }

    /// Iterates over the rows of the grid, top to bottom.
    pub(crate) fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }
}
