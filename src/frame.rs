//! Animation frame module.
//!
//! A [`Frame`] is a read-only snapshot of the maze with a path marked on it, ready to be handed to
//! a [`Renderer`](crate::render::Renderer). Frames are derived from the solver's grid and never
//! write back into it.

use color_eyre::eyre::Result;

use crate::grid::{Cell, Grid, Position};

/// Point of the run a frame was taken at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stage {
    /// The freshly built maze, before solving starts.
    Generated,
    /// A cell discovered by the breadth-first search, counted from one.
    Exploring {
        /// Number of discoveries so far.
        step: usize,
    },
    /// One prefix of the final path during the solution replay.
    Replaying {
        /// Number of path cells marked in this frame.
        step: usize,
        /// Number of cells of the complete path.
        total: usize,
    },
}

impl Stage {
    /// Returns the caption shown above the frame.
    pub(crate) fn title(self) -> String {
        match self {
            Self::Generated => "Generated maze".to_owned(),
            Self::Exploring { step } => format!("Solving step by step ({step})"),
            Self::Replaying { step, total } => format!("Solution ({step}/{total})"),
        }
    }
}

/// Drawable state of one cell in a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Symbol {
    /// Wall cell.
    Wall,
    /// Open cell outside the marked path.
    Open,
    /// Open cell on the marked path.
    Mark,
    /// The maze entrance.
    Entrance,
    /// The maze exit.
    Exit,
}

impl Symbol {
    /// Character used by text renderers.
    pub(crate) const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Open => ' ',
            Self::Mark => '*',
            Self::Entrance => 'E',
            Self::Exit => 'S',
        }
    }
}

/// Snapshot of the maze with a path marked on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Frame {
    /// Copy of the maze with every path cell set to [`Cell::SolutionMark`].
    grid: Grid,
    /// Position drawn as [`Symbol::Entrance`].
    entrance: Position,
    /// Position drawn as [`Symbol::Exit`].
    exit: Position,
    /// Point of the run this frame was taken at.
    stage: Stage,
}

impl Frame {
    /// Copies the maze and marks every position of `path` on the copy.
    ///
    /// # Errors
    ///
    /// This function returns an error if a path position lies outside the maze.
    pub(crate) fn new(grid: &Grid, path: &[Position], stage: Stage) -> Result<Self> {
        let mut snapshot = grid.clone();
        for pos in path {
            snapshot.set(*pos, Cell::SolutionMark)?;
        }

        Ok(Self {
            entrance: grid.entrance(),
            exit: grid.exit(),
            grid: snapshot,
            stage,
        })
    }

    /// Point of the run this frame was taken at.
    pub(crate) const fn stage(&self) -> Stage {
        self.stage
    }

    /// Number of columns.
    pub(crate) const fn width(&self) -> usize {
        self.grid.width()
    }

    /// Number of rows.
    pub(crate) const fn height(&self) -> usize {
        self.grid.height()
    }

    /// Drawable symbol of every cell, row by row.
    ///
    /// The entrance and exit markers take precedence over the cell state underneath.
    pub(crate) fn symbols(&self) -> impl Iterator<Item = Vec<Symbol>> + '_ {
        self.grid.rows().enumerate().map(move |(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, cell)| {
                    let pos = Position::new(x, y);
                    if pos == self.entrance {
                        Symbol::Entrance
                    } else if pos == self.exit {
                        Symbol::Exit
                    } else {
                        match cell {
                            Cell::Wall => Symbol::Wall,
                            Cell::Path => Symbol::Open,
                            Cell::SolutionMark => Symbol::Mark,
                        }
                    }
                })
                .collect()
        })
    }

    /// Text form of the frame, one string per row.
    pub(crate) fn lines(&self) -> Vec<String> {
        self.symbols()
            .map(|row| row.into_iter().map(Symbol::glyph).collect())
            .collect()
    }
}
