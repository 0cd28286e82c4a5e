//! Loading, validation and saving of maze text files.
//!
//! A maze file holds one line per grid row: `#` for walls and a space for open cells. The frame
//! markers `*`, `E` and `S` are read back as open cells, so a printed frame can be loaded again.

use std::{fs, path::Path};

use color_eyre::eyre::{bail, ensure, OptionExt as _, Result, WrapErr as _};
use log::info;

use crate::grid::{Cell, Grid, Position, MIN_DIMENSION};

/// Reads and validates a maze file.
///
/// # Errors
///
/// This function returns an error if the file cannot be read or its contents are not a valid maze
/// (see [`parse`]).
pub(crate) fn load(path: &Path) -> Result<Grid> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read maze file {}", path.display()))?;
    let grid = parse(&contents)
        .wrap_err_with(|| format!("invalid maze file {}", path.display()))?;

    info!(
        "loaded {}x{} maze from {}",
        grid.width(),
        grid.height(),
        path.display()
    );

    Ok(grid)
}

/// Writes the maze as walls and spaces, without any markers.
///
/// # Errors
///
/// This function returns an error if the file cannot be written.
pub(crate) fn save(grid: &Grid, path: &Path) -> Result<()> {
    let mut contents = String::new();
    for row in grid.rows() {
        contents.extend(row.iter().map(|cell| match cell {
            Cell::Wall => '#',
            Cell::Path | Cell::SolutionMark => ' ',
        }));
        contents.push('\n');
    }

    fs::write(path, contents)
        .wrap_err_with(|| format!("failed to write maze file {}", path.display()))?;
    info!("saved maze to {}", path.display());

    Ok(())
}

/// Parses and validates the text form of a maze.
///
/// This function checks that the maze:
/// - Has at least three rows and three columns
/// - Has rows of equal length and odd dimensions
/// - Contains only walls, open cells and frame markers
/// - Is completely surrounded by walls
///
/// Trailing blank lines are ignored.
///
/// # Errors
///
/// This function returns an error describing the first rule the input breaks.
pub(crate) fn parse(input: &str) -> Result<Grid> {
    let lines: Vec<&str> = input.trim_end_matches(['\n', '\r']).lines().collect();

    ensure!(
        lines.len() >= MIN_DIMENSION,
        "maze needs at least {MIN_DIMENSION} rows, found {}",
        lines.len()
    );

    let width = lines
        .first()
        .ok_or_eyre("failed to retrieve first row of maze")?
        .len();
    ensure!(
        width >= MIN_DIMENSION,
        "maze needs at least {MIN_DIMENSION} columns, found {width}"
    );

    let mut grid = Grid::new(width, lines.len())?;
    let last_row = lines.len() - 1;
    let last_col = width - 1;

    for (y, line) in lines.iter().enumerate() {
        ensure!(
            line.len() == width,
            "row {y} has {} columns, expected {width}",
            line.len()
        );

        for (x, byte) in line.bytes().enumerate() {
            let is_edge = y == 0 || y == last_row || x == 0 || x == last_col;

            match byte {
                b'#' => {}
                b' ' | b'*' | b'E' | b'S' if !is_edge => {
                    grid.set(Position::new(x, y), Cell::Path)?;
                }
                b' ' | b'*' | b'E' | b'S' => {
                    bail!("border cell ({x}, {y}) must be a wall");
                }
                other => {
                    bail!(
                        "unexpected character {:?} at ({x}, {y})",
                        char::from(other)
                    );
                }
            }
        }
    }

    Ok(grid)
}
