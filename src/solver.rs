//! Pathfinding and animation module.
//!
//! This module finds the shortest route from the maze entrance to its exit with a breadth-first
//! search and streams the search to a [`Renderer`] as it goes: one frame per discovered cell,
//! followed by a replay of the final path one cell at a time.

use std::{collections::VecDeque, thread, time::Duration};

use color_eyre::eyre::{OptionExt as _, Result};
use log::{debug, info, trace};

use crate::{
    frame::{Frame, Stage},
    grid::{Grid, Position},
    render::Renderer,
};

/// Animation frame delay in milliseconds.
///
/// This constant controls the pause after every emitted frame. A lower value results in faster
/// animation, while a higher value slows it down to make the search easier to follow.
pub(crate) const ANIMATION_FRAME_DELAY_MS: u64 = 200;

/// Unit offsets explored from every cell: down, right, up and left.
///
/// The order decides which of several equally short paths is found first, never its length.
const NEIGHBOR_STEPS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Final state of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The exit was reached; holds the path from the entrance to the exit, both included.
    Found(Vec<Position>),
    /// The queue ran dry before the exit was reached.
    Exhausted,
}

impl Outcome {
    /// Number of moves along the found path, or [`None`] when there is no path.
    pub(crate) fn steps(&self) -> Option<usize> {
        match self {
            Self::Found(path) => Some(path.len().saturating_sub(1)),
            Self::Exhausted => None,
        }
    }
}

/// Result of a search together with its statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SolveReport {
    /// Whether and how the exit was reached.
    pub(crate) outcome: Outcome,
    /// Number of frames handed to the renderer.
    pub(crate) frames: usize,
    /// Number of cells the search marked as visited.
    pub(crate) explored: usize,
}

/// Search bookkeeping: visited flags and the predecessor of every discovered cell.
///
/// Storing one predecessor per cell keeps memory linear in the grid size; any path, whether for a
/// discovery frame or for the final replay, is rebuilt by walking the predecessors back.
struct Trail<'grid> {
    /// Maze being searched.
    grid: &'grid Grid,
    /// Visited flag per cell, row-major.
    visited: Vec<bool>,
    /// Predecessor per cell, row-major. The entrance has none.
    parents: Vec<Option<Position>>,
}

impl<'grid> Trail<'grid> {
    /// Creates empty bookkeeping sized for the grid.
    fn new(grid: &'grid Grid) -> Self {
        let len = grid.width() * grid.height();
        Self {
            grid,
            visited: vec![false; len],
            parents: vec![None; len],
        }
    }

    /// Whether the position was already visited. Out-of-bounds positions count as visited.
    fn is_visited(&self, pos: Position) -> bool {
        self.grid
            .index(pos)
            .and_then(|idx| self.visited.get(idx))
            .copied()
            .unwrap_or(true)
    }

    /// Marks a position visited and records where it was reached from.
    fn visit(&mut self, pos: Position, parent: Option<Position>) -> Result<()> {
        let idx = self
            .grid
            .index(pos)
            .ok_or_eyre("visited position lies outside the grid")?;

        *self
            .visited
            .get_mut(idx)
            .ok_or_eyre("visited flags do not cover the grid")? = true;
        *self
            .parents
            .get_mut(idx)
            .ok_or_eyre("predecessors do not cover the grid")? = parent;

        Ok(())
    }

    /// Rebuilds the path from the entrance to `end`.
    fn path_to(&self, end: Position) -> Result<Vec<Position>> {
        let mut path = vec![end];
        let mut current = end;

        while let Some(parent) = self
            .grid
            .index(current)
            .and_then(|idx| self.parents.get(idx))
            .copied()
            .ok_or_eyre("path position lies outside the grid")?
        {
            path.push(parent);
            current = parent;
        }

        path.reverse();
        Ok(path)
    }
}

/// Hands a frame to the renderer, then holds for the animation delay.
fn emit<R: Renderer>(renderer: &mut R, frame: &Frame, delay: Duration) -> Result<()> {
    renderer.render(frame)?;
    if !delay.is_zero() {
        thread::sleep(delay);
    }

    Ok(())
}

/// Plays the final path back one cell at a time.
fn replay<R: Renderer>(
    grid: &Grid,
    path: &[Position],
    renderer: &mut R,
    delay: Duration,
) -> Result<usize> {
    let total = path.len();
    for step in 1..=total {
        let prefix = path
            .get(..step)
            .ok_or_eyre("replay step exceeds the path length")?;
        emit(
            renderer,
            &Frame::new(grid, prefix, Stage::Replaying { step, total })?,
            delay,
        )?;
    }

    Ok(total)
}

/// Solves the maze with a breadth-first search, animating every step.
///
/// Every newly discovered open cell produces a frame showing the path that reached it, which draws
/// the flood fill of the search. Once the exit is dequeued, the final path is replayed prefix by
/// prefix. The grid itself is only read; frames work on copies. Each frame is followed by a
/// blocking pause of `delay`.
///
/// A grid whose entrance is walled, or whose exit cannot be reached, yields
/// [`Outcome::Exhausted`] rather than an error.
///
/// # Errors
///
/// This function returns an error if the renderer fails.
pub(crate) fn solve<R: Renderer>(
    grid: &Grid,
    renderer: &mut R,
    delay: Duration,
) -> Result<SolveReport> {
    let entrance = grid.entrance();
    let exit = grid.exit();
    let mut trail = Trail::new(grid);
    let mut queue = VecDeque::new();
    let mut frames = 0_usize;
    let mut explored = 0_usize;

    if grid.is_open(entrance) {
        trail.visit(entrance, None)?;
        queue.push_back(entrance);
        explored += 1;
    } else {
        debug!("entrance ({}, {}) is walled", entrance.x, entrance.y);
    }

    while let Some(current) = queue.pop_front() {
        if current == exit {
            let path = trail.path_to(current)?;
            frames += replay(grid, &path, renderer, delay)?;

            info!(
                "solved maze in {} steps after exploring {explored} cells",
                path.len().saturating_sub(1)
            );
            return Ok(SolveReport {
                outcome: Outcome::Found(path),
                frames,
                explored,
            });
        }

        for (dx, dy) in NEIGHBOR_STEPS {
            let Some(next) = current.offset(dx, dy) else {
                continue;
            };

            if trail.is_visited(next) || !grid.is_open(next) {
                continue;
            }

            trail.visit(next, Some(current))?;
            queue.push_back(next);
            explored += 1;

            trace!("discovered ({}, {})", next.x, next.y);

            let path = trail.path_to(next)?;
            frames += 1;
            emit(
                renderer,
                &Frame::new(grid, &path, Stage::Exploring { step: frames })?,
                delay,
            )?;
        }
    }

    info!("no solution after exploring {explored} cells");

    Ok(SolveReport {
        outcome: Outcome::Exhausted,
        frames,
        explored,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::{
        generator::tests::seeded_maze,
        grid::Cell,
        render::tests::Recorder,
    };

    /// Builds a grid from rows of `#` and spaces.
    fn grid_from_rows(rows: &[&str]) -> Grid {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let mut grid = Grid::new(width, height).expect("test grid should have odd dimensions");

        for (y, row) in rows.iter().enumerate() {
            for (x, byte) in row.bytes().enumerate() {
                if byte == b' ' {
                    grid.set(Position::new(x, y), Cell::Path)
                        .expect("test grid rows should have equal lengths");
                }
            }
        }

        grid
    }

    /// Length in moves of the shortest simple path found by exhaustive search.
    fn brute_force_shortest(grid: &Grid) -> Option<usize> {
        fn walk(
            grid: &Grid,
            pos: Position,
            path: &mut Vec<Position>,
            best: &mut Option<usize>,
        ) {
            if pos == grid.exit() {
                let steps = path.len() - 1;
                *best = Some(best.map_or(steps, |current| current.min(steps)));
                return;
            }
            for (dx, dy) in NEIGHBOR_STEPS {
                let Some(next) = pos.offset(dx, dy) else {
                    continue;
                };
                if grid.is_open(next) && !path.contains(&next) {
                    path.push(next);
                    walk(grid, next, path, best);
                    let _ = path.pop();
                }
            }
        }

        let mut best = None;
        walk(grid, grid.entrance(), &mut vec![grid.entrance()], &mut best);
        best
    }

    fn solve_quietly(grid: &Grid) -> (SolveReport, Recorder) {
        let mut recorder = Recorder::default();
        let report = solve(grid, &mut recorder, Duration::ZERO).expect("solving should succeed");
        (report, recorder)
    }

    fn assert_valid_path(grid: &Grid, path: &[Position]) {
        assert_eq!(path.first(), Some(&grid.entrance()), "path should start at the entrance");
        assert_eq!(path.last(), Some(&grid.exit()), "path should end at the exit");
        assert!(
            path.iter().all(|pos| grid.is_open(*pos)),
            "path should only cross open cells"
        );
        for pair in path.windows(2) {
            if let [from, to] = pair {
                assert_eq!(
                    from.x.abs_diff(to.x) + from.y.abs_diff(to.y),
                    1,
                    "consecutive path cells should be adjacent"
                );
            }
        }
    }

    #[test]
    fn test_generated_mazes_are_always_solved() {
        for (width, height) in [(3, 3), (5, 5), (9, 7), (21, 21), (41, 11)] {
            for seed in 0..5 {
                let grid = seeded_maze(width, height, seed);
                let (report, _) = solve_quietly(&grid);

                let Outcome::Found(path) = report.outcome else {
                    panic!("generated {width}x{height} maze with seed {seed} should be solvable");
                };
                assert_valid_path(&grid, &path);
            }
        }
    }

    #[test]
    fn test_five_by_five_scenario() {
        for seed in 0..10 {
            let grid = seeded_maze(5, 5, seed);
            let (report, _) = solve_quietly(&grid);

            assert_eq!(
                report.outcome.steps(),
                Some(4),
                "every 5x5 perfect maze connects (1, 1) and (3, 3) in four moves"
            );
        }
    }

    #[test]
    fn test_path_is_shortest_on_looped_maze() {
        let grid = grid_from_rows(&[
            "#######",
            "#     #",
            "# # # #",
            "#   # #",
            "# ### #",
            "#     #",
            "#######",
        ]);
        let (report, _) = solve_quietly(&grid);

        assert_eq!(report.outcome.steps(), brute_force_shortest(&grid));
        assert_eq!(report.outcome.steps(), Some(8));
    }

    #[test]
    fn test_path_is_shortest_on_generated_mazes() {
        for seed in 0..6 {
            let grid = seeded_maze(7, 7, seed);
            let (report, _) = solve_quietly(&grid);

            assert_eq!(
                report.outcome.steps(),
                brute_force_shortest(&grid),
                "solver should match exhaustive search for seed {seed}"
            );
        }
    }

    #[test]
    fn test_solving_twice_gives_same_length() {
        let grid = seeded_maze(25, 19, 99);
        let (first, _) = solve_quietly(&grid);
        let (second, _) = solve_quietly(&grid);

        assert_eq!(first.outcome.steps(), second.outcome.steps());
        assert_eq!(first, second, "search without randomness should be repeatable");
    }

    #[test]
    fn test_frames_cover_discoveries_and_replay() {
        let grid = seeded_maze(11, 9, 3);
        let (report, recorder) = solve_quietly(&grid);
        let Outcome::Found(path) = &report.outcome else {
            panic!("generated maze should be solvable");
        };

        let exploring = recorder
            .frames
            .iter()
            .filter(|frame| matches!(frame.stage(), Stage::Exploring { .. }))
            .count();
        let replaying: Vec<&Frame> = recorder
            .frames
            .iter()
            .filter(|frame| matches!(frame.stage(), Stage::Replaying { .. }))
            .collect();

        assert_eq!(report.frames, recorder.frames.len());
        assert_eq!(replaying.len(), path.len(), "one replay frame per path cell");
        assert!(exploring > 0, "discoveries should be animated");
        assert!(
            exploring < report.explored,
            "every discovery except the entrance produces a frame"
        );
        assert!(
            recorder.frames.get(exploring).map(Frame::stage)
                == Some(Stage::Replaying {
                    step: 1,
                    total: path.len()
                }),
            "replay should start right after the exploration frames"
        );
        let last = replaying.last().expect("replay should have frames");
        assert_eq!(
            last.lines().concat().matches('*').count(),
            path.len().saturating_sub(2),
            "the last replay frame marks the whole path between the markers"
        );
    }

    #[test]
    fn test_solver_does_not_mutate_grid() {
        let grid = seeded_maze(15, 15, 8);
        let before = grid.clone();

        let _ = solve_quietly(&grid);

        assert_eq!(grid, before);
    }

    #[test]
    fn test_disconnected_maze_is_exhausted() {
        let grid = grid_from_rows(&["#######", "#   # #", "#######"]);
        let (report, recorder) = solve_quietly(&grid);

        assert_eq!(report.outcome, Outcome::Exhausted);
        assert_eq!(report.outcome.steps(), None);
        assert_eq!(report.explored, 3);
        assert_eq!(recorder.frames.len(), 2, "each discovery still produces a frame");
    }

    #[test]
    fn test_walled_entrance_is_exhausted() {
        let grid = grid_from_rows(&["#####", "##  #", "#####"]);
        let (report, recorder) = solve_quietly(&grid);

        assert_eq!(report.outcome, Outcome::Exhausted);
        assert_eq!(report.explored, 0);
        assert!(recorder.frames.is_empty(), "nothing should be animated");
    }

    #[test]
    fn test_every_frame_is_followed_by_the_delay() {
        let grid = grid_from_rows(&["#######", "#     #", "#######"]);
        let delay = Duration::from_millis(2);
        let mut recorder = Recorder::default();

        let started = Instant::now();
        let report = solve(&grid, &mut recorder, delay).expect("solving should succeed");
        let elapsed = started.elapsed();

        // Four discoveries along the corridor, then five replay frames
        assert_eq!(report.frames, 9);
        let frames = u32::try_from(report.frames).expect("frame count should fit in u32");
        assert!(
            elapsed >= delay * frames,
            "{frames} frames with a {delay:?} pause each took only {elapsed:?}"
        );
    }

    #[test]
    fn test_single_room_maze_is_found_immediately() {
        let grid = seeded_maze(3, 3, 0);
        let (report, recorder) = solve_quietly(&grid);

        assert_eq!(report.outcome, Outcome::Found(vec![Position::new(1, 1)]));
        assert_eq!(report.outcome.steps(), Some(0));
        assert_eq!(recorder.frames.len(), 1, "only the replay frame is emitted");
    }
}
