//! Core application flow: build the maze, animate its solution and report the timings.

use std::{
    fmt::{self, Display, Formatter},
    io,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result;
use log::{debug, info};

use crate::{
    config::{Config, Dimension},
    frame::{Frame, Stage},
    generator::{self, RandomPermutation},
    grid::{Grid, Position},
    maze_file,
    render::{Renderer, TerminalRenderer, TextRenderer},
    solver::{self, Outcome, SolveReport},
};

/// Where the solved maze came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Origin {
    /// Carved by the generator in the given time.
    Generated(Duration),
    /// Read from a maze file.
    Loaded(PathBuf),
}

/// Summary of a completed run, printed once the animation is over.
#[derive(Debug)]
pub struct Report {
    /// Requested dimensions that had to be changed, as (axis, dimension) pairs.
    pub(crate) adjustments: Vec<(&'static str, Dimension)>,
    /// Source of the maze.
    pub(crate) origin: Origin,
    /// Search outcome and statistics.
    pub(crate) solution: SolveReport,
    /// Time spent solving, animation pauses included.
    pub(crate) solving: Duration,
    /// Text of the last frame, kept for terminals whose screen is discarded on exit.
    pub(crate) picture: Option<Vec<String>>,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(picture) = &self.picture {
            for line in picture {
                writeln!(f, "{line}")?;
            }
        }

        for (axis, dimension) in &self.adjustments {
            if dimension.is_below_minimum() {
                writeln!(
                    f,
                    "{axis} raised from {} to the minimum of {}.",
                    dimension.requested, dimension.actual
                )?;
            } else {
                writeln!(
                    f,
                    "{axis} increased from {} to {} so that it is odd.",
                    dimension.requested, dimension.actual
                )?;
            }
        }

        match self.solution.outcome.steps() {
            Some(steps) => writeln!(
                f,
                "Solution found in {steps} steps after exploring {} cells.",
                self.solution.explored
            )?,
            None => writeln!(f, "No solution found.")?,
        }

        match &self.origin {
            Origin::Generated(elapsed) => writeln!(
                f,
                "Maze generation time: {:.6} seconds.",
                elapsed.as_secs_f64()
            )?,
            Origin::Loaded(path) => writeln!(f, "Maze loaded from {}.", path.display())?,
        }

        write!(
            f,
            "Maze solving time: {:.6} seconds.",
            self.solving.as_secs_f64()
        )
    }
}

/// Application state for a single run.
///
/// A run generates (or loads) one maze, shows it, animates the breadth-first solve to completion
/// and returns a [`Report`]. There is no interaction once the run starts.
#[derive(Debug)]
pub struct App {
    /// Parsed command-line configuration.
    config: Config,
}

impl App {
    /// Creates the application from its configuration.
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the whole program once with the renderer selected by the configuration.
    ///
    /// In full-screen mode the terminal is restored before returning, also when the run fails,
    /// and the report carries the last frame so it stays visible afterwards.
    ///
    /// # Errors
    ///
    /// This function returns an error if the maze cannot be built, loaded or saved, or if drawing
    /// a frame fails.
    pub fn run(&self) -> Result<Report> {
        if self.config.plain {
            let mut report = self.play(&mut TextRenderer::new(io::stdout().lock()))?;
            report.picture = None;
            return Ok(report);
        }

        let mut terminal = ratatui::init();
        let result = self.play(&mut TerminalRenderer::new(&mut terminal));
        ratatui::restore();

        result
    }

    /// Builds the maze, either by loading the input file or by carving a new one.
    fn build(&self) -> Result<(Grid, Origin, Vec<(&'static str, Dimension)>)> {
        if let Some(path) = &self.config.input {
            return Ok((maze_file::load(path)?, Origin::Loaded(path.clone()), Vec::new()));
        }

        let width = self.config.width();
        let height = self.config.height();
        let adjustments: Vec<_> = [("Width", width), ("Height", height)]
            .into_iter()
            .filter(|(_, dimension)| dimension.is_adjusted())
            .collect();
        for (axis, dimension) in &adjustments {
            info!(
                "{} adjusted from {} to {}",
                axis.to_lowercase(),
                dimension.requested,
                dimension.actual
            );
        }

        let mut permutation = match self.config.seed {
            Some(seed) => {
                info!("carving with seed {seed}");
                RandomPermutation::seeded(seed)
            }
            None => RandomPermutation::from_entropy(),
        };

        let started = Instant::now();
        let grid = generator::generate(width.actual, height.actual, &mut permutation)?;
        let origin = Origin::Generated(started.elapsed());

        Ok((grid, origin, adjustments))
    }

    /// Runs the build, display and solve phases against the given renderer.
    pub(crate) fn play<R: Renderer>(&self, renderer: &mut R) -> Result<Report> {
        let (grid, origin, adjustments) = self.build()?;

        if let Some(path) = &self.config.save {
            maze_file::save(&grid, path)?;
        }

        let delay = self.config.delay();
        renderer.render(&Frame::new(&grid, &[], Stage::Generated)?)?;
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        let started = Instant::now();
        let solution = solver::solve(&grid, renderer, delay)?;
        let solving = started.elapsed();
        debug!("rendered {} solving frames", solution.frames);

        let marked: &[Position] = match &solution.outcome {
            Outcome::Found(path) => path.as_slice(),
            Outcome::Exhausted => &[],
        };
        let picture = Frame::new(
            &grid,
            marked,
            Stage::Replaying {
                step: marked.len(),
                total: marked.len(),
            },
        )?
        .lines();

        Ok(Report {
            adjustments,
            origin,
            solution,
            solving,
            picture: Some(picture),
        })
    }
}
