//! Command-line configuration.
//!
//! This module holds the [`Config`] parsed by `clap` and the caller-side correction that turns any
//! requested maze size into an odd dimension the generator accepts.

use std::{env, fs::File, path::PathBuf, time::Duration};

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr as _};
use env_logger::Target;
use log::LevelFilter;

use crate::{grid::MIN_DIMENSION, solver::ANIMATION_FRAME_DELAY_MS};

/// Generates a perfect maze and animates its shortest solution.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Number of columns; even values are increased by one and values below 3 become 3.
    #[arg(short = 'W', long, default_value_t = 21)]
    pub(crate) width: u16,
    /// Number of rows; even values are increased by one and values below 3 become 3.
    #[arg(short = 'H', long, default_value_t = 21)]
    pub(crate) height: u16,
    /// Seed for the carving order, for reproducible mazes.
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,
    /// Pause after every animation frame, in milliseconds.
    #[arg(short, long, default_value_t = ANIMATION_FRAME_DELAY_MS)]
    pub(crate) delay_ms: u64,
    /// Print frames as plain text instead of using the full-screen interface.
    #[arg(short, long)]
    pub(crate) plain: bool,
    /// Solve the maze stored in this file instead of generating one.
    #[arg(short, long, value_name = "PATH")]
    pub(crate) input: Option<PathBuf>,
    /// Save the maze to this file before solving it.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub(crate) save: Option<PathBuf>,
    /// Increase log verbosity; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
    /// File receiving the log while the full-screen interface is active.
    ///
    /// Defaults to `maze-runner.log` in the temporary directory. Plain mode logs to stderr.
    #[arg(long, value_name = "PATH")]
    pub(crate) log_file: Option<PathBuf>,
}

/// Log file name used in full-screen mode when none is given.
const DEFAULT_LOG_FILE: &str = "maze-runner.log";

/// A requested maze dimension and the value actually used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Dimension {
    /// Value given on the command line.
    pub(crate) requested: u16,
    /// Odd value of at least [`MIN_DIMENSION`] used for generation.
    pub(crate) actual: usize,
}

impl Dimension {
    /// Raises the requested value to the minimum, then rounds it up to the next odd number.
    pub(crate) fn coerce(requested: u16) -> Self {
        let value = usize::from(requested).max(MIN_DIMENSION);
        let actual = if value % 2 == 0 { value + 1 } else { value };

        Self { requested, actual }
    }

    /// Whether the value used differs from the one requested.
    pub(crate) fn is_adjusted(self) -> bool {
        usize::from(self.requested) != self.actual
    }

    /// Whether the requested value was below the smallest maze size.
    pub(crate) fn is_below_minimum(self) -> bool {
        usize::from(self.requested) < MIN_DIMENSION
    }
}

impl Config {
    /// Installs the global logger.
    ///
    /// The level starts at `warn` and every `-v` raises it one step; `RUST_LOG` takes precedence
    /// when set. The full-screen interface owns the terminal, so its log goes to [`Self::log_sink`]
    /// instead of stderr.
    ///
    /// # Errors
    ///
    /// This function returns an error if the log file cannot be created or a logger was already
    /// installed.
    pub fn init_logging(&self) -> Result<()> {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        let target = match self.log_sink() {
            Some(path) => Target::Pipe(Box::new(File::create(&path).wrap_err_with(|| {
                format!("failed to create log file {}", path.display())
            })?)),
            None => Target::Stderr,
        };

        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .target(target)
            .try_init()?;

        Ok(())
    }

    /// File the log is written to, or `None` when it goes to stderr.
    pub(crate) fn log_sink(&self) -> Option<PathBuf> {
        if self.plain {
            return None;
        }

        Some(
            self.log_file
                .clone()
                .unwrap_or_else(|| env::temp_dir().join(DEFAULT_LOG_FILE)),
        )
    }

    /// Column count to generate.
    pub(crate) fn width(&self) -> Dimension {
        Dimension::coerce(self.width)
    }

    /// Row count to generate.
    pub(crate) fn height(&self) -> Dimension {
        Dimension::coerce(self.height)
    }

    /// Pause after every animation frame.
    pub(crate) const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("maze-runner").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);

        assert_eq!(config.width().actual, 21);
        assert_eq!(config.height().actual, 21);
        assert_eq!(config.delay(), Duration::from_millis(200));
        assert_eq!(config.seed, None);
        assert!(!config.plain, "full-screen mode should be the default");
        assert_eq!(config.input, None);
        assert_eq!(config.verbose, 0);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_even_dimension_is_made_odd() {
        let config = parse(&["--width", "4", "--height", "5"]);

        assert_eq!(
            config.width(),
            Dimension {
                requested: 4,
                actual: 5
            }
        );
        assert!(config.width().is_adjusted(), "even width should be adjusted");
        assert!(!config.height().is_adjusted(), "odd height should be kept");
    }

    #[test]
    fn test_degenerate_dimensions_are_raised() {
        assert_eq!(Dimension::coerce(0).actual, 3);
        assert_eq!(Dimension::coerce(1).actual, 3);
        assert_eq!(Dimension::coerce(2).actual, 3);
        assert_eq!(Dimension::coerce(3).actual, 3);
        assert_eq!(Dimension::coerce(u16::MAX).actual, 65_535);
        assert_eq!(Dimension::coerce(65_534).actual, 65_535);
    }

    #[test]
    fn test_short_flags() {
        let config = parse(&[
            "-W", "8", "-H", "9", "-s", "7", "-d", "0", "-p", "-i", "maze.txt", "-o", "out.txt",
            "-vv",
        ]);

        assert_eq!(config.width().actual, 9);
        assert_eq!(config.height().actual, 9);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.delay(), Duration::ZERO);
        assert!(config.plain, "plain flag should be set");
        assert_eq!(config.input, Some(PathBuf::from("maze.txt")));
        assert_eq!(config.save, Some(PathBuf::from("out.txt")));
        assert_eq!(config.verbose, 2);
    }

    #[test]
    fn test_minimum_is_detected() {
        assert!(Dimension::coerce(1).is_below_minimum(), "1 is below the minimum");
        assert!(Dimension::coerce(2).is_below_minimum(), "2 is below the minimum");
        assert!(!Dimension::coerce(4).is_below_minimum(), "4 is only even");
    }

    #[test]
    fn test_full_screen_logs_to_file() {
        let config = parse(&["-v"]);

        assert_eq!(
            config.log_sink(),
            Some(env::temp_dir().join(DEFAULT_LOG_FILE)),
            "the terminal is busy, so the log needs a file"
        );
    }

    #[test]
    fn test_log_file_can_be_chosen() {
        let config = parse(&["--log-file", "run.log"]);

        assert_eq!(config.log_sink(), Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_plain_mode_logs_to_stderr() {
        let config = parse(&["--plain", "--log-file", "run.log", "-vvv"]);

        assert_eq!(config.log_sink(), None, "plain output leaves stderr free");
    }

    #[test]
    fn test_negative_dimension_is_rejected() {
        assert!(
            Config::try_parse_from(["maze-runner", "--width", "-3"]).is_err(),
            "negative sizes are not numbers clap accepts"
        );
    }
}
