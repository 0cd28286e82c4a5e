//! Perfect maze generation and animated breadth-first solving.
//!
//! The library carves a maze on an odd-sized grid with a randomized, iterative depth-first search,
//! then solves it with a breadth-first search that streams one frame per discovered cell and a
//! replay of the shortest path to a renderer.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
mod config;
mod frame;
mod generator;
mod grid;
mod maze_file;
mod render;
mod solver;

pub use app::{App, Report};
pub use config::Config;
