//! Maze generation module.
//!
//! This module carves a perfect maze into a [`Grid`] with a randomized, iterative depth-first
//! search. The only source of randomness is the [`Permutation`] that orders the four carving
//! directions on every visit, which keeps generation reproducible under a fixed seed.

use color_eyre::eyre::{OptionExt as _, Result};
use log::{debug, info, trace};
use rand::{rngs::StdRng, seq::SliceRandom as _, SeedableRng as _};

use crate::grid::{Cell, Grid};

/// Two-cell carving offsets: down, right, up and left.
///
/// Skipping one grid line lets the cell in between act as the corridor joining two rooms.
const CARVE_STEPS: [(isize, isize); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];

/// Provider of the direction order used for every visited room.
pub(crate) trait Permutation {
    /// Reorders the four carving steps in place.
    fn permute(&mut self, steps: &mut [(isize, isize); 4]);
}

/// Uniform random permutation backed by a standard RNG.
///
/// The shuffle is the Fisher-Yates implementation from [`SliceRandom`](rand::seq::SliceRandom).
#[derive(Debug)]
pub(crate) struct RandomPermutation {
    /// Generator driving the shuffle.
    rng: StdRng,
}

impl RandomPermutation {
    /// Seeds the generator from operating system entropy.
    pub(crate) fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeds the generator with a fixed value so the same maze can be carved again.
    pub(crate) fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Permutation for RandomPermutation {
    fn permute(&mut self, steps: &mut [(isize, isize); 4]) {
        steps.shuffle(&mut self.rng);
    }
}

/// Carves a perfect maze of the given dimensions.
///
/// Generation starts from the entrance room and keeps an explicit stack of rooms still to visit.
/// A room may be pushed more than once before it is popped; the wall check on each neighbor acts
/// as the visited test, so stale entries are skipped naturally and every room is carved exactly
/// once. The result is a spanning tree over all interior rooms.
///
/// # Errors
///
/// This function returns an error if the dimensions are rejected by [`Grid::new`] or if a carve
/// step would leave the grid.
pub(crate) fn generate<P: Permutation>(
    width: usize,
    height: usize,
    permutation: &mut P,
) -> Result<Grid> {
    let mut grid = Grid::new(width, height)?;
    let entrance = grid.entrance();

    grid.set(entrance, Cell::Path)?;
    let mut stack = vec![entrance];
    let mut carved = 1_usize;
    let mut pops = 0_usize;

    while let Some(current) = stack.pop() {
        pops += 1;

        let mut steps = CARVE_STEPS;
        permutation.permute(&mut steps);

        for (dx, dy) in steps {
            let Some(next) = current.offset(dx, dy) else {
                continue;
            };

            if !grid.is_interior(next) || grid.get(next) != Some(Cell::Wall) {
                continue;
            }

            let corridor = current
                .offset(dx / 2, dy / 2)
                .ok_or_eyre("corridor between two rooms left the grid")?;

            grid.set(next, Cell::Path)?;
            grid.set(corridor, Cell::Path)?;
            stack.push(next);
            carved += 1;

            trace!("carved room ({}, {}) from ({}, {})", next.x, next.y, current.x, current.y);
        }
    }

    debug!("carving finished after {pops} stack pops");
    info!("generated {width}x{height} maze with {carved} rooms");

    Ok(grid)
}
