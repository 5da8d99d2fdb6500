//! Solver traits and configuration.

use crate::geometry::{Boundary, Geometry};
use crate::result::SolveResult;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Common configuration for solvers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Evaluate independent branches on the rayon thread pool.
    pub parallel: bool,

    /// Maximum number of solutions kept after ranking (0 = all).
    pub max_solutions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_limit_ms: 0,
            parallel: true,
            max_solutions: 0,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Enables or disables parallel branch evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the maximum number of solutions kept.
    pub fn with_max_solutions(mut self, max: usize) -> Self {
        self.max_solutions = max;
        self
    }
}

/// Progress callback for long-running operations.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during solving.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Branches evaluated so far.
    pub branches_done: usize,
    /// Total number of enumerated branches.
    pub branches_total: usize,
    /// Non-empty solutions found so far.
    pub solutions_found: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the solver is still running.
    pub running: bool,
}

/// Trait for stacking solvers.
pub trait Solver {
    /// The item type this solver stacks.
    type Geometry: Geometry;
    /// The support type this solver stacks on.
    type Boundary: Boundary;
    /// The candidate type produced.
    type Solution;

    /// Solves the stacking problem.
    fn solve(
        &self,
        geometry: &Self::Geometry,
        boundary: &Self::Boundary,
    ) -> Result<SolveResult<Self::Solution>>;

    /// Solves with a progress callback.
    fn solve_with_progress(
        &self,
        geometry: &Self::Geometry,
        boundary: &Self::Boundary,
        callback: ProgressCallback,
    ) -> Result<SolveResult<Self::Solution>>;

    /// Cancels an ongoing solve operation.
    fn cancel(&self);
}
