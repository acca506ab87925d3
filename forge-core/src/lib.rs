//! Core solver for the voxel forge Wave Function Collapse implementation.
//! Holds the wave state and the collapse/propagate/backtrack loop that turns
//! a `forge_rules::Model` into a dense output grid.

use crate::propagator::PropagationError;
use rand::distributions::WeightedError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Entropy calculation logic and traits.
pub mod entropy;
/// Wave dimensions, forced boundary cells and output geometry per model kind.
pub mod layout;
/// Stitching chosen patterns into the output grid.
pub mod output;
/// Constraint propagation logic and traits.
pub mod propagator;
/// The core WFC algorithm runner.
pub mod runner;
/// Neighbor lookup on a finite wave.
pub mod topology;
/// Full-grid adjacency check of a solved wave.
pub mod validation;
/// Candidate sets and entropy cache.
pub mod wave;

/// Trait defining the interface for entropy calculation strategies.
pub use crate::entropy::{CpuEntropyCalculator, EntropyCalculator};
pub use crate::layout::WaveLayout;
pub use crate::output::OutputSynthesizer;
/// Trait defining the interface for constraint propagation.
pub use crate::propagator::{ConstraintPropagator, CpuConstraintPropagator};
/// The main functions to execute the Wave Function Collapse algorithm.
pub use crate::runner::{
    solve, solve_with, ProgressCallback, Solution, SolverConfig, SolverConfigBuilder,
    DEFAULT_MAXIMUM_TRIES,
};
pub use crate::topology::Topology;
pub use crate::validation::count_violations;
/// Grids specifically storing possibility bitsets and entropies.
pub use crate::wave::{EntropyGrid, PossibilityGrid, Wave};

/// Random generator driving every choice of a run.
pub type WfcRng = rand_chacha::ChaCha8Rng;

/// Errors that can occur during the Wave Function Collapse algorithm.
#[derive(Error, Debug)]
pub enum WfcError {
    /// The request cannot be solved as stated (zero extents, bad tries, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// An error occurred during the constraint propagation phase that is
    /// not a contradiction.
    #[error("Propagation error: {0}")]
    Propagation(#[from] PropagationError),
    /// Every restart ended in a contradiction.
    #[error("No solution found after {tries} tries")]
    NoSolutionFound {
        /// Restarts performed before giving up.
        tries: u32,
    },
    /// WFC run was interrupted by the external shutdown signal.
    #[error("WFC run interrupted by signal")]
    Interrupted,
    /// The solved grid failed the final adjacency check.
    #[error("Solved grid violates {0} adjacency constraints")]
    ConstraintViolation(usize),
    /// Error occurred during weighted random selection.
    #[error("Weighted selection error: {0}")]
    WeightedChoiceError(#[from] WeightedError),
    /// An unexpected internal error occurred.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Information about the current state of the WFC algorithm execution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressInfo {
    /// The total number of cells that have been collapsed.
    pub collapsed_cells: usize,
    /// The total number of cells in the wave.
    pub total_cells: usize,
    /// Time elapsed since the WFC run started.
    pub elapsed_time: Duration,
    /// The number of iterations completed so far.
    pub iterations: u64,
    /// Full re-initializations so far.
    pub restarts: u32,
    /// Snapshot rollbacks so far.
    pub rollbacks: u64,
}

/// Counters describing how a run went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveStats {
    /// Collapse attempts across all restarts.
    pub iterations: u64,
    /// Full re-initializations.
    pub restarts: u32,
    /// Snapshot rollbacks.
    pub rollbacks: u64,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}
