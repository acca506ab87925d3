use crate::topology::Topology;
use crate::wave::PossibilityGrid;
use forge_rules::AdjacencyIndex;
use std::fmt::Debug;
use thiserror::Error;

/// Breadth-first propagation on the CPU.
pub mod cpu;
pub use cpu::CpuConstraintPropagator;

/// Errors that can occur during the constraint propagation phase of WFC.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropagationError {
    /// Indicates that a cell's possibility set became empty during propagation,
    /// meaning no pattern can satisfy the constraints at this location.
    /// Contains the (x, y, z) coordinates of the contradictory cell.
    #[error("Contradiction detected during propagation at ({0}, {1}, {2})")]
    Contradiction(usize, usize, usize),
    /// An internal error within the propagation logic.
    #[error("Internal propagation error: {0}")]
    InternalError(String),
}

/// Trait defining the interface for a constraint propagation algorithm.
///
/// Implementors narrow the `PossibilityGrid` until every remaining candidate
/// is supported by some candidate of each neighbor, as defined by the
/// `AdjacencyIndex`.
pub trait ConstraintPropagator: Send + Sync + Debug {
    /// Propagates constraints starting from a list of initially updated cells.
    ///
    /// # Arguments
    ///
    /// * `grid` - A mutable reference to the possibility grid to update.
    /// * `updated` - Indices of the cells whose candidate sets just changed.
    /// * `rules` - The adjacency index defining compatibility between patterns.
    /// * `topology` - Shape of the grid and the directions to follow.
    ///
    /// # Returns
    ///
    /// * `Ok(changed)` with the indices of every cell narrowed by this pass.
    /// * `Err(PropagationError::Contradiction)` as soon as a cell runs out of
    ///   candidates; the grid is then left partially narrowed.
    fn propagate(
        &mut self,
        grid: &mut PossibilityGrid,
        updated: Vec<usize>,
        rules: &AdjacencyIndex,
        topology: &Topology,
    ) -> Result<Vec<usize>, PropagationError>;
}
