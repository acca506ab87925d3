use crate::wave::{EntropyGrid, PossibilityGrid};
use crate::WfcRng;
use bitvec::prelude::BitSlice;
use std::fmt::Debug;

/// Shannon entropy on the CPU.
pub mod cpu;
pub use cpu::CpuEntropyCalculator;

/// Trait defining how cell uncertainty is measured and which cell is
/// collapsed next.
pub trait EntropyCalculator: Send + Sync + Debug {
    /// Entropy of a single candidate set given the pattern weights (indexed
    /// by pattern id; ids past the end weigh nothing).
    ///
    /// Collapsed and empty sets must return exactly `0.0`; any set with two
    /// or more candidates must return a strictly positive value.
    fn cell_entropy(&self, candidates: &BitSlice, weights: &[f64], rng: &mut WfcRng) -> f64;

    /// Entropy of every cell of `grid`, in storage order.
    fn calculate_entropy(
        &self,
        grid: &PossibilityGrid,
        weights: &[f64],
        rng: &mut WfcRng,
    ) -> EntropyGrid {
        grid.map(|candidates| self.cell_entropy(candidates, weights, rng))
    }

    /// Index of the cell with the smallest positive entropy, or `None` when
    /// every cell is collapsed. Exact ties go to the lowest index.
    fn select_lowest_entropy_cell(&self, entropy_grid: &EntropyGrid) -> Option<usize>;
}
