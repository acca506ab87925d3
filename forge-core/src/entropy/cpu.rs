use crate::entropy::EntropyCalculator;
use crate::wave::EntropyGrid;
use crate::WfcRng;
use bitvec::prelude::BitSlice;
use float_ord::FloatOrd;
use rand::Rng;
use rayon::prelude::*;

/// Scale of the uniform noise added to break ties between equal cells.
pub const TIE_BREAK_NOISE: f64 = 2e-10;

/// CPU implementation of the EntropyCalculator trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuEntropyCalculator;

impl CpuEntropyCalculator {
    /// Creates the calculator.
    pub const fn new() -> Self {
        Self
    }
}

impl EntropyCalculator for CpuEntropyCalculator {
    // H = log2(Sum(w)) - Sum(w * log2(w)) / Sum(w), plus tie-break noise.
    fn cell_entropy(&self, candidates: &BitSlice, weights: &[f64], rng: &mut WfcRng) -> f64 {
        if candidates.count_ones() <= 1 {
            return 0.0;
        }

        let mut sum_of_weights = 0.0f64;
        let mut sum_of_weight_log_weight = 0.0f64;
        for id in candidates.iter_ones() {
            let weight = weights.get(id).copied().unwrap_or(0.0);
            if weight > 0.0 {
                sum_of_weights += weight;
                sum_of_weight_log_weight += weight * weight.log2();
            }
        }

        let noise = TIE_BREAK_NOISE * rng.gen::<f64>();
        if sum_of_weights <= 0.0 {
            return f64::MIN_POSITIVE + noise;
        }
        let entropy = sum_of_weights.log2() - sum_of_weight_log_weight / sum_of_weights;
        // Rounding can land a near-certain cell just below zero.
        (entropy + noise).max(f64::MIN_POSITIVE)
    }

    fn select_lowest_entropy_cell(&self, entropy_grid: &EntropyGrid) -> Option<usize> {
        entropy_grid
            .as_slice()
            .par_iter()
            .enumerate()
            .filter(|&(_, &entropy)| entropy > 0.0)
            .min_by_key(|&(index, &entropy)| (FloatOrd(entropy), index))
            .map(|(index, _)| index)
    }
}
