use bitvec::prelude::*;
use forge_core::{CpuEntropyCalculator, EntropyCalculator, EntropyGrid, WfcRng};
use forge_rules::Grid;
use rand::SeedableRng;

#[test]
fn test_select_skips_collapsed_cells() {
    let calculator = CpuEntropyCalculator::new();
    let entropies: EntropyGrid = Grid::from_vec(4, 1, 1, vec![0.0, 1.5, 0.0, 0.7]).unwrap();
    assert_eq!(calculator.select_lowest_entropy_cell(&entropies), Some(3));
}

#[test]
fn test_select_none_when_all_collapsed() {
    let calculator = CpuEntropyCalculator::new();
    let entropies: EntropyGrid = Grid::filled(3, 3, 1, 0.0);
    assert_eq!(calculator.select_lowest_entropy_cell(&entropies), None);
}

#[test]
fn test_exact_ties_go_to_lowest_index() {
    let calculator = CpuEntropyCalculator::new();
    let entropies: EntropyGrid = Grid::from_vec(2, 2, 1, vec![0.9, 0.4, 0.4, 0.4]).unwrap();
    assert_eq!(calculator.select_lowest_entropy_cell(&entropies), Some(1));
}

#[test]
fn test_skewed_weights_lower_entropy() {
    let calculator = CpuEntropyCalculator::new();
    let mut rng = WfcRng::seed_from_u64(42);
    let both = bitvec![1, 1, 0];
    let even = calculator.cell_entropy(&both, &[0.5, 0.5], &mut rng);
    let skewed = calculator.cell_entropy(&both, &[0.9, 0.1], &mut rng);
    assert!(skewed < even);
    assert!(skewed > 0.0);
}

#[test]
fn test_grid_entropy_matches_cells() {
    let calculator = CpuEntropyCalculator::new();
    let mut rng = WfcRng::seed_from_u64(1);
    let grid = Grid::from_vec(
        3,
        1,
        1,
        vec![bitvec![1, 0, 0], bitvec![1, 1, 0], bitvec![1, 1, 0]],
    )
    .unwrap();
    let entropies = calculator.calculate_entropy(&grid, &[0.5, 0.5], &mut rng);

    assert_eq!(entropies.as_slice()[0], 0.0);
    for &entropy in &entropies.as_slice()[1..] {
        assert!((entropy - 1.0).abs() < 1e-6);
    }
    // Noise separates otherwise equal cells.
    assert_ne!(entropies.as_slice()[1], entropies.as_slice()[2]);
}
