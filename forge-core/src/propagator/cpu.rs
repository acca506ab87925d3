use crate::propagator::{ConstraintPropagator, PropagationError};
use crate::topology::Topology;
use crate::wave::PossibilityGrid;
use bitvec::prelude::*;
use forge_rules::AdjacencyIndex;
use std::collections::VecDeque;

/// Breadth-first arc-consistency propagator.
///
/// Cells pinned to the void id are never narrowed: they stand for the floor
/// and are only a source of constraints.
#[derive(Debug, Clone, Default)]
pub struct CpuConstraintPropagator;

impl CpuConstraintPropagator {
    /// Creates a propagator with an empty work queue.
    pub const fn new() -> Self {
        Self
    }
}

fn is_void_pinned(domain: &BitSlice, void: usize) -> bool {
    domain.count_ones() == 1 && domain.get(void).map_or(false, |bit| *bit)
}

impl ConstraintPropagator for CpuConstraintPropagator {
    fn propagate(
        &mut self,
        grid: &mut PossibilityGrid,
        updated: Vec<usize>,
        rules: &AdjacencyIndex,
        topology: &Topology,
    ) -> Result<Vec<usize>, PropagationError> {
        if grid.dimensions() != (topology.width, topology.height, topology.depth) {
            return Err(PropagationError::InternalError(format!(
                "grid {:?} does not match topology {}x{}x{}",
                grid.dimensions(),
                topology.width,
                topology.height,
                topology.depth
            )));
        }

        let void = rules.void_id().0;
        let cell_count = grid.len();
        let mut queued = bitvec![0; cell_count];
        let mut narrowed = bitvec![0; cell_count];
        let mut changed = Vec::new();
        let mut queue = VecDeque::with_capacity(updated.len());
        for index in updated {
            if index < cell_count && !queued[index] {
                queued.set(index, true);
                queue.push_back(index);
            }
        }

        while let Some(cell) = queue.pop_front() {
            queued.set(cell, false);

            for &direction in topology.directions() {
                let Some(neighbor) = topology.neighbor(cell, direction) else {
                    continue;
                };
                let cells = grid.as_mut_slice();
                if is_void_pinned(&cells[neighbor], void) {
                    continue;
                }

                let supported = rules.supported_by(&cells[cell], direction);
                let domain = &mut cells[neighbor];
                let before = domain.count_ones();
                *domain &= supported.as_bitslice();
                let after = domain.count_ones();

                if after == 0 {
                    let (x, y, z) = topology.coords(neighbor);
                    return Err(PropagationError::Contradiction(x, y, z));
                }
                if after < before {
                    if !narrowed[neighbor] {
                        narrowed.set(neighbor, true);
                        changed.push(neighbor);
                    }
                    if !queued[neighbor] {
                        queued.set(neighbor, true);
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_rules::{Dimensionality, Direction, Grid, PatternId};

    // 0 may only sit left of 1 and 1 only left of 0; everything stacks on itself.
    fn alternating_rules() -> AdjacencyIndex {
        let mut rules = AdjacencyIndex::new(2);
        rules.allow(PatternId(0), PatternId(1), Direction::Right);
        rules.allow(PatternId(1), PatternId(0), Direction::Right);
        for id in 0..2 {
            rules.allow(PatternId(id), PatternId(id), Direction::Down);
        }
        rules
    }

    #[test]
    fn test_collapse_forces_alternation() {
        let rules = alternating_rules();
        let topology = Topology::new((4, 1, 1), Dimensionality::Two);
        let mut grid = Grid::filled(4, 1, 1, bitvec![1, 1, 0]);
        grid.as_mut_slice()[0] = bitvec![1, 0, 0];

        let mut propagator = CpuConstraintPropagator::new();
        let changed = propagator
            .propagate(&mut grid, vec![0], &rules, &topology)
            .unwrap();

        assert_eq!(changed, vec![1, 2, 3]);
        assert_eq!(grid.as_slice()[1], bitvec![0, 1, 0]);
        assert_eq!(grid.as_slice()[2], bitvec![1, 0, 0]);
        assert_eq!(grid.as_slice()[3], bitvec![0, 1, 0]);
    }

    #[test]
    fn test_contradiction_reports_coordinates() {
        let rules = alternating_rules();
        let topology = Topology::new((3, 1, 1), Dimensionality::Two);
        let mut grid = Grid::filled(3, 1, 1, bitvec![1, 1, 0]);
        grid.as_mut_slice()[0] = bitvec![1, 0, 0];
        grid.as_mut_slice()[2] = bitvec![0, 1, 0];

        // 0 forces 1 into the middle, which cannot sit left of 1.
        let mut propagator = CpuConstraintPropagator::new();
        let result = propagator.propagate(&mut grid, vec![0, 2], &rules, &topology);
        assert_eq!(result, Err(PropagationError::Contradiction(1, 0, 0)));
    }

    #[test]
    fn test_void_pinned_cells_are_not_narrowed() {
        let rules = alternating_rules();
        let topology = Topology::new((2, 1, 1), Dimensionality::Two);
        let mut grid = Grid::filled(2, 1, 1, bitvec![1, 0, 0]);
        grid.as_mut_slice()[1] = bitvec![0, 0, 1];

        let mut propagator = CpuConstraintPropagator::new();
        let changed = propagator
            .propagate(&mut grid, vec![0], &rules, &topology)
            .unwrap();
        assert!(changed.is_empty());
        assert_eq!(grid.as_slice()[1], bitvec![0, 0, 1]);
    }

    #[test]
    fn test_domains_only_shrink() {
        let rules = alternating_rules();
        let topology = Topology::new((3, 2, 1), Dimensionality::Two);
        let mut grid = Grid::filled(3, 2, 1, bitvec![1, 1, 0]);
        let before = grid.clone();
        grid.as_mut_slice()[4] = bitvec![0, 1, 0];

        let mut propagator = CpuConstraintPropagator::new();
        propagator
            .propagate(&mut grid, vec![4], &rules, &topology)
            .unwrap();
        for (after, original) in grid.iter().zip(before.iter()) {
            assert!(after.count_ones() <= original.count_ones());
            for id in after.iter_ones() {
                assert!(original[id], "candidate {id} appeared during propagation");
            }
        }
    }

    #[test]
    fn test_mismatched_topology_is_internal_error() {
        let rules = alternating_rules();
        let topology = Topology::new((5, 1, 1), Dimensionality::Two);
        let mut grid = Grid::filled(3, 1, 1, bitvec![1, 1, 0]);
        let mut propagator = CpuConstraintPropagator::new();
        assert!(matches!(
            propagator.propagate(&mut grid, vec![0], &rules, &topology),
            Err(PropagationError::InternalError(_))
        ));
    }
}
