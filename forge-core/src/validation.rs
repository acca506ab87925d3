use crate::topology::Topology;
use forge_rules::{AdjacencyIndex, Grid, PatternId};
use rayon::prelude::*;

/// Counts ordered neighbor pairs of a solved wave that the adjacency index
/// does not allow. Pairs of floor cells (both void) are not counted.
///
/// Every disallowed contact is seen from both sides, so a single bad seam
/// counts twice.
pub fn count_violations(
    pattern_ids: &Grid<usize>,
    rules: &AdjacencyIndex,
    topology: &Topology,
) -> usize {
    let void = rules.void_id().0;
    let ids = pattern_ids.as_slice();

    (0..ids.len())
        .into_par_iter()
        .map(|cell| {
            let here = ids[cell];
            topology
                .directions()
                .iter()
                .filter(|&&direction| {
                    topology
                        .neighbor(cell, direction)
                        .and_then(|neighbor| ids.get(neighbor))
                        .map_or(false, |&there| {
                            !(here == void && there == void)
                                && !rules.check(PatternId(here), PatternId(there), direction)
                        })
                })
                .count()
        })
        .sum()
}
