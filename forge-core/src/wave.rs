use bitvec::prelude::*;
use forge_rules::Grid;

/// Candidate pattern ids per cell.
pub type PossibilityGrid = Grid<BitVec>;

/// Cached Shannon entropy per cell.
pub type EntropyGrid = Grid<f64>;

/// Per-cell candidate sets plus the parallel entropy cache.
///
/// Between restarts, candidate sets only ever shrink. A snapshot is a plain
/// clone.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    possibilities: PossibilityGrid,
    entropies: EntropyGrid,
}

impl Wave {
    /// Creates a wave where every cell holds `initial`.
    pub fn new((width, height, depth): (usize, usize, usize), initial: &BitVec) -> Self {
        Self {
            possibilities: Grid::filled(width, height, depth, initial.clone()),
            entropies: Grid::filled(width, height, depth, 0.0),
        }
    }

    /// Candidate bitsets per cell.
    pub const fn possibilities(&self) -> &PossibilityGrid {
        &self.possibilities
    }

    /// Mutable candidate bitsets.
    pub fn possibilities_mut(&mut self) -> &mut PossibilityGrid {
        &mut self.possibilities
    }

    /// Cached entropy per cell, `0.0` once collapsed.
    pub const fn entropies(&self) -> &EntropyGrid {
        &self.entropies
    }

    /// Mutable entropy cache.
    pub fn entropies_mut(&mut self) -> &mut EntropyGrid {
        &mut self.entropies
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.possibilities.len()
    }

    /// True for a wave without cells.
    pub fn is_empty(&self) -> bool {
        self.possibilities.is_empty()
    }

    /// Candidate set of the cell at `index`, if it exists.
    pub fn domain(&self, index: usize) -> Option<&BitSlice> {
        self.possibilities
            .as_slice()
            .get(index)
            .map(BitVec::as_bitslice)
    }

    /// Narrows the cell at `index` to the single candidate `id`.
    pub fn pin(&mut self, index: usize, id: usize) {
        if let Some(domain) = self.possibilities.as_mut_slice().get_mut(index) {
            domain.fill(false);
            domain.set(id, true);
        }
        if let Some(entropy) = self.entropies.as_mut_slice().get_mut(index) {
            *entropy = 0.0;
        }
    }

    /// The only remaining candidate of the cell, if it is collapsed.
    pub fn singleton(&self, index: usize) -> Option<usize> {
        self.domain(index).and_then(singleton_of)
    }

    /// Cells down to a single candidate.
    pub fn collapsed_count(&self) -> usize {
        self.possibilities
            .iter()
            .filter(|domain| domain.count_ones() == 1)
            .count()
    }

    /// True when every cell holds a single candidate.
    pub fn is_fully_collapsed(&self) -> bool {
        self.possibilities
            .iter()
            .all(|domain| domain.count_ones() == 1)
    }

    /// The chosen pattern id of every cell, or `None` while any cell is
    /// still undecided.
    pub fn pattern_ids(&self) -> Option<Grid<usize>> {
        let ids: Option<Vec<usize>> = self
            .possibilities
            .iter()
            .map(|domain| singleton_of(domain))
            .collect();
        let (width, height, depth) = self.possibilities.dimensions();
        Grid::from_vec(width, height, depth, ids?)
    }
}

fn singleton_of(domain: &BitSlice) -> Option<usize> {
    if domain.count_ones() == 1 {
        domain.first_one()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_and_singleton() {
        let mut wave = Wave::new((2, 1, 1), &bitvec![1, 1, 1]);
        assert_eq!(wave.singleton(0), None);
        assert_eq!(wave.collapsed_count(), 0);

        wave.pin(0, 2);
        assert_eq!(wave.singleton(0), Some(2));
        assert_eq!(wave.domain(0).map(|d| d.count_ones()), Some(1));
        assert_eq!(wave.collapsed_count(), 1);
        assert!(!wave.is_fully_collapsed());
        assert!(wave.pattern_ids().is_none());

        wave.pin(1, 0);
        let ids = wave.pattern_ids().unwrap();
        assert_eq!(ids.as_slice(), &[2, 0]);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut wave = Wave::new((1, 1, 1), &bitvec![1, 1]);
        let snapshot = wave.clone();
        wave.pin(0, 1);
        assert_ne!(wave, snapshot);
        assert_eq!(snapshot.singleton(0), None);
    }
}
