use crate::direction::Direction;
use crate::grid::Symbol;
use crate::library::{LatticePosition, PatternLibrary};
use crate::pattern::PatternId;
use bitvec::prelude::*;
use log::debug;
use rayon::prelude::*;
use std::fmt::Debug;

/// For every `(pattern, direction)` pair, the set of patterns allowed in the
/// neighboring cell in that direction.
///
/// Rows and bit columns span `num_patterns + 1` ids: the extra id is the
/// void id standing for the floor. Every insertion also inserts its mirror,
/// so `b ∈ allowed(a, d)` exactly when `a ∈ allowed(b, d.opposite())`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyIndex {
    num_patterns: usize,
    allowed: Vec<[BitVec; Direction::COUNT]>,
}

impl AdjacencyIndex {
    /// Creates an index with nothing allowed.
    pub fn new(num_patterns: usize) -> Self {
        let width = num_patterns + 1;
        let row: [BitVec; Direction::COUNT] = std::array::from_fn(|_| bitvec![0; width]);
        Self {
            num_patterns,
            allowed: vec![row; width],
        }
    }

    /// Number of real patterns.
    pub const fn num_patterns(&self) -> usize {
        self.num_patterns
    }

    /// Id standing for "outside the lattice"; one past the last pattern.
    pub const fn void_id(&self) -> PatternId {
        PatternId(self.num_patterns)
    }

    /// Bit width of a candidate set: every real pattern plus the void id.
    pub const fn domain_width(&self) -> usize {
        self.num_patterns + 1
    }

    /// Allows `b` next to `a` in `direction`, and `a` next to `b` in the
    /// opposite direction.
    ///
    /// Panics if either id is past the void id.
    pub fn allow(&mut self, a: PatternId, b: PatternId, direction: Direction) {
        self.allowed[a.0][direction.index()].set(b.0, true);
        self.allowed[b.0][direction.opposite().index()].set(a.0, true);
    }

    /// Whether `b` may occupy the neighbor of `a` in `direction`.
    pub fn check(&self, a: PatternId, b: PatternId, direction: Direction) -> bool {
        self.allowed
            .get(a.0)
            .and_then(|row| row[direction.index()].get(b.0).map(|bit| *bit))
            .unwrap_or(false)
    }

    /// Patterns allowed next to `id` in `direction`.
    ///
    /// Panics if `id` is past the void id.
    pub fn compatible_neighbors(&self, id: PatternId, direction: Direction) -> &BitSlice {
        &self.allowed[id.0][direction.index()]
    }

    /// Union of the allowed sets of every candidate: what a neighbor in
    /// `direction` may still hold.
    pub fn supported_by(&self, candidates: &BitSlice, direction: Direction) -> BitVec {
        let mut supported = bitvec![0; self.domain_width()];
        for id in candidates.iter_ones() {
            if let Some(row) = self.allowed.get(id) {
                supported |= row[direction.index()].as_bitslice();
            }
        }
        supported
    }

    /// Checks the mirror invariant over the whole table.
    pub fn is_symmetric(&self) -> bool {
        self.allowed.iter().enumerate().all(|(a, row)| {
            Direction::ALL.iter().all(|&direction| {
                row[direction.index()].iter_ones().all(|b| {
                    self.check(PatternId(b), PatternId(a), direction.opposite())
                })
            })
        })
    }

    /// Total number of allowed `(a, b, direction)` triples.
    pub fn allowed_count(&self) -> usize {
        self.allowed
            .iter()
            .flat_map(|row| row.iter())
            .map(|bits| bits.count_ones())
            .sum()
    }
}

/// A way of deriving an `AdjacencyIndex` from a pattern library.
pub trait AdjacencyStrategy: Send + Sync + Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Builds the compatibility table for `library`.
    fn derive(&self, library: &PatternLibrary) -> AdjacencyIndex;
}

/// Two patterns may touch when their facing edges are identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeMatching;

impl AdjacencyStrategy for EdgeMatching {
    fn name(&self) -> &'static str {
        "edge-matching"
    }

    fn derive(&self, library: &PatternLibrary) -> AdjacencyIndex {
        let directions = library.dimensionality().directions();
        let edges: Vec<[Vec<Symbol>; Direction::COUNT]> = library
            .patterns()
            .par_iter()
            .map(|pattern| Direction::ALL.map(|direction| pattern.edge(direction)))
            .collect();

        let count = edges.len();
        let matches: Vec<(usize, usize, Direction)> = (0..count)
            .into_par_iter()
            .flat_map_iter(|a| {
                let edges = &edges;
                (0..count).flat_map(move |b| {
                    directions
                        .iter()
                        .filter(move |direction| {
                            edges[a][direction.index()] == edges[b][direction.opposite().index()]
                        })
                        .map(move |&direction| (a, b, direction))
                })
            })
            .collect();

        let mut index = AdjacencyIndex::new(count);
        for (a, b, direction) in matches {
            index.allow(PatternId(a), PatternId(b), direction);
        }
        debug!(
            "{}: {} allowed pairs over {count} patterns",
            self.name(),
            index.allowed_count()
        );
        index
    }
}

/// Two patterns may touch when they were sampled next to each other in the
/// exemplar. Positions without a sampled neighbor are compatible with void.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionDerived;

impl AdjacencyStrategy for PositionDerived {
    fn name(&self) -> &'static str {
        "position-derived"
    }

    fn derive(&self, library: &PatternLibrary) -> AdjacencyIndex {
        let mut index = AdjacencyIndex::new(library.len());
        let void = index.void_id();
        let directions = library.dimensionality().directions();

        for positions in library.patterns_by_position() {
            for (&position, &id) in positions {
                for &direction in directions {
                    let neighbor = step(position, direction).and_then(|next| positions.get(&next));
                    match neighbor {
                        Some(&other) => index.allow(id, other, direction),
                        None => index.allow(id, void, direction),
                    }
                }
            }
        }

        debug!(
            "{}: {} allowed pairs over {} patterns",
            self.name(),
            index.allowed_count(),
            library.len()
        );
        index
    }
}

fn step(position: LatticePosition, direction: Direction) -> Option<LatticePosition> {
    let (dx, dy, dz) = direction.offset();
    Some((
        position.0.checked_add_signed(dx)?,
        position.1.checked_add_signed(dy)?,
        position.2.checked_add_signed(dz)?,
    ))
}
