use crate::direction::Dimensionality;
use crate::grid::{Grid, Symbol, VOID_SYMBOL};
use crate::model::ModelOptions;
use crate::pattern::{Pattern, PatternId};
use crate::RuleError;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// Lattice coordinate `(i, j, k)` of a sampling position.
pub type LatticePosition = (usize, usize, usize);

/// Which pattern was sampled at each lattice position of one orientation.
pub type PositionMap = BTreeMap<LatticePosition, PatternId>;

/// Base count of the all-void pattern before any occurrence is recorded.
const EMPTY_PATTERN_SEED_COUNT: f64 = 1e-6;
/// Count the all-void pattern falls back to when padding accounts for all
/// of its occurrences.
const EMPTY_PATTERN_FALLBACK_COUNT: f64 = 0.01;

/// Deduplicates patterns by value while counting occurrences.
#[derive(Default)]
struct PatternCounter {
    ids: HashMap<Pattern, PatternId>,
    patterns: Vec<Pattern>,
    counts: Vec<f64>,
}

impl PatternCounter {
    fn seed(&mut self, pattern: Pattern, count: f64) -> PatternId {
        let id = PatternId(self.patterns.len());
        self.ids.insert(pattern.clone(), id);
        self.patterns.push(pattern);
        self.counts.push(count);
        id
    }

    fn record(&mut self, pattern: Pattern) -> PatternId {
        if let Some(&id) = self.ids.get(&pattern) {
            self.counts[id.0] += 1.0;
            id
        } else {
            self.seed(pattern, 1.0)
        }
    }
}

/// Ordered set of unique patterns with normalized weights.
///
/// Weights always sum to 1. For the 3D tiled model, `PatternId(0)` is the
/// all-void empty pattern.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    pattern_size: usize,
    dimensionality: Dimensionality,
    patterns: Vec<Pattern>,
    weights: Vec<f64>,
    patterns_by_position: Vec<PositionMap>,
    symbol_frequency: BTreeMap<Symbol, usize>,
    empty_pattern: Option<PatternId>,
}

impl PatternLibrary {
    /// Extracts every `size × size` block of a flat exemplar, one per cell,
    /// reading across the edges with wraparound.
    ///
    /// With `options.rotation` the three quarter turns of each block are
    /// recorded too; with `options.symmetry` its two mirror images.
    pub fn overlapping(
        exemplar: &Grid<Symbol>,
        size: usize,
        options: &ModelOptions,
    ) -> Result<Self, RuleError> {
        options.validate()?;
        if exemplar.is_empty() {
            return Err(RuleError::EmptyExemplar);
        }
        if !exemplar.is_flat() {
            return Err(RuleError::InvalidOption(format!(
                "overlapping model needs a single-layer exemplar, got depth {}",
                exemplar.depth
            )));
        }
        if size < 2 {
            return Err(RuleError::PatternSizeTooSmall { size, minimum: 2 });
        }
        let extent = exemplar.width.min(exemplar.height);
        if size > extent {
            return Err(RuleError::PatternSizeTooLarge { size, extent });
        }

        let mut counter = PatternCounter::default();
        let mut positions = PositionMap::new();
        for x in 0..exemplar.width {
            for y in 0..exemplar.height {
                let base = Pattern::from_fn(size, Dimensionality::Two, |px, py, _| {
                    exemplar
                        .get_wrapped(x + px, y + py, 0)
                        .copied()
                        .unwrap_or(VOID_SYMBOL)
                });

                positions.insert((x, y, 0), counter.record(base.clone()));
                if options.rotation {
                    let mut turned = base.rotated();
                    for _ in 0..3 {
                        let next = turned.rotated();
                        counter.record(turned);
                        turned = next;
                    }
                }
                if options.symmetry {
                    counter.record(base.reflected_y());
                    counter.record(base.reflected_x());
                }
            }
        }

        debug!(
            "Extracted {} unique {size}x{size} patterns from a {}x{} exemplar",
            counter.patterns.len(),
            exemplar.width,
            exemplar.height
        );

        Ok(Self {
            pattern_size: size,
            dimensionality: Dimensionality::Two,
            patterns: counter.patterns,
            weights: normalized(counter.counts),
            patterns_by_position: vec![positions],
            symbol_frequency: exemplar.symbol_frequency(),
            empty_pattern: None,
        })
    }

    /// Cuts a volume into non-overlapping `size³` blocks after padding it
    /// with void on every side except the ground (maximum y).
    ///
    /// With `options.rotation` the padded volume is also sampled in its
    /// three quarter turns around the y axis, each orientation getting its
    /// own position map.
    pub fn tiled(
        exemplar: &Grid<Symbol>,
        size: usize,
        options: &ModelOptions,
    ) -> Result<Self, RuleError> {
        options.validate()?;
        if exemplar.is_empty() {
            return Err(RuleError::EmptyExemplar);
        }
        if size == 0 {
            return Err(RuleError::PatternSizeTooSmall { size, minimum: 1 });
        }
        let extent = exemplar.width.min(exemplar.height).min(exemplar.depth);
        if size > extent {
            return Err(RuleError::PatternSizeTooLarge { size, extent });
        }
        if options.symmetry {
            warn!("Mirror symmetry is not supported by the tiled model and will be ignored");
        }

        let padded = pad_for_tiling(exemplar, size);
        let mut orientations = vec![padded];
        if options.rotation {
            for _ in 0..3 {
                let turned = orientations[orientations.len() - 1].rotated_y();
                orientations.push(turned);
            }
        }

        let mut counter = PatternCounter::default();
        let empty = counter.seed(
            Pattern::empty(size, Dimensionality::Three),
            EMPTY_PATTERN_SEED_COUNT,
        );

        let mut patterns_by_position = Vec::with_capacity(orientations.len());
        let mut padding_tiles = 0usize;
        for volume in &orientations {
            let (nx, ny, nz) = (volume.width / size, volume.height / size, volume.depth / size);
            let mut positions = PositionMap::new();
            for i in 0..nx {
                for j in 0..ny {
                    for k in 0..nz {
                        let block = Pattern::from_fn(size, Dimensionality::Three, |px, py, pz| {
                            volume[(i * size + px, j * size + py, k * size + pz)]
                        });
                        positions.insert((i, j, k), counter.record(block));
                    }
                }
            }
            // Lattice cells outside the exemplar footprint (ground side unpadded).
            let interior = nx.saturating_sub(2) * ny.saturating_sub(1) * nz.saturating_sub(2);
            padding_tiles += (nx * ny * nz).saturating_sub(interior);
            patterns_by_position.push(positions);
        }

        let mut counts = counter.counts;
        let remaining = counts[empty.0] - padding_tiles as f64;
        counts[empty.0] = if remaining > 0.0 {
            remaining * (1.0 - options.avoid_empty_pattern)
        } else {
            EMPTY_PATTERN_FALLBACK_COUNT
        };

        debug!(
            "Extracted {} unique {size}^3 patterns over {} orientation(s), {padding_tiles} padding tiles",
            counter.patterns.len(),
            orientations.len()
        );

        Ok(Self {
            pattern_size: size,
            dimensionality: Dimensionality::Three,
            patterns: counter.patterns,
            weights: normalized(counts),
            patterns_by_position,
            symbol_frequency: exemplar.symbol_frequency(),
            empty_pattern: Some(empty),
        })
    }

    /// Library over authored patterns with raw (unnormalized) frequencies.
    pub(crate) fn from_parts(
        pattern_size: usize,
        dimensionality: Dimensionality,
        patterns: Vec<Pattern>,
        frequencies: Vec<f64>,
    ) -> Self {
        let mut symbol_frequency = BTreeMap::new();
        for symbol in patterns.iter().flat_map(|pattern| pattern.values()) {
            *symbol_frequency.entry(*symbol).or_insert(0) += 1;
        }
        Self {
            pattern_size,
            dimensionality,
            patterns,
            weights: normalized(frequencies),
            patterns_by_position: Vec::new(),
            symbol_frequency,
            empty_pattern: None,
        }
    }

    /// Edge length of every pattern.
    pub const fn pattern_size(&self) -> usize {
        self.pattern_size
    }

    /// 2D or 3D.
    pub const fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    /// Number of real patterns (the void id is not counted).
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Unique patterns in first-seen order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Pattern by id, `None` for void or out of range.
    pub fn pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id.0)
    }

    /// Normalized weights, parallel to [`PatternLibrary::patterns`].
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Normalized weight of `id`; zero for the void id.
    pub fn weight(&self, id: PatternId) -> f64 {
        self.weights.get(id.0).copied().unwrap_or(0.0)
    }

    /// One position map per sampled orientation. Empty for authored tiles.
    pub fn patterns_by_position(&self) -> &[PositionMap] {
        &self.patterns_by_position
    }

    /// Symbol counts of the source exemplar (or of the authored tiles).
    pub const fn symbol_frequency(&self) -> &BTreeMap<Symbol, usize> {
        &self.symbol_frequency
    }

    /// The all-void pattern, present only in tiled libraries.
    pub const fn empty_pattern(&self) -> Option<PatternId> {
        self.empty_pattern
    }

    /// Synthetic id one past the last real pattern, standing for the floor.
    pub fn void_id(&self) -> PatternId {
        PatternId(self.patterns.len())
    }
}

fn normalized(counts: Vec<f64>) -> Vec<f64> {
    let total: f64 = counts.iter().sum();
    if total > 0.0 {
        counts.into_iter().map(|count| count / total).collect()
    } else {
        counts
    }
}

/// Pads `size` void cells around x and z and above the exemplar (minimum y).
fn pad_for_tiling(exemplar: &Grid<Symbol>, size: usize) -> Grid<Symbol> {
    let mut padded = Grid::filled(
        exemplar.width + 2 * size,
        exemplar.height + size,
        exemplar.depth + 2 * size,
        VOID_SYMBOL,
    );
    for z in 0..exemplar.depth {
        for y in 0..exemplar.height {
            for x in 0..exemplar.width {
                padded[(x + size, y + size, z + size)] = exemplar[(x, y, z)];
            }
        }
    }
    padded
}
