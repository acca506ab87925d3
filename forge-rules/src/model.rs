use crate::adjacency::{AdjacencyIndex, AdjacencyStrategy, EdgeMatching, PositionDerived};
use crate::direction::Dimensionality;
use crate::grid::{Grid, Symbol, VOID_SYMBOL};
use crate::library::{PatternLibrary, PositionMap};
use crate::pattern::Pattern;
use crate::tiles::TileCatalogue;
use crate::RuleError;
use log::info;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Extraction options shared by the exemplar-driven models.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelOptions {
    /// Also sample quarter-turned variants.
    pub rotation: bool,
    /// Also sample mirrored variants (flat exemplars only).
    pub symmetry: bool,
    /// Fraction in `[0, 1)` by which the empty pattern's weight is reduced.
    pub avoid_empty_pattern: f64,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            rotation: false,
            symmetry: false,
            avoid_empty_pattern: 0.0,
        }
    }
}

impl ModelOptions {
    /// Checks that every option is in range.
    pub fn validate(&self) -> Result<(), RuleError> {
        if !(0.0..1.0).contains(&self.avoid_empty_pattern) {
            return Err(RuleError::InvalidOption(format!(
                "avoid_empty_pattern must be in [0, 1), got {}",
                self.avoid_empty_pattern
            )));
        }
        Ok(())
    }
}

/// Which variant produced a model. Decides the wave layout and how the
/// output is stitched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModelKind {
    /// 2D overlapping blocks matched by their edges.
    Overlapping,
    /// 3D non-overlapping blocks matched by exemplar position.
    Tiled,
    /// Authored tiles with explicit neighbor lists.
    Authored,
}

/// Patterns plus their adjacency: everything the solver needs.
#[derive(Debug, Clone)]
pub struct Model {
    kind: ModelKind,
    library: PatternLibrary,
    adjacency: AdjacencyIndex,
}

impl Model {
    /// 2D overlapping model from a flat exemplar.
    pub fn overlapping(
        exemplar: &Grid<Symbol>,
        pattern_size: usize,
        options: &ModelOptions,
    ) -> Result<Self, RuleError> {
        let library = PatternLibrary::overlapping(exemplar, pattern_size, options)?;
        Ok(Self::with_strategy(ModelKind::Overlapping, library, &EdgeMatching))
    }

    /// 3D tiled model from a volume exemplar.
    pub fn tiled(
        exemplar: &Grid<Symbol>,
        pattern_size: usize,
        options: &ModelOptions,
    ) -> Result<Self, RuleError> {
        let library = PatternLibrary::tiled(exemplar, pattern_size, options)?;
        Ok(Self::with_strategy(ModelKind::Tiled, library, &PositionDerived))
    }

    /// Model over an authored tile catalogue.
    pub fn from_tiles(catalogue: TileCatalogue) -> Result<Self, RuleError> {
        let tile_count = catalogue.len();
        let (library, adjacency) = catalogue.into_parts()?;
        info!(
            "Built authored model: {tile_count} tiles, {} allowed adjacencies",
            adjacency.allowed_count()
        );
        Ok(Self {
            kind: ModelKind::Authored,
            library,
            adjacency,
        })
    }

    fn with_strategy(
        kind: ModelKind,
        library: PatternLibrary,
        strategy: &dyn AdjacencyStrategy,
    ) -> Self {
        let adjacency = strategy.derive(&library);
        info!(
            "Built {kind:?} model: {} patterns of size {}, {} allowed adjacencies ({})",
            library.len(),
            library.pattern_size(),
            adjacency.allowed_count(),
            strategy.name()
        );
        Self {
            kind,
            library,
            adjacency,
        }
    }

    /// Which model the layout or model was built for.
    pub const fn kind(&self) -> ModelKind {
        self.kind
    }

    /// The extracted or authored patterns.
    pub const fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// The compatibility index the solver propagates with.
    pub const fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    /// Unique patterns, indexed by pattern id.
    pub fn patterns(&self) -> &[Pattern] {
        self.library.patterns()
    }

    /// Exemplar position to pattern id, one map per sampled orientation.
    pub fn patterns_by_position(&self) -> &[PositionMap] {
        self.library.patterns_by_position()
    }

    /// Number of real patterns, void excluded.
    pub fn num_patterns(&self) -> usize {
        self.library.len()
    }

    /// Edge length of every pattern.
    pub const fn pattern_size(&self) -> usize {
        self.library.pattern_size()
    }

    /// 2D or 3D.
    pub const fn dimensionality(&self) -> Dimensionality {
        self.library.dimensionality()
    }
}

/// Builds the model matching the exemplar's shape: a single layer gives the
/// 2D overlapping model, anything deeper the 3D tiled model.
pub fn build_model(
    exemplar: &Grid<Symbol>,
    pattern_size: usize,
    options: &ModelOptions,
) -> Result<Model, RuleError> {
    if let Some(index) = exemplar.iter().position(|&s| s < VOID_SYMBOL) {
        let (x, y, z) = exemplar.coords_of(index);
        return Err(RuleError::InvalidSymbol {
            symbol: exemplar.as_slice()[index],
            x,
            y,
            z,
        });
    }
    if exemplar.is_flat() {
        Model::overlapping(exemplar, pattern_size, options)
    } else {
        Model::tiled(exemplar, pattern_size, options)
    }
}

/// Builds a model from authored tiles.
pub fn build_model_from_tiles(catalogue: TileCatalogue) -> Result<Model, RuleError> {
    Model::from_tiles(catalogue)
}
