//! Rule derivation for the voxel forge solver.
//!
//! Turns an exemplar grid (or an authored tile catalogue) into the pattern
//! library and the directional adjacency index that the solver in
//! `forge-core` consumes.

use thiserror::Error;

/// Directional compatibility between patterns and the strategies deriving it.
pub mod adjacency;
/// The six axis directions and the 2D/3D split.
pub mod direction;
/// Parsers for authored tile catalogue files.
pub mod formats;
/// Dense 3D grids of symbols (or anything else).
pub mod grid;
/// Deduplicated pattern sets with normalized weights.
pub mod library;
/// Entry point for loading tile catalogues from disk.
pub mod loader;
/// Complete models (patterns plus adjacency) ready to be solved.
pub mod model;
/// Fixed-size blocks of symbols.
pub mod pattern;
/// Authored tiles with explicit neighbor lists.
pub mod tiles;

/// Symmetric compatibility lookup used during propagation.
pub use crate::adjacency::AdjacencyIndex;
/// Strategy trait for deriving an `AdjacencyIndex` from a library.
pub use crate::adjacency::{AdjacencyStrategy, EdgeMatching, PositionDerived};
pub use crate::direction::{Dimensionality, Direction};
/// Dense grid plus the symbol vocabulary.
pub use crate::grid::{Grid, Symbol, SymbolGrid, VOID_SYMBOL};
pub use crate::library::PatternLibrary;
/// Model construction entry points.
pub use crate::model::{build_model, build_model_from_tiles, Model, ModelKind, ModelOptions};
pub use crate::pattern::{Pattern, PatternId};
pub use crate::tiles::{Tile, TileCatalogue};

/// Errors raised while validating an exemplar, options or an authored catalogue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// The exemplar has no cells.
    #[error("Exemplar grid is empty")]
    EmptyExemplar,
    /// The pattern size is below what the model can work with.
    #[error("Pattern size {size} is below the minimum of {minimum}")]
    PatternSizeTooSmall {
        /// Requested pattern size.
        size: usize,
        /// Smallest size the model accepts.
        minimum: usize,
    },
    /// The pattern does not fit into the exemplar along some axis.
    #[error("Pattern size {size} exceeds the exemplar extent {extent}")]
    PatternSizeTooLarge {
        /// Requested pattern size.
        size: usize,
        /// The smallest exemplar extent it was compared against.
        extent: usize,
    },
    /// Rows (or layers) of a nested exemplar have different lengths.
    #[error("Exemplar rows have inconsistent lengths: expected {expected}, found {found}")]
    RaggedRows {
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// An exemplar cell holds a negative symbol other than void.
    #[error("Invalid symbol {symbol} at ({x}, {y}, {z})")]
    InvalidSymbol {
        /// The offending value.
        symbol: Symbol,
        /// Cell x coordinate.
        x: usize,
        /// Cell y coordinate.
        y: usize,
        /// Cell z coordinate.
        z: usize,
    },
    /// A model option is out of range or not applicable.
    #[error("Invalid model option: {0}")]
    InvalidOption(String),
    /// An authored tile is malformed.
    #[error("Invalid tile {index}: {reason}")]
    InvalidTile {
        /// Position of the tile in its catalogue.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
}

/// Errors raised while loading a tile catalogue from a file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rules format: {0}")]
    ParseError(String),
    #[error("Invalid rule data: {0}")]
    InvalidData(String),
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),
    #[error("Invalid catalogue: {0}")]
    Rule(#[from] RuleError),
}
