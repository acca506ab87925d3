use crate::formats::FormatParser;
use crate::{LoadError, TileCatalogue};
#[cfg(feature = "serde")]
use crate::{Dimensionality, Direction, Grid, PatternId, Symbol, Tile};
#[cfg(feature = "serde")]
use serde::Deserialize;
#[cfg(feature = "serde")]
use std::collections::HashMap;

/// A parser for tile catalogues written in RON (Rusty Object Notation).
///
/// ```ron
/// (
///     pattern_size: 1,
///     dimensions: 2,
///     tiles: [
///         (name: "grass", frequency: 3, symbols: [1]),
///         (name: "water", symbols: [2]),
///     ],
///     adjacency: [
///         ("grass", "water", "right"),
///         ("grass", "grass", "+y"),
///     ],
/// )
/// ```
///
/// Symbols are listed x-fastest. Directions accept both names
/// (`left`, `down`, ...) and signed axes (`-x`, `+y`, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct RonFormatParser;

impl RonFormatParser {
    /// Creates the parser.
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(feature = "serde")]
const fn default_pattern_size() -> usize {
    1
}

#[cfg(feature = "serde")]
const fn default_dimensions() -> u8 {
    2
}

#[cfg(feature = "serde")]
const fn default_frequency() -> u32 {
    1
}

#[cfg(feature = "serde")]
#[derive(Debug, Clone, Deserialize)]
struct RonTileData {
    /// Unique name used by the adjacency list.
    name: String,
    #[serde(default = "default_frequency")]
    frequency: u32,
    symbols: Vec<Symbol>,
}

/// Top-level structure of a RON catalogue file.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Deserialize)]
struct RonRuleFile {
    #[serde(default = "default_pattern_size")]
    pattern_size: usize,
    #[serde(default = "default_dimensions")]
    dimensions: u8,
    tiles: Vec<RonTileData>,
    /// `(tile, neighbor, direction)`: `neighbor` may sit next to `tile` in `direction`.
    #[serde(default)]
    adjacency: Vec<(String, String, String)>,
}

impl FormatParser for RonFormatParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    #[cfg(feature = "serde")]
    fn parse(&self, content: &str) -> Result<TileCatalogue, LoadError> {
        let rule_file: RonRuleFile = ron::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;

        let dimensionality = match rule_file.dimensions {
            2 => Dimensionality::Two,
            3 => Dimensionality::Three,
            other => {
                return Err(LoadError::InvalidData(format!(
                    "dimensions must be 2 or 3, got {other}"
                )))
            }
        };
        if rule_file.tiles.is_empty() {
            return Err(LoadError::InvalidData("No tiles defined.".to_owned()));
        }

        let size = rule_file.pattern_size;
        let depth = dimensionality.depth_extent(size);
        let mut catalogue = TileCatalogue::new(size, dimensionality);
        let mut ids_by_name = HashMap::new();

        for tile_data in rule_file.tiles {
            if ids_by_name.contains_key(&tile_data.name) {
                return Err(LoadError::InvalidData(format!(
                    "Duplicate tile name: {}",
                    tile_data.name
                )));
            }
            let found = tile_data.symbols.len();
            let symbols = Grid::from_vec(size, size, depth, tile_data.symbols).ok_or_else(|| {
                LoadError::InvalidData(format!(
                    "Tile '{}' lists {found} symbols, expected {}",
                    tile_data.name,
                    size * size * depth
                ))
            })?;
            let id = catalogue.push(Tile::new(tile_data.name.clone(), symbols, tile_data.frequency));
            ids_by_name.insert(tile_data.name, id);
        }

        let lookup = |name: &str| -> Result<PatternId, LoadError> {
            ids_by_name
                .get(name)
                .copied()
                .ok_or_else(|| LoadError::InvalidData(format!("Unknown tile: {name}")))
        };
        for (tile_name, neighbor_name, direction_name) in &rule_file.adjacency {
            let tile = lookup(tile_name)?;
            let neighbor = lookup(neighbor_name)?;
            let direction = Direction::from_name(direction_name).ok_or_else(|| {
                LoadError::InvalidData(format!("Invalid direction name: {direction_name}"))
            })?;
            if let Some(entry) = catalogue.tile_mut(tile) {
                entry.allow(direction, neighbor);
            }
        }

        Ok(catalogue)
    }

    #[cfg(not(feature = "serde"))]
    fn parse(&self, _content: &str) -> Result<TileCatalogue, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for RON parsing)".to_owned(),
        ))
    }
}
