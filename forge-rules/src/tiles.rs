use crate::adjacency::AdjacencyIndex;
use crate::direction::{Dimensionality, Direction};
use crate::grid::{Grid, Symbol};
use crate::library::PatternLibrary;
use crate::pattern::{Pattern, PatternId};
use crate::RuleError;
use std::collections::BTreeSet;

/// An authored tile: a block of symbols, the tiles it accepts on each side,
/// and how often it should appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Unique name, used by catalogue files.
    pub name: String,
    /// Cells written to the output where the tile is placed.
    pub symbols: Grid<Symbol>,
    /// Allowed neighbors, indexed by `Direction::index()`.
    pub neighbors: [BTreeSet<PatternId>; Direction::COUNT],
    /// Relative weight.
    pub frequency: u32,
}

impl Tile {
    /// A tile with no allowed neighbors yet.
    pub fn new(name: impl Into<String>, symbols: Grid<Symbol>, frequency: u32) -> Self {
        Self {
            name: name.into(),
            symbols,
            neighbors: Default::default(),
            frequency,
        }
    }

    /// Adds `id` to the neighbors accepted in `direction`.
    pub fn allow(&mut self, direction: Direction, id: PatternId) {
        self.neighbors[direction.index()].insert(id);
    }

    /// Builder form of [`Tile::allow`].
    #[must_use]
    pub fn with_neighbor(mut self, direction: Direction, id: PatternId) -> Self {
        self.allow(direction, id);
        self
    }

    /// Tiles allowed on the given side.
    pub fn neighbors(&self, direction: Direction) -> &BTreeSet<PatternId> {
        &self.neighbors[direction.index()]
    }
}

/// An ordered list of tiles sharing one block size. A tile's id is its
/// position in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileCatalogue {
    pattern_size: usize,
    dimensionality: Dimensionality,
    tiles: Vec<Tile>,
}

impl TileCatalogue {
    /// An empty catalogue of tiles with the given edge length.
    pub const fn new(pattern_size: usize, dimensionality: Dimensionality) -> Self {
        Self {
            pattern_size,
            dimensionality,
            tiles: Vec::new(),
        }
    }

    /// Appends a tile and returns its id.
    pub fn push(&mut self, tile: Tile) -> PatternId {
        self.tiles.push(tile);
        PatternId(self.tiles.len() - 1)
    }

    /// Tiles in id order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Mutable access to a tile by id.
    pub fn tile_mut(&mut self, id: PatternId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.0)
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True for a catalogue without tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Edge length of every pattern.
    pub const fn pattern_size(&self) -> usize {
        self.pattern_size
    }

    /// 2D or 3D.
    pub const fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    /// Checks block shapes, frequencies and neighbor references.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.tiles.is_empty() {
            return Err(RuleError::InvalidOption(
                "tile catalogue has no tiles".to_owned(),
            ));
        }
        if self.pattern_size == 0 {
            return Err(RuleError::PatternSizeTooSmall {
                size: 0,
                minimum: 1,
            });
        }

        let size = self.pattern_size;
        let expected = (size, size, self.dimensionality.depth_extent(size));
        let planar = self.dimensionality == Dimensionality::Two;

        for (index, tile) in self.tiles.iter().enumerate() {
            let invalid = |reason: String| RuleError::InvalidTile { index, reason };
            if tile.frequency == 0 {
                return Err(invalid(format!("'{}' has a frequency of zero", tile.name)));
            }
            if tile.symbols.dimensions() != expected {
                return Err(invalid(format!(
                    "'{}' has a {:?} block, expected {:?}",
                    tile.name,
                    tile.symbols.dimensions(),
                    expected
                )));
            }
            for direction in Direction::ALL {
                let listed = tile.neighbors(direction);
                if planar
                    && matches!(direction, Direction::Forward | Direction::Backward)
                    && !listed.is_empty()
                {
                    return Err(invalid(format!(
                        "'{}' lists {direction} neighbors in a 2D catalogue",
                        tile.name
                    )));
                }
                if let Some(unknown) = listed.iter().find(|id| id.0 >= self.tiles.len()) {
                    return Err(invalid(format!(
                        "'{}' references unknown tile {} ({direction})",
                        tile.name, unknown.0
                    )));
                }
            }
        }
        Ok(())
    }

    /// Turns the catalogue into a normalized library and a symmetric index.
    ///
    /// Neighbor lists only need to be authored from one side: each listed
    /// pair is inserted together with its mirror.
    pub fn into_parts(self) -> Result<(PatternLibrary, AdjacencyIndex), RuleError> {
        self.validate()?;

        let mut adjacency = AdjacencyIndex::new(self.tiles.len());
        for (index, tile) in self.tiles.iter().enumerate() {
            for direction in Direction::ALL {
                for &neighbor in tile.neighbors(direction) {
                    adjacency.allow(PatternId(index), neighbor, direction);
                }
            }
        }

        let size = self.pattern_size;
        let dimensionality = self.dimensionality;
        let (patterns, frequencies) = self
            .tiles
            .iter()
            .map(|tile| {
                let pattern =
                    Pattern::from_fn(size, dimensionality, |x, y, z| tile.symbols[(x, y, z)]);
                (pattern, f64::from(tile.frequency))
            })
            .unzip();

        let library = PatternLibrary::from_parts(size, dimensionality, patterns, frequencies);
        Ok((library, adjacency))
    }
}
