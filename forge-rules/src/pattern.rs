use crate::direction::{Dimensionality, Direction};
use crate::grid::{Symbol, VOID_SYMBOL};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a pattern inside its `PatternLibrary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatternId(pub usize);

/// Immutable `size × size` (2D) or `size × size × size` (3D) block of
/// symbols, stored x-fastest. Two patterns are the same pattern when their
/// values are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pattern {
    size: usize,
    dimensionality: Dimensionality,
    values: Vec<Symbol>,
}

impl Pattern {
    /// Builds a pattern by sampling `f` at every local coordinate.
    pub fn from_fn(
        size: usize,
        dimensionality: Dimensionality,
        mut f: impl FnMut(usize, usize, usize) -> Symbol,
    ) -> Self {
        let depth = dimensionality.depth_extent(size);
        let mut values = Vec::with_capacity(size * size * depth);
        for z in 0..depth {
            for y in 0..size {
                for x in 0..size {
                    values.push(f(x, y, z));
                }
            }
        }
        Self {
            size,
            dimensionality,
            values,
        }
    }

    /// A pattern made only of [`VOID_SYMBOL`].
    pub fn empty(size: usize, dimensionality: Dimensionality) -> Self {
        Self::from_fn(size, dimensionality, |_, _, _| VOID_SYMBOL)
    }

    /// Edge length.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// 2D or 3D.
    pub const fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    /// Extent along z: 1 for flat patterns.
    pub const fn depth(&self) -> usize {
        self.dimensionality.depth_extent(self.size)
    }

    /// Cell values in x-fastest order.
    pub fn values(&self) -> &[Symbol] {
        &self.values
    }

    /// Value at a local coordinate, `None` outside the block.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<Symbol> {
        if x < self.size && y < self.size && z < self.depth() {
            self.values
                .get(z * self.size * self.size + y * self.size + x)
                .copied()
        } else {
            None
        }
    }

    /// True when every cell is void.
    pub fn is_empty_pattern(&self) -> bool {
        self.values.iter().all(|&symbol| symbol == VOID_SYMBOL)
    }

    /// The face of the block that touches the neighbor in `direction`.
    ///
    /// Opposite faces are listed in the same order, so
    /// `a.edge(d) == b.edge(d.opposite())` means `b` may sit next to `a`
    /// in direction `d`.
    pub fn edge(&self, direction: Direction) -> Vec<Symbol> {
        let last = self.size - 1;
        let depth_last = self.depth() - 1;
        let mut edge = Vec::new();
        for z in 0..self.depth() {
            for y in 0..self.size {
                for x in 0..self.size {
                    let on_face = match direction {
                        Direction::Left => x == 0,
                        Direction::Right => x == last,
                        Direction::Up => y == 0,
                        Direction::Down => y == last,
                        Direction::Backward => z == 0,
                        Direction::Forward => z == depth_last,
                    };
                    if on_face {
                        edge.push(self.values[z * self.size * self.size + y * self.size + x]);
                    }
                }
            }
        }
        edge
    }

    /// Quarter turn in the xy plane: `rotated(x, y) = self(y, size - 1 - x)`.
    pub fn rotated(&self) -> Self {
        let last = self.size - 1;
        self.remapped(|x, y, z| (y, last - x, z))
    }

    /// Mirror image across the horizontal axis: `(x, y) -> (x, size - 1 - y)`.
    pub fn reflected_y(&self) -> Self {
        let last = self.size - 1;
        self.remapped(|x, y, z| (x, last - y, z))
    }

    /// Mirror image across the vertical axis: `(x, y) -> (size - 1 - x, y)`.
    pub fn reflected_x(&self) -> Self {
        let last = self.size - 1;
        self.remapped(|x, y, z| (last - x, y, z))
    }

    fn remapped(&self, source: impl Fn(usize, usize, usize) -> (usize, usize, usize)) -> Self {
        Self::from_fn(self.size, self.dimensionality, |x, y, z| {
            let (sx, sy, sz) = source(x, y, z);
            self.get(sx, sy, sz).unwrap_or(VOID_SYMBOL)
        })
    }
}
