use crate::RuleError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

/// A single cell value of an exemplar or output grid.
pub type Symbol = i32;

/// Reserved symbol for void/unassigned cells (padding, air, floor).
pub const VOID_SYMBOL: Symbol = -1;

/// Dense 3D array stored x-fastest.
///
/// A 2D grid is a grid with `depth == 1`. The y axis grows towards the
/// ground, so the maximum y layer of a 3D volume is its bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid<T> {
    /// Extent along x.
    pub width: usize,
    /// Extent along y.
    pub height: usize,
    /// Extent along z.
    pub depth: usize,
    data: Vec<T>,
}

/// Grid of symbols, the shape of every exemplar and every output.
pub type SymbolGrid = Grid<Symbol>;

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, depth: usize, value: T) -> Self {
        Self {
            width,
            height,
            depth,
            data: vec![value; width * height * depth],
        }
    }

    /// Returns a copy turned a quarter turn around the y axis.
    ///
    /// The result has dimensions `(depth, height, width)`; cell `(x, y, z)`
    /// of the result is cell `(width - 1 - z, y, x)` of `self`.
    pub fn rotated_y(&self) -> Self {
        let source_width = self.width;
        Self::from_fn(self.depth, self.height, self.width, |x, y, z| {
            self[(source_width - 1 - z, y, x)].clone()
        })
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a new grid with the given dimensions, initialized with default values.
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self::filled(width, height, depth, T::default())
    }
}

impl<T> Grid<T> {
    /// Wraps an existing x-fastest buffer. Returns `None` when the length
    /// does not match the dimensions.
    pub fn from_vec(width: usize, height: usize, depth: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height * depth).then_some(Self {
            width,
            height,
            depth,
            data,
        })
    }

    /// Builds a grid by evaluating `f` at every coordinate in storage order.
    pub fn from_fn(
        width: usize,
        height: usize,
        depth: usize,
        mut f: impl FnMut(usize, usize, usize) -> T,
    ) -> Self {
        let mut data = Vec::with_capacity(width * height * depth);
        for z in 0..depth {
            for y in 0..height {
                for x in 0..width {
                    data.push(f(x, y, z));
                }
            }
        }
        Self {
            width,
            height,
            depth,
            data,
        }
    }

    /// `(width, height, depth)`.
    pub const fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when there are no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True for single-layer (2D) grids.
    pub const fn is_flat(&self) -> bool {
        self.depth == 1
    }

    /// Calculates the 1D index for the given 3D coordinates.
    /// Returns None if the coordinates are out of bounds.
    pub const fn index_of(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x < self.width && y < self.height && z < self.depth {
            Some(z * self.width * self.height + y * self.width + x)
        } else {
            None
        }
    }

    /// Inverse of [`Grid::index_of`].
    pub const fn coords_of(&self, index: usize) -> (usize, usize, usize) {
        let layer = self.width * self.height;
        (
            index % self.width,
            (index % layer) / self.width,
            index / layer,
        )
    }

    /// Returns an immutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        self.index_of(x, y, z).and_then(|idx| self.data.get(idx))
    }

    /// Returns a mutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize, z: usize) -> Option<&mut T> {
        self.index_of(x, y, z)
            .and_then(move |idx| self.data.get_mut(idx))
    }

    /// Reads with toroidal wraparound on every axis. Only `None` for an
    /// empty grid.
    pub fn get_wrapped(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.get(x % self.width, y % self.height, z % self.depth)
    }

    /// Cells in x-fastest order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable cells in x-fastest order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates cells in x-fastest order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Applies `f` to every cell, keeping the dimensions.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            depth: self.depth,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize, usize)> for Grid<T> {
    type Output = T;

    /// Panics when the coordinates fall outside the grid.
    fn index(&self, (x, y, z): (usize, usize, usize)) -> &T {
        match self.index_of(x, y, z) {
            Some(idx) => &self.data[idx],
            None => panic!(
                "coordinates ({x}, {y}, {z}) out of bounds for a {}x{}x{} grid",
                self.width, self.height, self.depth
            ),
        }
    }
}

impl<T> IndexMut<(usize, usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y, z): (usize, usize, usize)) -> &mut T {
        match self.index_of(x, y, z) {
            Some(idx) => &mut self.data[idx],
            None => panic!(
                "coordinates ({x}, {y}, {z}) out of bounds for a {}x{}x{} grid",
                self.width, self.height, self.depth
            ),
        }
    }
}

impl Grid<Symbol> {
    /// Builds a flat grid from rows indexed `rows[y][x]`.
    pub fn from_rows(rows: &[Vec<Symbol>]) -> Result<Self, RuleError> {
        Self::from_layers(&[rows.to_vec()])
    }

    /// Builds a volume from layers indexed `layers[z][y][x]`.
    pub fn from_layers(layers: &[Vec<Vec<Symbol>>]) -> Result<Self, RuleError> {
        let depth = layers.len();
        let height = layers.first().map_or(0, Vec::len);
        let width = layers
            .first()
            .and_then(|layer| layer.first())
            .map_or(0, Vec::len);

        let mut data = Vec::with_capacity(width * height * depth);
        for layer in layers {
            if layer.len() != height {
                return Err(RuleError::RaggedRows {
                    expected: height,
                    found: layer.len(),
                });
            }
            for row in layer {
                if row.len() != width {
                    return Err(RuleError::RaggedRows {
                        expected: width,
                        found: row.len(),
                    });
                }
                data.extend_from_slice(row);
            }
        }

        Ok(Self {
            width,
            height,
            depth,
            data,
        })
    }

    /// Occurrence count of every symbol in the grid.
    pub fn symbol_frequency(&self) -> BTreeMap<Symbol, usize> {
        let mut counts = BTreeMap::new();
        for &symbol in &self.data {
            *counts.entry(symbol).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SymbolGrid {
        Grid::from_rows(&[vec![1, 2, 3], vec![0, 1, 0], vec![0, 2, 0]]).unwrap()
    }

    #[test]
    fn test_index_round_trip() {
        let grid: Grid<u8> = Grid::new(4, 3, 2);
        for index in 0..grid.len() {
            let (x, y, z) = grid.coords_of(index);
            assert_eq!(grid.index_of(x, y, z), Some(index));
        }
        assert_eq!(grid.index_of(4, 0, 0), None);
    }

    #[test]
    fn test_wrapped_reads() {
        let grid = sample();
        assert_eq!(grid.get_wrapped(3, 0, 0), Some(&1));
        assert_eq!(grid.get_wrapped(1, 5, 0), Some(&2));
        assert_eq!(grid.get_wrapped(5, 5, 7), Some(&0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_panics_out_of_bounds() {
        let grid = sample();
        let _ = grid[(3, 0, 0)];
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = Grid::from_rows(&[vec![1, 2], vec![3]]);
        assert_eq!(
            result,
            Err(RuleError::RaggedRows {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_rotated_y_dimensions_and_cycle() {
        let grid = Grid::from_fn(3, 2, 4, |x, y, z| (x * 100 + y * 10 + z) as Symbol);
        let once = grid.rotated_y();
        assert_eq!(once.dimensions(), (4, 2, 3));
        assert_eq!(once[(0, 1, 0)], grid[(2, 1, 0)]);

        let full_turn = once.rotated_y().rotated_y().rotated_y();
        assert_eq!(full_turn, grid);
    }
}
