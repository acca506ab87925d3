use forge_rules::{Dimensionality, Direction};

/// Shape of a finite (non-wrapping) wave and the directions its cells
/// connect along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    /// Cells along x.
    pub width: usize,
    /// Cells along y.
    pub height: usize,
    /// Cells along z.
    pub depth: usize,
    directions: &'static [Direction],
}

impl Topology {
    /// Topology of a wave of the given size; 2D waves only connect along x and y.
    pub const fn new(
        (width, height, depth): (usize, usize, usize),
        dimensionality: Dimensionality,
    ) -> Self {
        Self {
            width,
            height,
            depth,
            directions: dimensionality.directions(),
        }
    }

    /// Directions a cell connects along.
    pub const fn directions(&self) -> &'static [Direction] {
        self.directions
    }

    /// Number of cells.
    pub const fn len(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// True for a zero-sized wave.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(x, y, z)` of a flat cell index.
    pub const fn coords(&self, index: usize) -> (usize, usize, usize) {
        let layer = self.width * self.height;
        (
            index % self.width,
            (index % layer) / self.width,
            index / layer,
        )
    }

    /// Index of the cell one step from `index` in `direction`, or `None`
    /// past the edge of the wave.
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let (x, y, z) = self.coords(index);
        let (dx, dy, dz) = direction.offset();
        let nx = x.checked_add_signed(dx).filter(|&v| v < self.width)?;
        let ny = y.checked_add_signed(dy).filter(|&v| v < self.height)?;
        let nz = z.checked_add_signed(dz).filter(|&v| v < self.depth)?;
        Some(nz * self.width * self.height + ny * self.width + nx)
    }
}
