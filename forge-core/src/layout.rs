use crate::WfcError;
use forge_rules::{Dimensionality, Model, ModelKind};

/// Cells pinned before the first random choice of the tiled model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Boundary {
    empty: usize,
    void: usize,
}

/// How a model's output request maps onto a wave and back.
///
/// * Overlapping: one wave cell per output cell; neighbors share their
///   matching edge, so blocks are stitched with stride `N - 1`.
/// * Tiled: the wave gets a one-cell ring on every side. The bottom layer
///   (maximum y) is pinned to the void id and the rest of the ring to the
///   empty pattern. Only interior cells reach the output, at stride `N`.
/// * Authored: one wave cell per output cell at stride `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveLayout {
    kind: ModelKind,
    wave_size: (usize, usize, usize),
    output_cells: (usize, usize, usize),
    offset: usize,
    stride: [usize; 3],
    block: [usize; 3],
    boundary: Option<Boundary>,
}

impl WaveLayout {
    /// Computes the layout for solving `model` into `output_size` cells.
    pub fn for_model(model: &Model, output_size: (usize, usize, usize)) -> Result<Self, WfcError> {
        let (width, height, depth) = output_size;
        if width == 0 || height == 0 || depth == 0 {
            return Err(WfcError::InvalidInput(format!(
                "output size must be positive on every axis, got {width}x{height}x{depth}"
            )));
        }
        if model.dimensionality() == Dimensionality::Two && depth != 1 {
            return Err(WfcError::InvalidInput(format!(
                "a 2D model produces a single layer, got depth {depth}"
            )));
        }

        let size = model.pattern_size();
        let depth_extent = model.dimensionality().depth_extent(size);
        let layout = match model.kind() {
            ModelKind::Overlapping => Self {
                kind: ModelKind::Overlapping,
                wave_size: output_size,
                output_cells: output_size,
                offset: 0,
                stride: [size - 1, size - 1, 1],
                block: [size, size, 1],
                boundary: None,
            },
            ModelKind::Tiled => {
                let empty = model.library().empty_pattern().ok_or_else(|| {
                    WfcError::InternalError("tiled model without an empty pattern".to_owned())
                })?;
                Self {
                    kind: ModelKind::Tiled,
                    wave_size: (width + 2, height + 2, depth + 2),
                    output_cells: output_size,
                    offset: 1,
                    stride: [size; 3],
                    block: [size; 3],
                    boundary: Some(Boundary {
                        empty: empty.0,
                        void: model.adjacency().void_id().0,
                    }),
                }
            }
            ModelKind::Authored => Self {
                kind: ModelKind::Authored,
                wave_size: output_size,
                output_cells: output_size,
                offset: 0,
                stride: [size, size, depth_extent],
                block: [size, size, depth_extent],
                boundary: None,
            },
        };
        Ok(layout)
    }

    /// Which model the layout or model was built for.
    pub const fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Wave dimensions, boundary cells included.
    pub const fn wave_size(&self) -> (usize, usize, usize) {
        self.wave_size
    }

    /// Number of wave cells that reach the output, per axis.
    pub const fn output_cells(&self) -> (usize, usize, usize) {
        self.output_cells
    }

    /// Output cells advanced per wave cell along each axis.
    pub const fn stride(&self) -> [usize; 3] {
        self.stride
    }

    /// Output cells written per wave cell along each axis.
    pub const fn block(&self) -> [usize; 3] {
        self.block
    }

    /// Symbol dimensions of the stitched output.
    pub const fn output_dimensions(&self) -> (usize, usize, usize) {
        let (cx, cy, cz) = self.output_cells;
        (
            (cx - 1) * self.stride[0] + self.block[0],
            (cy - 1) * self.stride[1] + self.block[1],
            (cz - 1) * self.stride[2] + self.block[2],
        )
    }

    /// Wave index of output cell `(x, y, z)`.
    pub const fn wave_index(&self, x: usize, y: usize, z: usize) -> usize {
        let (width, height, _) = self.wave_size;
        (z + self.offset) * width * height + (y + self.offset) * width + (x + self.offset)
    }

    /// `(cell index, pattern id)` pairs pinned at initialization.
    pub fn forced_cells(&self) -> Vec<(usize, usize)> {
        let Some(boundary) = self.boundary else {
            return Vec::new();
        };
        let (width, height, depth) = self.wave_size;
        let mut forced = Vec::new();
        for z in 0..depth {
            for y in 0..height {
                for x in 0..width {
                    let index = z * width * height + y * width + x;
                    if y == height - 1 {
                        forced.push((index, boundary.void));
                    } else if x == 0 || x == width - 1 || z == 0 || z == depth - 1 || y == 0 {
                        forced.push((index, boundary.empty));
                    }
                }
            }
        }
        forced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_rules::{Grid, ModelOptions};

    #[test]
    fn test_overlapping_geometry() {
        let exemplar = Grid::filled(3, 3, 1, 1);
        let model = Model::overlapping(&exemplar, 3, &ModelOptions::default()).unwrap();
        let layout = WaveLayout::for_model(&model, (4, 5, 1)).unwrap();
        assert_eq!(layout.wave_size(), (4, 5, 1));
        assert_eq!(layout.output_dimensions(), (9, 11, 1));
        assert!(layout.forced_cells().is_empty());
    }

    #[test]
    fn test_tiled_ring_and_floor() {
        let exemplar = Grid::filled(2, 2, 2, 1);
        let model = Model::tiled(&exemplar, 2, &ModelOptions::default()).unwrap();
        let layout = WaveLayout::for_model(&model, (2, 3, 4)).unwrap();
        assert_eq!(layout.wave_size(), (4, 5, 6));
        assert_eq!(layout.output_dimensions(), (4, 6, 8));

        let forced = layout.forced_cells();
        let void = model.adjacency().void_id().0;
        let floor = forced.iter().filter(|&&(_, id)| id == void).count();
        assert_eq!(floor, 4 * 6);
        // Everything but the 2x3x4 interior is pinned.
        assert_eq!(forced.len(), 4 * 5 * 6 - 2 * 3 * 4);
        // Interior (0, 0, 0) is wave cell (1, 1, 1).
        assert_eq!(layout.wave_index(0, 0, 0), 4 * 5 + 4 + 1);
    }

    #[test]
    fn test_rejects_zero_and_deep_2d_requests() {
        let exemplar = Grid::filled(3, 3, 1, 1);
        let model = Model::overlapping(&exemplar, 2, &ModelOptions::default()).unwrap();
        assert!(matches!(
            WaveLayout::for_model(&model, (0, 3, 1)),
            Err(WfcError::InvalidInput(_))
        ));
        assert!(matches!(
            WaveLayout::for_model(&model, (3, 3, 2)),
            Err(WfcError::InvalidInput(_))
        ));
    }
}
