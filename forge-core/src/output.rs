use crate::layout::WaveLayout;
use crate::WfcError;
use forge_rules::{Grid, PatternId, PatternLibrary, Symbol, VOID_SYMBOL};

/// Stitches the chosen pattern of every output cell into one dense grid.
///
/// Later cells overwrite the shared edge of earlier ones; for a valid
/// overlapping solution the overwritten values are identical. Void cells
/// (and cells the layout crops) leave [`VOID_SYMBOL`] behind.
#[derive(Debug, Clone, Copy)]
pub struct OutputSynthesizer<'a> {
    library: &'a PatternLibrary,
    layout: &'a WaveLayout,
}

impl<'a> OutputSynthesizer<'a> {
    /// Pairs the pattern library with the layout of the wave it solved.
    pub const fn new(library: &'a PatternLibrary, layout: &'a WaveLayout) -> Self {
        Self { library, layout }
    }

    /// Writes every chosen pattern's cells into a grid of the requested output size.
    pub fn synthesize(&self, pattern_ids: &Grid<usize>) -> Result<Grid<Symbol>, WfcError> {
        if pattern_ids.dimensions() != self.layout.wave_size() {
            return Err(WfcError::InternalError(format!(
                "pattern grid {:?} does not match wave size {:?}",
                pattern_ids.dimensions(),
                self.layout.wave_size()
            )));
        }

        let (width, height, depth) = self.layout.output_dimensions();
        let mut output = Grid::filled(width, height, depth, VOID_SYMBOL);
        let (cells_x, cells_y, cells_z) = self.layout.output_cells();
        let [stride_x, stride_y, stride_z] = self.layout.stride();
        let [block_x, block_y, block_z] = self.layout.block();

        for z in 0..cells_z {
            for y in 0..cells_y {
                for x in 0..cells_x {
                    let index = self.layout.wave_index(x, y, z);
                    let id = pattern_ids.as_slice().get(index).copied().ok_or_else(|| {
                        WfcError::InternalError(format!("wave cell {index} out of range"))
                    })?;
                    let Some(pattern) = self.library.pattern(PatternId(id)) else {
                        continue;
                    };

                    for pz in 0..block_z {
                        for py in 0..block_y {
                            for px in 0..block_x {
                                let target = output.get_mut(
                                    x * stride_x + px,
                                    y * stride_y + py,
                                    z * stride_z + pz,
                                );
                                if let (Some(slot), Some(value)) = (target, pattern.get(px, py, pz)) {
                                    *slot = value;
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(output)
    }
}
