//! Plain-text grid files.
//!
//! Symbols are whitespace-separated integers along x, one row per line (y),
//! layers (z) separated by one or more blank lines. Lines starting with `#`
//! are comments. Void cells are written as `-1`.

use anyhow::{Context, Result};
use forge_rules::{Grid, Symbol};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Parses a grid from the text format.
pub fn parse_grid(text: &str) -> Result<Grid<Symbol>> {
    let mut layers: Vec<Vec<Vec<Symbol>>> = Vec::new();
    let mut current: Vec<Vec<Symbol>> = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            if !current.is_empty() {
                layers.push(std::mem::take(&mut current));
            }
            continue;
        }
        let row = line
            .split_whitespace()
            .map(str::parse::<Symbol>)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Invalid symbol on line {}", number + 1))?;
        current.push(row);
    }
    if !current.is_empty() {
        layers.push(current);
    }

    let grid = Grid::from_layers(&layers)?;
    if grid.is_empty() {
        anyhow::bail!("Grid file contains no symbols");
    }
    Ok(grid)
}

/// Reads a grid file.
pub fn read_grid(path: &Path) -> Result<Grid<Symbol>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read grid file: {}", path.display()))?;
    parse_grid(&text).with_context(|| format!("Failed to parse grid file: {}", path.display()))
}

/// Writes `grid` in the text format.
pub fn write_grid(grid: &Grid<Symbol>, writer: &mut impl Write) -> io::Result<()> {
    for z in 0..grid.depth {
        if z > 0 {
            writeln!(writer)?;
        }
        for y in 0..grid.height {
            let line = (0..grid.width)
                .map(|x| grid[(x, y, z)].to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{line}")?;
        }
    }
    Ok(())
}

/// Saves `grid` to `output_path`.
pub fn save_grid_to_file(grid: &Grid<Symbol>, output_path: &Path) -> Result<()> {
    log::info!("Saving {:?} grid to {}", grid.dimensions(), output_path.display());

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    let mut writer = io::BufWriter::new(file);
    write_grid(grid, &mut writer).context("Failed to write output grid")?;
    writer
        .flush()
        .context("Failed to flush writer for output file")?;
    Ok(())
}
