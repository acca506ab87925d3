use crate::formats::{FormatParser, RonFormatParser};
use crate::{LoadError, TileCatalogue};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Loads an authored tile catalogue from a file.
///
/// The format is chosen from the file extension; only `.ron` is supported.
///
/// # Arguments
///
/// * `path` - The path to the catalogue file.
///
/// # Returns
///
/// The parsed (not yet validated) `TileCatalogue`, or a `LoadError` when the
/// file cannot be read, has an unknown extension, or fails to parse.
pub fn load_from_file(path: &Path) -> Result<TileCatalogue, LoadError> {
    let parser = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("ron") => RonFormatParser::new(),
        other => {
            return Err(LoadError::InvalidData(format!(
                "Unsupported rule file extension: {other:?}"
            )))
        }
    };

    debug!("Reading {} from {:?}", parser.format_name(), path);
    let content = fs::read_to_string(path)?;
    let catalogue = parser.parse(&content)?;
    info!(
        "Loaded {} tiles ({:?}, block size {}) from {:?}",
        catalogue.len(),
        catalogue.dimensionality(),
        catalogue.pattern_size(),
        path
    );
    Ok(catalogue)
}
