use crate::{LoadError, TileCatalogue};

/// Trait defining the interface for format-specific catalogue parsers.
///
/// Implementors turn the text of a rule file into a `TileCatalogue`; the
/// catalogue is validated later, when a model is built from it.
pub trait FormatParser {
    /// Parses file content into a tile catalogue.
    ///
    /// # Arguments
    ///
    /// * `content` - The complete text of the rule file
    ///
    /// # Returns
    ///
    /// * `Ok(TileCatalogue)` - Successfully parsed catalogue
    /// * `Err(LoadError)` - Syntax errors or references that cannot be resolved
    fn parse(&self, content: &str) -> Result<TileCatalogue, LoadError>;

    /// Returns a descriptive name for this parser format, for logs and errors.
    fn format_name(&self) -> &'static str;
}
