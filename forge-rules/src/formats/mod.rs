//! Parsers for the tile catalogue file formats.

/// The parser trait.
pub mod parser;
pub use parser::FormatParser;

/// RON catalogue files.
pub mod ron_format;
pub use ron_format::RonFormatParser;
