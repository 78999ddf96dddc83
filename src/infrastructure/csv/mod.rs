// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Delimited-text decoding, parsing, and delimiter detection

mod csv_parser;
pub mod encoding;

pub use csv_parser::{CsvParser, RaggedRows, DELIMITER_CANDIDATES};
