// ============================================================
// TABLE LOADER
// ============================================================
// Ordered load strategies; the first one that yields a Table wins

use std::path::Path;

use encoding_rs::UTF_8;
use tracing::{info, warn};

use crate::domain::analysis_config::AnalysisConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::sniff::{FileFormat, ParseCandidate, Preview};
use crate::domain::table::Table;
use crate::infrastructure::csv::encoding::{decode_lossy, decode_strict, resolve};
use crate::infrastructure::csv::{CsvParser, RaggedRows};
use crate::infrastructure::spreadsheet::{range_to_table, Workbook};

/// One way of turning a file into a full [`Table`]
pub trait LoadStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn load(&self, path: &Path, format: FileFormat, preview: Option<&Preview>) -> Result<Table>;
}

/// Strict format-native read with its own heuristics and no help from
/// the sniffer: UTF-8 text with a detected delimiter, or the first sheet
/// with its header on the first row. A sheet whose first row is blank is
/// left to the next strategy.
pub struct NativeLoader;

impl LoadStrategy for NativeLoader {
    fn name(&self) -> &'static str {
        "native"
    }

    fn load(&self, path: &Path, format: FileFormat, _preview: Option<&Preview>) -> Result<Table> {
        match format {
            FileFormat::Delimited => {
                let bytes = std::fs::read(path)?;
                let content = decode_strict(&bytes, UTF_8)?;
                CsvParser::new()
                    .with_delimiter(CsvParser::detect_delimiter(&content))
                    .with_ragged_rows(RaggedRows::Reject)
                    .parse_content(&content)
            }
            FileFormat::Spreadsheet => {
                let range = Workbook::open(path)?.first_sheet()?;
                let table = range_to_table(&range, Some(0), None)?;
                if table.row_count() == 0 {
                    return Err(AppError::ParseError(
                        "First sheet has no data rows".to_string(),
                    ));
                }
                if table.has_only_auto_labels() {
                    return Err(AppError::ParseError(
                        "First row of the sheet has no column labels".to_string(),
                    ));
                }
                Ok(table)
            }
        }
    }
}

/// Lenient read driven by the sniffing outcome when there is one,
/// followed by column-name normalization
pub struct NormalizingLoader {
    sample_bytes: usize,
}

impl NormalizingLoader {
    pub fn new(sample_bytes: usize) -> Self {
        Self { sample_bytes }
    }

    fn load_delimited(&self, path: &Path, preview: Option<&Preview>) -> Result<Table> {
        let bytes = std::fs::read(path)?;

        let (content, delimiter) = match preview.map(|p| p.candidate) {
            Some(ParseCandidate::Delimited {
                encoding,
                delimiter,
            }) => (decode_lossy(&bytes, resolve(encoding)?), delimiter),
            _ => {
                let sample = &bytes[..bytes.len().min(self.sample_bytes)];
                let delimiter = CsvParser::detect_delimiter(&decode_lossy(sample, UTF_8));
                (decode_lossy(&bytes, UTF_8), delimiter)
            }
        };

        CsvParser::new()
            .with_delimiter(delimiter)
            .with_ragged_rows(RaggedRows::SkipLong)
            .parse_content(&content)
    }

    fn load_spreadsheet(&self, path: &Path, preview: Option<&Preview>) -> Result<Table> {
        let header_row = match preview.map(|p| p.candidate) {
            Some(ParseCandidate::Sheet { header_row }) => header_row,
            _ => Some(0),
        };
        let range = Workbook::open(path)?.first_sheet()?;
        range_to_table(&range, header_row, None)
    }
}

impl LoadStrategy for NormalizingLoader {
    fn name(&self) -> &'static str {
        "normalizing"
    }

    fn load(&self, path: &Path, format: FileFormat, preview: Option<&Preview>) -> Result<Table> {
        let mut table = match format {
            FileFormat::Delimited => self.load_delimited(path, preview)?,
            FileFormat::Spreadsheet => self.load_spreadsheet(path, preview)?,
        };
        table.normalize_column_names();
        Ok(table)
    }
}

/// Runs load strategies in priority order
pub struct TableLoader {
    strategies: Vec<Box<dyn LoadStrategy>>,
}

impl TableLoader {
    pub fn new(strategies: Vec<Box<dyn LoadStrategy>>) -> Self {
        Self { strategies }
    }

    /// Native loader first, then the normalizing loader
    pub fn standard(config: &AnalysisConfig) -> Self {
        Self::new(vec![
            Box::new(NativeLoader),
            Box::new(NormalizingLoader::new(config.sniff_sample_bytes)),
        ])
    }

    pub fn load(&self, path: &Path, format: FileFormat, preview: Option<&Preview>) -> Result<Table> {
        let mut failures: Vec<String> = Vec::new();

        for strategy in &self.strategies {
            match strategy.load(path, format, preview) {
                Ok(table) => {
                    info!(
                        strategy = strategy.name(),
                        shape = ?table.shape(),
                        "Table loaded"
                    );
                    return Ok(table);
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "Load strategy failed");
                    failures.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        if failures.is_empty() {
            return Err(AppError::LoadError("no load strategies configured".to_string()));
        }
        Err(AppError::LoadError(failures.join("; ")))
    }
}
