// ============================================================
// FORMAT SNIFFER
// ============================================================
// Probe encodings, delimiters and header rows to find a working parse

use std::path::Path;

use calamine::{Data, Range};
use encoding_rs::UTF_8;
use tracing::{debug, info};

use crate::domain::analysis_config::AnalysisConfig;
use crate::domain::sniff::{FileFormat, ParseCandidate, Preview, SniffError};
use crate::domain::table::Table;
use crate::infrastructure::csv::encoding::{
    candidate_encodings, decode_lossy, decode_strict, preview_window,
};
use crate::infrastructure::csv::{CsvParser, RaggedRows, DELIMITER_CANDIDATES};
use crate::infrastructure::spreadsheet::{range_to_table, Workbook};

/// Header positions tried on the first sheet, in order
pub const HEADER_ROW_CANDIDATES: [Option<usize>; 4] = [Some(0), Some(1), Some(2), None];

/// Produces a small preview of a file and the parameters that parsed it
#[derive(Debug, Clone)]
pub struct FormatSniffer {
    preview_rows: usize,
    sample_bytes: usize,
}

impl FormatSniffer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            preview_rows: config.preview_rows,
            sample_bytes: config.sniff_sample_bytes,
        }
    }

    pub fn sniff(&self, path: &Path, format: FileFormat) -> Result<Preview, SniffError> {
        match format {
            FileFormat::Delimited => {
                let bytes = std::fs::read(path).map_err(|e| read_failure(path, e))?;
                self.sniff_delimited(&bytes)
            }
            FileFormat::Spreadsheet => {
                let mut workbook = Workbook::open(path).map_err(|e| read_failure(path, e))?;
                let sheet_names = workbook.sheet_names();
                info!(path = %path.display(), sheets = ?sheet_names, "Workbook sheets");
                let range = workbook.first_sheet().map_err(|e| read_failure(path, e))?;
                self.sniff_sheet(&range, sheet_names)
            }
        }
    }

    /// Try every (encoding, delimiter) pair, then the sample heuristic.
    /// Encodings are judged on the preview lines only, so a stray byte
    /// further down does not change how the whole file is decoded.
    pub fn sniff_delimited(&self, bytes: &[u8]) -> Result<Preview, SniffError> {
        let mut failures = SniffError::default();
        let window = preview_window(bytes, self.preview_rows + 1);

        for encoding in candidate_encodings() {
            let content = match decode_strict(window, encoding) {
                Ok(content) => content,
                Err(e) => {
                    debug!(encoding = encoding.name(), error = %e, "Encoding rejected");
                    failures.reject(format!("encoding={}", encoding.name()), e);
                    continue;
                }
            };

            for delimiter in DELIMITER_CANDIDATES {
                let candidate = ParseCandidate::Delimited {
                    encoding: encoding.name(),
                    delimiter,
                };
                let parsed = CsvParser::new()
                    .with_delimiter(delimiter)
                    .with_max_rows(self.preview_rows)
                    .with_ragged_rows(RaggedRows::PadShort)
                    .parse_content(&content);

                match parsed {
                    Ok(table) if table.column_count() > 1 => {
                        return Ok(accept(candidate, table, Vec::new()));
                    }
                    Ok(table) => {
                        failures.reject(candidate, format!("{} column(s)", table.column_count()))
                    }
                    Err(e) => failures.reject(candidate, e),
                }
            }
        }

        match self.sniff_by_sample(bytes) {
            Ok(preview) => Ok(preview),
            Err(reason) => {
                failures.reject("leading-sample heuristic", reason);
                debug!(rejected = failures.rejected.len(), "Delimited sniffing failed");
                Err(failures)
            }
        }
    }

    /// Guess the delimiter from the leading bytes and re-parse leniently
    fn sniff_by_sample(&self, bytes: &[u8]) -> Result<Preview, String> {
        let sample = &bytes[..bytes.len().min(self.sample_bytes)];
        let delimiter = CsvParser::detect_delimiter(&decode_lossy(sample, UTF_8));
        let content = decode_lossy(bytes, UTF_8);

        let table = CsvParser::new()
            .with_delimiter(delimiter)
            .with_max_rows(self.preview_rows)
            .with_ragged_rows(RaggedRows::SkipLong)
            .parse_content(&content)
            .map_err(|e| e.to_string())?;

        if table.column_count() == 0 {
            return Err("no columns".to_string());
        }

        let candidate = ParseCandidate::Delimited {
            encoding: UTF_8.name(),
            delimiter,
        };
        Ok(accept(candidate, table, Vec::new()))
    }

    /// Try header rows 0, 1, 2 and "none" on a sheet
    pub fn sniff_sheet(
        &self,
        range: &Range<Data>,
        sheet_names: Vec<String>,
    ) -> Result<Preview, SniffError> {
        let mut failures = SniffError::default();

        for header_row in HEADER_ROW_CANDIDATES {
            let candidate = ParseCandidate::Sheet { header_row };
            match range_to_table(range, header_row, Some(self.preview_rows)) {
                Ok(table) if table.is_empty() => failures.reject(candidate, "empty preview"),
                Ok(table) if table.has_only_auto_labels() => {
                    failures.reject(candidate, "only auto-generated column labels")
                }
                Ok(table) => return Ok(accept(candidate, table, sheet_names)),
                Err(e) => failures.reject(candidate, e),
            }
        }

        Err(failures)
    }
}

fn accept(candidate: ParseCandidate, table: Table, sheet_names: Vec<String>) -> Preview {
    let dtypes: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("{}: {}", c.name, c.dtype))
        .collect();
    info!(
        %candidate,
        shape = ?table.shape(),
        columns = ?dtypes,
        "Sniffed preview"
    );
    Preview {
        candidate,
        table,
        sheet_names,
    }
}

fn read_failure(path: &Path, err: impl std::fmt::Display) -> SniffError {
    let mut failures = SniffError::default();
    failures.reject(path.display(), err);
    failures
}
