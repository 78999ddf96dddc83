// ============================================================
// CSV PARSER
// ============================================================
// Parse delimited text into a Table with configurable row tolerance

use csv::ReaderBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;

/// Delimiters tried while sniffing, in priority order
pub const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// What to do with a data row whose width differs from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaggedRows {
    /// Any width mismatch is an error
    Reject,
    /// Short rows are padded with nulls; long rows are an error
    PadShort,
    /// Short rows are padded; long rows are dropped
    SkipLong,
}

/// CSV parser producing [`Table`]s
#[derive(Debug, Clone)]
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Maximum number of data rows to read, `None` for all
    max_rows: Option<usize>,

    /// Width mismatch handling
    ragged: RaggedRows,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            max_rows: None,
            ragged: RaggedRows::PadShort,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Stop after `max_rows` data rows
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_ragged_rows(mut self, ragged: RaggedRows) -> Self {
        self.ragged = ragged;
        self
    }

    /// Parse decoded CSV content. The first non-blank record is the header.
    pub fn parse_content(&self, content: &str) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let headers: Vec<String> = loop {
            match records.next() {
                Some(record) => {
                    let record = record.map_err(|e| {
                        AppError::ParseError(format!("Failed to read CSV headers: {}", e))
                    })?;
                    if !is_blank_record(&record) {
                        break record.iter().map(|s| s.to_string()).collect();
                    }
                }
                None => return Err(AppError::ParseError("CSV content is empty".to_string())),
            }
        };
        let width = headers.len();

        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        let mut line = 1usize;

        for result in records {
            if self.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }
            line += 1;

            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", line, e))
            })?;
            if is_blank_record(&record) {
                continue;
            }

            if record.len() != width {
                match self.ragged {
                    RaggedRows::Reject => {
                        return Err(AppError::ParseError(format!(
                            "Row {} has {} fields, expected {}",
                            line,
                            record.len(),
                            width
                        )));
                    }
                    RaggedRows::PadShort if record.len() > width => {
                        return Err(AppError::ParseError(format!(
                            "Row {} has {} fields, header has {}",
                            line,
                            record.len(),
                            width
                        )));
                    }
                    RaggedRows::SkipLong if record.len() > width => {
                        tracing::warn!(
                            line,
                            fields = record.len(),
                            expected = width,
                            "Skipping over-long CSV row"
                        );
                        continue;
                    }
                    _ => {}
                }
            }

            let mut row: Vec<Option<String>> = record.iter().map(|s| Some(s.to_string())).collect();
            row.resize(width, None);
            rows.push(row);
        }

        Table::from_records(headers, &rows)
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let sample_lines: Vec<_> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(10)
            .collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &DELIMITER_CANDIDATES {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

fn is_blank_record(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}
