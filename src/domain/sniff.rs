use std::fmt;
use std::path::Path;

use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;

/// Container family of an input file, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Delimited,
    Spreadsheet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = file_extension(path);
        match ext.as_str() {
            "csv" | "tsv" | "txt" => Ok(FileFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileFormat::Spreadsheet),
            "" => Err(AppError::UnsupportedFormat(format!(
                "'{}' has no file extension",
                path.display()
            ))),
            other => Err(AppError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Delimited => write!(f, "delimited text"),
            FileFormat::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

/// Lower-cased extension, empty when there is none
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// One parsing hypothesis tried while sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseCandidate {
    /// `encoding` is an `encoding_rs` canonical name
    Delimited {
        encoding: &'static str,
        delimiter: u8,
    },
    /// `None` reads the sheet without a header row
    Sheet { header_row: Option<usize> },
}

impl fmt::Display for ParseCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCandidate::Delimited {
                encoding,
                delimiter,
            } => write!(
                f,
                "encoding={} delimiter={}",
                encoding,
                describe_delimiter(*delimiter)
            ),
            ParseCandidate::Sheet {
                header_row: Some(row),
            } => write!(f, "header_row={}", row),
            ParseCandidate::Sheet { header_row: None } => write!(f, "no header row"),
        }
    }
}

pub fn describe_delimiter(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "tab".to_string(),
        b',' => "comma".to_string(),
        b';' => "semicolon".to_string(),
        b'|' => "pipe".to_string(),
        other => format!("{:?}", other as char),
    }
}

/// Winning sniff: the candidate that parsed and the preview it produced
#[derive(Debug, Clone)]
pub struct Preview {
    pub candidate: ParseCandidate,
    pub table: Table,
    /// Workbook sheet names; empty for delimited text
    pub sheet_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RejectedCandidate {
    pub candidate: String,
    pub reason: String,
}

/// No candidate produced an acceptable preview. Not fatal.
#[derive(Debug, Clone, Default)]
pub struct SniffError {
    pub rejected: Vec<RejectedCandidate>,
}

impl SniffError {
    pub fn reject(&mut self, candidate: impl ToString, reason: impl ToString) {
        self.rejected.push(RejectedCandidate {
            candidate: candidate.to_string(),
            reason: reason.to_string(),
        });
    }
}

impl fmt::Display for SniffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no parsing candidate succeeded ({} rejected)",
            self.rejected.len()
        )?;
        if let Some(last) = self.rejected.last() {
            write!(f, "; last: {} ({})", last.candidate, last.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for SniffError {}
