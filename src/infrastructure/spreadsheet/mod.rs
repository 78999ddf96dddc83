// ============================================================
// SPREADSHEET INFRASTRUCTURE LAYER
// ============================================================
// Workbook access and sheet-to-Table conversion via calamine

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader, Sheets};

use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Column, Table};

/// An open workbook of any format calamine understands
pub struct Workbook {
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self> {
        let sheets = open_workbook_auto(path).map_err(|e| {
            AppError::ParseError(format!("Failed to open spreadsheet {}: {}", path.display(), e))
        })?;
        Ok(Self { sheets })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Cell range of the first worksheet
    pub fn first_sheet(&mut self) -> Result<Range<Data>> {
        self.sheets
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
            .map_err(|e| AppError::ParseError(format!("Failed to read worksheet: {}", e)))
    }
}

/// Convert a calamine cell into a [`CellValue`]
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::text(s),
        other => match other.as_datetime() {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::text(&other.to_string()),
        },
    }
}

/// Build a table from a sheet range.
///
/// `header_row` is relative to the first row of the range; rows above it
/// are discarded. Without a header row, columns are named by position.
pub fn range_to_table(
    range: &Range<Data>,
    header_row: Option<usize>,
    max_rows: Option<usize>,
) -> Result<Table> {
    let rows: Vec<&[Data]> = range.rows().collect();
    let width = range.width();

    let (headers, body): (Vec<String>, &[&[Data]]) = match header_row {
        Some(index) => {
            let header = rows.get(index).ok_or_else(|| {
                AppError::ParseError(format!(
                    "Header row {} is past the end of the sheet ({} rows)",
                    index,
                    rows.len()
                ))
            })?;
            let names = (0..width)
                .map(|i| header.get(i).map(cell_value).unwrap_or(CellValue::Null).to_string())
                .collect();
            (names, &rows[index + 1..])
        }
        None => ((0..width).map(|i| i.to_string()).collect(), &rows[..]),
    };

    let limit = max_rows.unwrap_or(usize::MAX);
    let body: Vec<&[Data]> = body.iter().take(limit).copied().collect();

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let values = body
                .iter()
                .map(|row| row.get(i).map(cell_value).unwrap_or(CellValue::Null))
                .collect();
            Column::from_cells(name, values)
        })
        .collect();

    Table::new(columns)
}
