use std::collections::HashSet;

use super::cell::CellValue;
use super::column::Column;
use crate::domain::error::{AppError, Result};

/// Prefix given to columns whose header cell is blank
pub const AUTO_LABEL_PREFIX: &str = "Unnamed: ";

/// In-memory table: equal-length columns with unique names
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, enforcing equal column lengths and unique names
    pub fn new(mut columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(AppError::Internal(format!(
                    "column '{}' has {} values, expected {}",
                    bad.name,
                    bad.len(),
                    expected
                )));
            }
        }

        let names = unique_column_names(columns.iter().map(|c| c.name.clone()).collect());
        for (column, name) in columns.iter_mut().zip(names) {
            column.name = name;
        }

        Ok(Self { columns })
    }

    /// Build a text-inferred table from a header and raw rows.
    /// Rows must already be padded or truncated to the header width.
    pub fn from_records(headers: Vec<String>, rows: &[Vec<Option<String>>]) -> Result<Self> {
        let mut columns = Vec::with_capacity(headers.len());
        for (idx, header) in headers.into_iter().enumerate() {
            let raw: Vec<Option<String>> = rows
                .iter()
                .map(|row| row.get(idx).cloned().flatten())
                .collect();
            columns.push(Column::from_text(header, &raw));
        }
        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.column_count() == 0
    }

    /// Values of one row as `(column name, value)` pairs
    pub fn row(&self, index: usize) -> Option<Vec<(&str, &CellValue)>> {
        if index >= self.row_count() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.as_str(), &c.values[index]))
                .collect(),
        )
    }

    /// Copy without rows whose values are all missing and without
    /// columns whose values are all missing
    pub fn drop_empty(&self) -> Table {
        let keep_rows: Vec<usize> = (0..self.row_count())
            .filter(|&i| self.columns.iter().any(|c| !c.values[i].is_null()))
            .collect();

        let columns = self
            .columns
            .iter()
            .filter(|c| !c.is_all_null())
            .map(|c| Column {
                name: c.name.clone(),
                dtype: c.dtype,
                values: keep_rows.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();

        Table { columns }
    }

    /// Trim names and replace embedded line breaks with spaces
    pub fn normalize_column_names(&mut self) {
        let names = self
            .columns
            .iter()
            .map(|c| normalize_column_name(&c.name))
            .collect();
        for (column, name) in self.columns.iter_mut().zip(unique_column_names(names)) {
            column.name = name;
        }
    }

    /// True when every column label was generated for a blank header cell
    pub fn has_only_auto_labels(&self) -> bool {
        !self.columns.is_empty()
            && self
                .columns
                .iter()
                .all(|c| c.name.starts_with(AUTO_LABEL_PREFIX))
    }
}

pub fn normalize_column_name(name: &str) -> String {
    name.trim().replace(['\n', '\r'], " ")
}

/// Blank names become `Unnamed: <index>`, repeats get `.1`, `.2`, ...
pub fn unique_column_names(names: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for (idx, name) in names.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("{}{}", AUTO_LABEL_PREFIX, idx)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while used.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::ColumnType;

    fn row(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_from_records_infers_types() {
        let table = Table::from_records(
            vec!["Name".to_string(), "Amount".to_string()],
            &[row(&["a", "10"]), row(&["b", "500"])],
        )
        .unwrap();

        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.column("Amount").unwrap().dtype, ColumnType::Numeric);
        assert_eq!(table.column("Name").unwrap().dtype, ColumnType::Text);
    }

    #[test]
    fn test_unequal_columns_rejected() {
        let a = Column::from_text("a", &row(&["1", "2"]));
        let b = Column::from_text("b", &row(&["1"]));
        assert!(Table::new(vec![a, b]).is_err());
    }

    #[test]
    fn test_unique_column_names() {
        let names = unique_column_names(vec![
            "id".to_string(),
            "".to_string(),
            "id".to_string(),
            "id".to_string(),
        ]);
        assert_eq!(names, vec!["id", "Unnamed: 1", "id.1", "id.2"]);
    }

    #[test]
    fn test_normalize_column_names() {
        let mut table = Table::from_records(
            vec!["  Total\nSales ".to_string(), "Region\r\n".to_string()],
            &[row(&["1", "north"])],
        )
        .unwrap();
        table.normalize_column_names();
        assert_eq!(table.column_names(), vec!["Total Sales", "Region"]);
    }

    #[test]
    fn test_drop_empty_rows_and_columns() {
        let table = Table::from_records(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            &[row(&["1", "", ""]), row(&["", "", ""]), row(&["3", "x", ""])],
        )
        .unwrap();

        let cleaned = table.drop_empty();
        assert_eq!(cleaned.shape(), (2, 2));
        assert_eq!(cleaned.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_auto_labels() {
        let table = Table::from_records(vec!["".to_string(), " ".to_string()], &[row(&["1", "2"])])
            .unwrap();
        assert!(table.has_only_auto_labels());
    }
}
