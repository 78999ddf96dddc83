use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell::{parse_bool, parse_datetime, parse_number, CellValue};

/// Uniform type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    Numeric,
    DateTime,
    Boolean,
    /// Spreadsheet column whose cells carry different native types
    Mixed,
}

impl ColumnType {
    /// Infer the type of already-typed cells (spreadsheet path).
    /// A column with no values is numeric, like an all-missing float column.
    pub fn infer(values: &[CellValue]) -> Self {
        let mut seen: Option<ColumnType> = None;
        for value in values {
            let kind = match value {
                CellValue::Null => continue,
                CellValue::Int(_) | CellValue::Float(_) => ColumnType::Numeric,
                CellValue::Bool(_) => ColumnType::Boolean,
                CellValue::Text(_) => ColumnType::Text,
                CellValue::DateTime(_) => ColumnType::DateTime,
            };
            match seen {
                None => seen = Some(kind),
                Some(prev) if prev != kind => return ColumnType::Mixed,
                Some(_) => {}
            }
        }
        seen.unwrap_or(ColumnType::Numeric)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::DateTime => write!(f, "datetime"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Mixed => write!(f, "mixed"),
        }
    }
}

/// A named, uniformly typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column from raw delimited-text tokens.
    ///
    /// The whole column must parse as numbers, booleans or date-times to take
    /// that type; otherwise every value is kept as text.
    pub fn from_text(name: impl Into<String>, raw: &[Option<String>]) -> Self {
        let name = name.into();
        let parsers: [(ColumnType, fn(&str) -> Option<CellValue>); 3] = [
            (ColumnType::Numeric, parse_number),
            (ColumnType::Boolean, parse_bool),
            (ColumnType::DateTime, parse_datetime),
        ];

        for (dtype, parser) in parsers {
            if let Some(values) = parse_all(raw, parser) {
                return Self { name, dtype, values };
            }
        }

        let values = raw
            .iter()
            .map(|token| match token {
                Some(t) => CellValue::text(t),
                None => CellValue::Null,
            })
            .collect();
        Self {
            name,
            dtype: ColumnType::Text,
            values,
        }
    }

    /// Build a column from natively typed cells (spreadsheet path)
    pub fn from_cells(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let dtype = ColumnType::infer(&values);
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    pub fn is_all_null(&self) -> bool {
        self.values.iter().all(CellValue::is_null)
    }

    pub fn non_null(&self) -> impl Iterator<Item = &CellValue> {
        self.values.iter().filter(|v| !v.is_null())
    }
}

fn parse_all(raw: &[Option<String>], parser: fn(&str) -> Option<CellValue>) -> Option<Vec<CellValue>> {
    raw.iter()
        .map(|token| match token {
            Some(t) if !super::cell::is_missing(t) => parser(t),
            _ => Some(CellValue::Null),
        })
        .collect()
}
