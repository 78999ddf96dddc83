use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::fmt;

use super::cell::{format_datetime, format_number, CellValue};
use super::column::{Column, ColumnType};
use crate::domain::error::{AppError, Result};

/// Derived per-column statistics; computed on demand, never stored
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnProfile {
    Text { unique: usize },
    Numeric { range: Option<(f64, f64)> },
    DateTime { range: Option<(NaiveDateTime, NaiveDateTime)> },
}

impl ColumnProfile {
    /// Profile a column. Boolean and mixed columns have no profile.
    ///
    /// Fails when a cell contradicts the column's declared type.
    pub fn compute(column: &Column) -> Result<Option<Self>> {
        let profile = match column.dtype {
            ColumnType::Text => {
                let unique: HashSet<String> =
                    column.non_null().map(CellValue::distinct_key).collect();
                ColumnProfile::Text {
                    unique: unique.len(),
                }
            }
            ColumnType::Numeric => {
                let mut range: Option<(f64, f64)> = None;
                for value in column.non_null() {
                    let v = value.as_f64().ok_or_else(|| type_mismatch(column, value))?;
                    range = Some(match range {
                        None => (v, v),
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    });
                }
                ColumnProfile::Numeric { range }
            }
            ColumnType::DateTime => {
                let mut range: Option<(NaiveDateTime, NaiveDateTime)> = None;
                for value in column.non_null() {
                    let v = value
                        .as_datetime()
                        .ok_or_else(|| type_mismatch(column, value))?;
                    range = Some(match range {
                        None => (v, v),
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    });
                }
                ColumnProfile::DateTime { range }
            }
            ColumnType::Boolean | ColumnType::Mixed => return Ok(None),
        };
        Ok(Some(profile))
    }
}

impl fmt::Display for ColumnProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnProfile::Text { unique } => write!(f, "text, {} unique values", unique),
            ColumnProfile::Numeric { range: Some((lo, hi)) } => write!(
                f,
                "numeric, range {}-{}",
                format_number(*lo),
                format_number(*hi)
            ),
            ColumnProfile::Numeric { range: None } => write!(f, "numeric, range N/A"),
            ColumnProfile::DateTime { range: Some((lo, hi)) } => write!(
                f,
                "date, range {} to {}",
                format_datetime(lo),
                format_datetime(hi)
            ),
            ColumnProfile::DateTime { range: None } => write!(f, "date, range N/A"),
        }
    }
}

fn type_mismatch(column: &Column, value: &CellValue) -> AppError {
    AppError::Internal(format!(
        "column '{}' is typed {} but holds {:?}",
        column.name, column.dtype, value
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_range() {
        let col = Column::from_cells(
            "n",
            vec![
                CellValue::Int(3),
                CellValue::Int(7),
                CellValue::Int(1),
                CellValue::Int(9),
            ],
        );
        let profile = ColumnProfile::compute(&col).unwrap().unwrap();
        assert_eq!(profile, ColumnProfile::Numeric { range: Some((1.0, 9.0)) });
        assert_eq!(profile.to_string(), "numeric, range 1-9");
    }

    #[test]
    fn test_numeric_without_values_is_na() {
        let col = Column::from_cells("n", vec![CellValue::Null, CellValue::Null]);
        let profile = ColumnProfile::compute(&col).unwrap().unwrap();
        assert_eq!(profile.to_string(), "numeric, range N/A");
    }

    #[test]
    fn test_text_unique_count() {
        let col = Column::from_text(
            "t",
            &[
                Some("a".to_string()),
                Some("b".to_string()),
                Some("a".to_string()),
                None,
            ],
        );
        let profile = ColumnProfile::compute(&col).unwrap().unwrap();
        assert_eq!(profile, ColumnProfile::Text { unique: 2 });
    }

    #[test]
    fn test_boolean_has_no_profile() {
        let col = Column::from_cells("b", vec![CellValue::Bool(true)]);
        assert!(ColumnProfile::compute(&col).unwrap().is_none());
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let col = Column {
            name: "broken".to_string(),
            dtype: ColumnType::Numeric,
            values: vec![CellValue::Text("x".to_string())],
        };
        assert!(ColumnProfile::compute(&col).is_err());
    }
}
