// ============================================================
// FALLBACK DESCRIPTION
// ============================================================
// Deterministic dataset summary used when no AI answer is available

use std::collections::HashSet;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, ColumnProfile, Table};

pub const EMPTY_DATASET_MESSAGE: &str = "The dataset appears to be empty or has no valid columns.";

/// Distinct sample values shown for the first column
const SAMPLE_VALUES: usize = 5;
/// Columns inspected for per-column details
const PROFILED_COLUMNS: usize = 10;
/// Column descriptions kept in the final text
const REPORTED_COLUMNS: usize = 5;

/// Summarize a table without any external call. Never fails: an internal
/// error is reported as text.
pub fn generate_description(table: &Table) -> String {
    match describe_table(table) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Fallback description failed");
            format!("Error generating description: {}", e)
        }
    }
}

pub fn describe_table(table: &Table) -> Result<String> {
    let cleaned = table.drop_empty();
    if cleaned.is_empty() {
        return Ok(EMPTY_DATASET_MESSAGE.to_string());
    }

    let (rows, cols) = cleaned.shape();
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        "The dataset contains {} rows and {} columns.",
        rows, cols
    ));

    let first = cleaned
        .columns()
        .first()
        .ok_or_else(|| AppError::Internal("cleaned table has no columns".to_string()))?;
    let samples = distinct_samples(first.non_null(), SAMPLE_VALUES);
    parts.push(format!(
        "Sample values from '{}': {}.",
        first.name,
        samples.join(", ")
    ));

    let first_row = cleaned
        .row(0)
        .ok_or_else(|| AppError::Internal("cleaned table has no rows".to_string()))?;
    let fields: Vec<String> = first_row
        .iter()
        .map(|(name, value)| format!("{}: {}", name, render_value(value)))
        .collect();
    parts.push(format!("First row: {{{}}}.", fields.join(", ")));

    let mut details: Vec<String> = Vec::new();
    for column in cleaned.columns().iter().take(PROFILED_COLUMNS) {
        if let Some(profile) = ColumnProfile::compute(column)? {
            details.push(format!("{} ({})", column.name, profile));
        }
    }
    details.truncate(REPORTED_COLUMNS);
    if !details.is_empty() {
        parts.push(format!("Column details: {}.", details.join("; ")));
    }

    let with_missing = cleaned
        .columns()
        .iter()
        .filter(|c| c.null_count() > 0)
        .count();
    if with_missing > 0 {
        parts.push(format!("{} columns have missing values.", with_missing));
    }

    Ok(parts.join(" "))
}

fn distinct_samples<'a>(values: impl Iterator<Item = &'a CellValue>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if out.len() >= limit {
            break;
        }
        if seen.insert(value.distinct_key()) {
            out.push(value.to_string());
        }
    }
    out
}

fn render_value(value: &CellValue) -> String {
    match value {
        CellValue::Null => "None".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Column;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let rows: Vec<Vec<Option<String>>> = rows
            .iter()
            .map(|r| r.iter().map(|v| Some(v.to_string())).collect())
            .collect();
        Table::from_records(headers.iter().map(|h| h.to_string()).collect(), &rows).unwrap()
    }

    #[test]
    fn test_empty_table_message() {
        let t = table(&["a", "b"], &[&["", ""], &["NA", " "]]);
        assert_eq!(generate_description(&t), EMPTY_DATASET_MESSAGE);
        assert_eq!(generate_description(&Table::default()), EMPTY_DATASET_MESSAGE);
    }

    #[test]
    fn test_name_amount_summary() {
        let t = table(
            &["Name", "Amount"],
            &[&["Ana", "10"], &["Bo", "250"], &["Cy", "500"]],
        );
        let text = generate_description(&t);

        assert_eq!(
            text,
            "The dataset contains 3 rows and 2 columns. \
             Sample values from 'Name': Ana, Bo, Cy. \
             First row: {Name: Ana, Amount: 10}. \
             Column details: Name (text, 3 unique values); Amount (numeric, range 10-500)."
        );
    }

    #[test]
    fn test_numeric_range_min_max() {
        let t = table(&["n"], &[&["3"], &["7"], &["1"], &["9"]]);
        assert!(generate_description(&t).contains("n (numeric, range 1-9)"));
    }

    #[test]
    fn test_at_most_five_column_details() {
        let headers: Vec<String> = (0..8).map(|i| format!("c{}", i)).collect();
        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        let t = table(&header_refs, &[&["1", "2", "3", "4", "5", "6", "7", "8"]]);
        let text = generate_description(&t);

        assert!(text.contains("c4 (numeric"));
        assert!(!text.contains("c5 (numeric"));
        assert_eq!(text.matches("(numeric, range").count(), 5);
    }

    #[test]
    fn test_sample_values_distinct_and_bounded() {
        let t = table(
            &["k"],
            &[&["a"], &["a"], &["b"], &["c"], &["d"], &["e"], &["f"]],
        );
        assert!(generate_description(&t).contains("Sample values from 'k': a, b, c, d, e."));
    }

    #[test]
    fn test_missing_values_counted_and_empty_parts_dropped() {
        let t = table(
            &["city", "pop", "blank"],
            &[&["Oslo", "", ""], &["", "", ""], &["Rome", "3", ""]],
        );
        let text = generate_description(&t);

        assert!(text.starts_with("The dataset contains 2 rows and 2 columns."));
        assert!(text.contains("First row: {city: Oslo, pop: None}."));
        assert!(text.ends_with("1 columns have missing values."));
        assert!(!text.contains("blank"));
    }

    #[test]
    fn test_boolean_and_dates() {
        let t = table(
            &["flag", "when"],
            &[&["true", "2024-01-31"], &["false", "2023-06-01"]],
        );
        let text = generate_description(&t);
        assert!(!text.contains("flag ("));
        assert!(text.contains("when (date, range 2023-06-01 to 2024-01-31)"));
    }

    #[test]
    fn test_internal_failure_is_reported_as_text() {
        let broken = Column {
            name: "x".to_string(),
            dtype: crate::domain::table::ColumnType::DateTime,
            values: vec![CellValue::Int(1)],
        };
        let t = Table::new(vec![broken]).unwrap();
        assert!(generate_description(&t).starts_with("Error generating description:"));
    }
}
