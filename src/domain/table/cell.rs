// ============================================================
// CELL VALUES
// ============================================================
// A single nullable value and the text parsers used for inference

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::fmt;

/// Raw tokens treated as missing, matching the usual dataframe defaults
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// One cell of a [`super::Table`]
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Text cell, or `Null` when the raw token is blank or an NA marker
    pub fn text(raw: &str) -> Self {
        if is_missing(raw) {
            CellValue::Null
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    /// Key used for distinct-value counting
    pub fn distinct_key(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Float(f) => format!("f:{}", f.to_bits()),
            other => format!("{:?}", other),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", format_number(*v)),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::DateTime(dt) => write!(f, "{}", format_datetime(dt)),
        }
    }
}

pub fn is_missing(raw: &str) -> bool {
    NA_TOKENS.contains(&raw.trim())
}

/// Print integral floats without a fractional part
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Dates at midnight are printed without the time component
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

pub fn parse_number(raw: &str) -> Option<CellValue> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(CellValue::Int(i));
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(CellValue::Float(f)),
        _ => None,
    }
}

pub fn parse_bool(raw: &str) -> Option<CellValue> {
    match raw.trim() {
        "true" | "True" | "TRUE" => Some(CellValue::Bool(true)),
        "false" | "False" | "FALSE" => Some(CellValue::Bool(false)),
        _ => None,
    }
}

pub fn parse_datetime(raw: &str) -> Option<CellValue> {
    let trimmed = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(CellValue::DateTime(dt));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0).map(CellValue::DateTime);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_na_tokens_are_missing() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("NaN"));
        assert!(is_missing("N/A"));
        assert!(!is_missing("0"));
        assert!(!is_missing("none"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42 "), Some(CellValue::Int(42)));
        assert_eq!(parse_number("3.5"), Some(CellValue::Float(3.5)));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("12a"), None);
    }

    #[test]
    fn test_parse_datetime_formats() {
        let date = parse_datetime("2024-03-01").unwrap();
        assert_eq!(date.to_string(), "2024-03-01");
        let stamp = parse_datetime("2024-03-01T10:15:00").unwrap();
        assert_eq!(stamp.to_string(), "2024-03-01 10:15:00");
        assert!(parse_datetime("March 1st").is_none());
    }

    #[test]
    fn test_format_number_drops_integral_fraction() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
