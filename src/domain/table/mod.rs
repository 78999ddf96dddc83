// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Uniform in-memory representation of a loaded dataset
// No I/O, no async

mod cell;
mod column;
mod frame;
mod profile;

pub use cell::{format_datetime, format_number, is_missing, CellValue, NA_TOKENS};
pub use column::{Column, ColumnType};
pub use frame::{normalize_column_name, unique_column_names, Table, AUTO_LABEL_PREFIX};
pub use profile::ColumnProfile;
