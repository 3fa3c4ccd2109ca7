//! Workbook reader (xlsx, xls, xlsb, ods). Only the first sheet is used.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use panelfinder_core::FieldValue;
use tracing::debug;

use crate::StoreError;
use crate::sheet::Table;

pub(crate) fn read(path: &Path) -> Result<Table, StoreError> {
    let mut workbook = open_workbook_auto(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| StoreError::NoSheets(path.to_path_buf()))?;
    let range = workbook.worksheet_range(&first)?;
    debug!(sheet = %first, size = ?range.get_size(), "reading worksheet");

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(header_text).collect())
        .unwrap_or_default();
    let rows = rows.map(|row| row.iter().map(cell_value).collect()).collect();
    Ok(Table { headers, rows })
}

fn header_text(cell: &Data) -> String {
    cell_value(cell).map(|v| v.to_string()).unwrap_or_default()
}

/// Dates stay as their Excel serial number.
fn cell_value(cell: &Data) -> Option<FieldValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            Some(FieldValue::Text(s.clone()))
        }
        Data::Float(n) => Some(FieldValue::Number(*n)),
        Data::Int(n) => Some(FieldValue::Number(*n as f64)),
        Data::Bool(b) => Some(FieldValue::Text(b.to_string())),
        Data::DateTime(dt) => Some(FieldValue::Number(dt.as_f64())),
        Data::Error(e) => Some(FieldValue::Text(e.to_string())),
    }
}
