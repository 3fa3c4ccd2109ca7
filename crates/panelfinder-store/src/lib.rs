//! Spreadsheet ingestion: CSV and Excel workbooks into a [`Dataset`].

mod delimited;
mod error;
mod sheet;
mod workbook;

use std::path::{Path, PathBuf};

use panelfinder_core::Dataset;
use tracing::{debug, info, warn};

pub use error::StoreError;

/// Files tried by [`load_default`], in order.
pub const DEFAULT_FILES: [&str; 2] = ["solar_panels.csv", "solar_panels.xlsx"];

/// Load the address dataset from a `.csv` file or an Excel/ODS workbook.
pub fn load_dataset(path: &Path) -> Result<Dataset, StoreError> {
    if !path.is_file() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let table = match ext.as_str() {
        "csv" | "tsv" | "txt" => delimited::read(path)?,
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => workbook::read(path)?,
        _ => return Err(StoreError::UnsupportedFormat(path.to_path_buf())),
    };

    let dataset = sheet::dataset_from_table(&table)?;
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        addresses = dataset.len(),
        "loaded solar panel data"
    );
    Ok(dataset)
}

/// Load the first of [`DEFAULT_FILES`] in `dir` that reads successfully.
pub fn load_default(dir: &Path) -> Result<(PathBuf, Dataset), StoreError> {
    for name in DEFAULT_FILES {
        let path = dir.join(name);
        match load_dataset(&path) {
            Ok(dataset) => return Ok((path, dataset)),
            Err(StoreError::NotFound(_)) => debug!(path = %path.display(), "not present"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load"),
        }
    }
    Err(StoreError::NoDefaultSpreadsheet(dir.to_path_buf()))
}
