use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("spreadsheet not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported spreadsheet format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("no solar_panels.csv or solar_panels.xlsx in {0}")]
    NoDefaultSpreadsheet(PathBuf),

    #[error("workbook has no sheets: {0}")]
    NoSheets(PathBuf),

    #[error("no Address column in header row")]
    MissingAddressColumn,

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),
}
