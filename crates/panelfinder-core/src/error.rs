use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("solar panel data is not loaded yet")]
    DatasetNotLoaded,

    #[error("no address selected")]
    NoActiveRecord,
}
