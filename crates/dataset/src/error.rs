use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read or filter the dataset: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid record: {0}")]
    Core(#[from] core_types::CoreError),

    #[error("Row {row} has no value in column '{column}'")]
    MissingValue { column: &'static str, row: usize },

    #[error("Invalid split: {0}")]
    InvalidSplit(String),
}
