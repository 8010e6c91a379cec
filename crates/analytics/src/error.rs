use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Input shape mismatch: {predicted} predicted labels but {actual} actual labels")]
    InputShapeMismatch { predicted: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
