use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExperimentError {
    #[error("display region is not attached")]
    MissingDisplay,
    #[error("invalid experiment config: {0}")]
    InvalidConfig(String),
}
