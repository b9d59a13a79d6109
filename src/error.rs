use thiserror::Error;

/// Every failure the calculator can surface to the user.
///
/// Each variant maps to a process exit code via [`AppError::exit_code`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// User-supplied input is unusable (e.g. end date before start date).
    #[error("{0}")]
    InputValidation(String),
    /// The HTTP call failed (network, timeout, non-success status).
    #[error("Fetch failed: {0}")]
    Fetch(String),
    /// The response did not have the expected header/data shape.
    #[error("Unexpected data format: {0}")]
    DataFormat(String),
    /// An expected column is missing from the data table.
    #[error("Missing columns: {0}")]
    Schema(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Io(String),
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::InputValidation(_) | AppError::Config(_) | AppError::Io(_) => 2,
            AppError::DataFormat(_) | AppError::Schema(_) => 3,
            AppError::Fetch(_) | AppError::Terminal(_) => 4,
        }
    }
}
