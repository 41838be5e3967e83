//! Error types for the fp-app service layer.

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for both CLI and GUI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Model error: {0}")]
    Model(String),

    #[error("Combination error: {0}")]
    Combine(String),

    #[error("Formula error: {0}")]
    Formula(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Job error: {0}")]
    Job(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fp-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<fp_model::ModelError> for AppError {
    fn from(err: fp_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<fp_combine::CombineError> for AppError {
    fn from(err: fp_combine::CombineError) -> Self {
        AppError::Combine(err.to_string())
    }
}

impl From<fp_formula::FormulaError> for AppError {
    fn from(err: fp_formula::FormulaError) -> Self {
        AppError::Formula(err.to_string())
    }
}

impl From<fp_report::ReportError> for AppError {
    fn from(err: fp_report::ReportError) -> Self {
        AppError::Report(err.to_string())
    }
}

impl From<fp_job::JobError> for AppError {
    fn from(err: fp_job::JobError) -> Self {
        AppError::Job(err.to_string())
    }
}

impl From<fp_core::CoreError> for AppError {
    fn from(err: fp_core::CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
