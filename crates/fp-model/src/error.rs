//! Error types for the engine boundary.

use std::path::PathBuf;

use fp_core::LcId;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model file: {path}")]
    ModelFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read result file: {path}")]
    ResultFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported model file {path}: {message}")]
    Unsupported { path: PathBuf, message: String },

    #[error("Result file {path} is incompatible with the loaded mesh: {message}")]
    Incompatible { path: PathBuf, message: String },

    #[error("Unknown load case: {id}")]
    UnknownLoadCase { id: LcId },

    #[error("Load case {case} has no frame {frame}")]
    UnknownFrame { case: LcId, frame: u32 },

    #[error("No `{quantity}` results for load case {case}")]
    UnknownQuantity { case: LcId, quantity: String },

    #[error("Result `{quantity}` has no component `{component}`")]
    UnknownComponent {
        quantity: String,
        component: String,
    },

    #[error("Rejected formula `{formula}`: {message}")]
    Formula { formula: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] fp_core::CoreError),
}
