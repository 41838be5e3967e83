//! fp-report: result selection and tabular export.
//!
//! Three pieces:
//! - `select`: gather result values for an ordered element selection by
//!   internal sequential index
//! - `export`: the envelope CSV writer (`ID_E,PARTS_E,<component>,LoadCase`)
//! - `report`: multi-component force tables over arbitrary case selections

pub mod export;
pub mod report;
pub mod select;

pub use export::{EnvelopeRow, envelope_rows, export_envelope_csv};
pub use report::{Report, ReportManifest, ReportRow, ReportSpec};
pub use select::select;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("Mismatched column lengths: {what}")]
    ColumnMismatch { what: &'static str },

    #[error("Report selects no elements")]
    EmptySelection,

    #[error("Report selects no load cases")]
    EmptyCases,

    #[error("Report selects no components")]
    EmptyComponents,

    #[error("Unknown element: {0}")]
    UnknownElement(fp_core::ElementId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Model(#[from] fp_model::ModelError),

    #[error(transparent)]
    Core(#[from] fp_core::CoreError),
}
