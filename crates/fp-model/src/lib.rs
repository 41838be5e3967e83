//! fp-model: the boundary to the FE post-processing engine.
//!
//! Provides:
//! - Load case, element and result-set data types
//! - `FeBackend`/`FeModel` traits isolating the rest of fepost from any
//!   particular engine
//! - An in-memory reference backend over a JSON interchange format, used by
//!   the example applications and the test suites
//!
//! # Architecture
//!
//! This crate defines a stable API (the `FeModel` trait) so that orchestration
//! code never sees engine internals. Mesh parsing, result storage and the
//! derived/envelope computation machinery all live behind the trait; a
//! solver-grade backend (Nastran .bdf/.op2 readers and friends) plugs in the
//! same way the bundled in-memory backend does.

pub mod error;
pub mod file;
pub mod memory;
pub mod model;
pub mod types;

// Re-exports for ergonomics
pub use error::{ModelError, ModelResult};
pub use file::{ElementDef, LoadCaseDef, ModelFile, ResultBlockDef, ResultFile};
pub use memory::{MemBackend, MemModel};
pub use model::{FeBackend, FeModel};
pub use types::{
    Criterion, Element, EnvelopeGroup, LcKind, LoadCaseInfo, LoadOptions, ModelSummary,
    ResultAxes, ResultRequest, ResultSet,
};
