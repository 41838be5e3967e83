//! Engine boundary traits.

use std::path::Path;
use std::path::PathBuf;

use fp_core::LcId;
use fp_formula::Formula;

use crate::error::ModelResult;
use crate::types::{
    Criterion, Element, EnvelopeGroup, LoadCaseInfo, LoadOptions, ModelSummary, ResultRequest,
    ResultSet,
};

/// An engine capable of loading models.
pub trait FeBackend: Send + Sync {
    /// Backend name (for logging).
    fn name(&self) -> &str;

    /// Load a mesh (and any results bundled with it).
    ///
    /// Fails on unreadable or unsupported files.
    fn load_model(&self, path: &Path, options: &LoadOptions) -> ModelResult<Box<dyn FeModel>>;
}

/// A loaded model: mesh, load cases and results.
///
/// Implementations must be `Send` so front-ends can load and import on a
/// worker thread; the pipeline itself is single-threaded.
pub trait FeModel: Send {
    /// Load cases in load order (not numeric order).
    fn load_cases(&self) -> &[LoadCaseInfo];

    /// Attach result files to the loaded mesh.
    ///
    /// Fails if any path is unreadable or incompatible with the mesh; the
    /// model is left unchanged on failure.
    fn import_results(&mut self, paths: &[PathBuf]) -> ModelResult<()>;

    /// Create a derived load case from a combination formula.
    ///
    /// The engine assigns the new case's ID; formulas referencing unknown
    /// cases or frames are rejected.
    fn new_derived_loadcase(&mut self, name: &str, formula: &Formula) -> ModelResult<LcId>;

    /// Create an envelope load case over a list of contributing cases.
    fn new_envelope_loadcase(
        &mut self,
        name: &str,
        formula: &Formula,
        criterion: Criterion,
        group: EnvelopeGroup,
    ) -> ModelResult<LcId>;

    /// All mesh elements, ordered by internal sequential index.
    fn elements(&self) -> &[Element];

    /// Elements of one kind (e.g. `CQUAD4`), in sequential order.
    fn elements_of_kind(&self, kind: &str) -> Vec<Element> {
        self.elements()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Dense result arrays for one (case, frame, quantity).
    fn result(&self, request: &ResultRequest) -> ModelResult<ResultSet>;

    /// Counts and load case listing for summary displays.
    fn summary(&self) -> ModelSummary;

    /// Look up one load case by ID.
    fn load_case(&self, id: LcId) -> Option<&LoadCaseInfo> {
        self.load_cases().iter().find(|lc| lc.id == id)
    }
}
