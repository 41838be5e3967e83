//! Model loading and result import with timing logs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use fp_model::{FeBackend, FeModel, LoadOptions};

use crate::error::AppResult;

/// Load a mesh through the backend.
pub fn load_model(
    backend: &dyn FeBackend,
    path: &Path,
    options: &LoadOptions,
) -> AppResult<Box<dyn FeModel>> {
    let started = Instant::now();
    let model = backend.load_model(path, options)?;
    tracing::info!(
        backend = backend.name(),
        path = %path.display(),
        parallel = options.parallel,
        elapsed_s = started.elapsed().as_secs_f64(),
        "mesh loaded"
    );
    Ok(model)
}

/// Attach result files to a loaded model.
pub fn import_results(model: &mut dyn FeModel, paths: &[PathBuf]) -> AppResult<()> {
    let started = Instant::now();
    model.import_results(paths)?;
    tracing::info!(
        files = paths.len(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "results imported"
    );
    Ok(())
}
