//! The envelope workflow driver.
//!
//! Sequences load → import → combine → query → select → export. No retries:
//! the first failure aborts the run and surfaces to the caller.

use std::path::PathBuf;
use std::time::Instant;

use fp_combine::{CombineSpec, EnvelopePair, combine};
use fp_core::{FrameIx, LcId};
use fp_job::Job;
use fp_model::{Element, FeBackend, FeModel, LoadOptions, ResultRequest};
use fp_report::{envelope_rows, export_envelope_csv, select};

use crate::error::AppResult;
use crate::model_service;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct EnvelopeJobOutcome {
    pub derived_cases: usize,
    pub envelopes: EnvelopePair,
    pub rows: usize,
    pub output: PathBuf,
}

/// Run one envelope job end to end.
pub fn run_envelope_job(backend: &dyn FeBackend, job: &Job) -> AppResult<EnvelopeJobOutcome> {
    let started = Instant::now();

    let options = LoadOptions {
        parallel: job.parallel,
    };
    let mut model = model_service::load_model(backend, &job.model, &options)?;
    model_service::import_results(model.as_mut(), &job.results)?;

    let before = model.load_cases().len();
    let spec = combine_spec(job);
    let envelopes = combine(model.as_mut(), &spec)?;
    let derived_cases = model.load_cases().len() - before - 2;

    let elements = selected_elements(model.as_ref(), job);
    let values = envelope_column(model.as_ref(), envelopes.by_value, job)?;
    let sources = envelope_column(model.as_ref(), envelopes.by_case, job)?;

    let gathered_values = select(&values, &elements)?;
    let gathered_sources = select(&sources, &elements)?;
    let rows = envelope_rows(&elements, &gathered_values, &gathered_sources)?;
    export_envelope_csv(&job.export.output, &job.export.component, &rows)?;

    tracing::info!(
        job = job.name,
        rows = rows.len(),
        output = %job.export.output.display(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "envelope job finished"
    );
    Ok(EnvelopeJobOutcome {
        derived_cases,
        envelopes,
        rows: rows.len(),
        output: job.export.output.clone(),
    })
}

fn combine_spec(job: &Job) -> CombineSpec {
    let mut spec =
        CombineSpec::new(LcId(job.combine.thermal_case)).with_factor(job.combine.factor);
    if let Some(baseline) = job.combine.baseline {
        spec = spec.with_baseline(LcId(baseline));
    }
    spec
}

fn selected_elements(model: &dyn FeModel, job: &Job) -> Vec<Element> {
    match &job.export.element_kind {
        Some(kind) => model.elements_of_kind(kind),
        None => model.elements().to_vec(),
    }
}

/// One dense envelope array: the job's quantity/component at the envelope
/// case's representative frame.
fn envelope_column(model: &dyn FeModel, case: LcId, job: &Job) -> AppResult<Vec<f64>> {
    let set = model.result(&ResultRequest::new(
        case,
        FrameIx(0),
        job.export.quantity.clone(),
    ))?;
    Ok(set.component(&job.export.component)?.to_vec())
}
