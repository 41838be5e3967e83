//! The combination pipeline itself.

use std::time::Instant;

use fp_core::{FrameIx, LcId};
use fp_formula::{Formula, Term};
use fp_model::{Criterion, EnvelopeGroup, FeModel, LcKind};

use crate::spec::CombineSpec;
use crate::{CombineError, CombineResult};

/// The two envelope cases produced by [`combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopePair {
    /// Per entity: the extreme value across all contributing cases.
    pub by_value: LcId,
    /// Per entity: the ID of the contributing case that produced it.
    pub by_case: LcId,
}

/// Superpose the thermal case onto every mechanical case, then envelope the
/// derived set.
///
/// Creates one derived case named `"{mech}+{thermal}"` per mechanical case,
/// then two `ExtremeMax` envelope cases over every DERIVED case in the model
/// (pre-existing derived cases included). Calling this twice on the same
/// model intentionally duplicates cases; nothing is ever removed.
pub fn combine(model: &mut dyn FeModel, spec: &CombineSpec) -> CombineResult<EnvelopePair> {
    if !spec.factor.is_finite() || spec.factor <= 0.0 {
        return Err(CombineError::InvalidFactor(spec.factor));
    }
    if model.load_case(spec.thermal).is_none() {
        return Err(CombineError::UnknownThermal(spec.thermal));
    }
    if let Some(baseline) = spec.baseline {
        if baseline == spec.thermal {
            return Err(CombineError::BaselineIsThermal(baseline));
        }
        if model.load_case(baseline).is_none() {
            return Err(CombineError::UnknownBaseline(baseline));
        }
    }

    let mechanical: Vec<LcId> = model
        .load_cases()
        .iter()
        .filter(|lc| lc.kind == LcKind::Original)
        .filter(|lc| lc.id != spec.thermal && Some(lc.id) != spec.baseline)
        .map(|lc| lc.id)
        .collect();
    if mechanical.is_empty() {
        return Err(CombineError::NoMechanicalCases);
    }

    let started = Instant::now();
    for mech in &mechanical {
        let formula = Formula::combination(vec![
            Term::new(*mech, spec.frame, spec.factor),
            Term::unit(spec.thermal, spec.frame),
        ])?;
        let name = format!("{}+{}", mech, spec.thermal);
        let id = model.new_derived_loadcase(&name, &formula)?;
        tracing::debug!(%mech, derived = %id, "created derived load case");
    }

    // Envelope over every derived case now in the model, at each case's own
    // representative frame.
    let derived_refs: Vec<(LcId, FrameIx)> = model
        .load_cases()
        .iter()
        .filter(|lc| lc.kind == LcKind::Derived)
        .map(|lc| (lc.id, FrameIx(0)))
        .collect();
    let envelope_formula = Formula::envelope(derived_refs)?;

    let by_value = model.new_envelope_loadcase(
        "envelope contour",
        &envelope_formula,
        Criterion::ExtremeMax,
        EnvelopeGroup::ByContour,
    )?;
    let by_case = model.new_envelope_loadcase(
        "envelope loadcase",
        &envelope_formula,
        Criterion::ExtremeMax,
        EnvelopeGroup::ByLoadCase,
    )?;

    tracing::info!(
        derived = mechanical.len(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "combined load cases and built envelopes"
    );
    Ok(EnvelopePair { by_value, by_case })
}
