//! Query helpers for summary displays.

use fp_core::LcId;
use fp_model::{FeModel, LcKind, ModelSummary};

/// Counts and load case IDs for the summary box / `summary` subcommand.
pub fn model_summary(model: &dyn FeModel) -> ModelSummary {
    model.summary()
}

/// (id, kind, name) for every load case, in load order.
pub fn case_listing(model: &dyn FeModel) -> Vec<(LcId, LcKind, String)> {
    model
        .load_cases()
        .iter()
        .map(|lc| (lc.id, lc.kind, lc.name.clone()))
        .collect()
}
