//! Data types shared across the engine boundary.

use std::collections::BTreeMap;

use fp_core::{ElementId, FrameIx, LcId, SeqIx};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// How a load case came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LcKind {
    /// Read from solver output.
    Original,
    /// Linear combination of other cases.
    Derived,
    /// Per-entity extreme over a set of contributing cases.
    Envelope,
}

/// One load case as seen through the engine boundary.
///
/// Order of appearance in [`crate::FeModel::load_cases`] is load order,
/// not numeric order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadCaseInfo {
    pub id: LcId,
    pub name: String,
    pub kind: LcKind,
    /// The frame the engine treats as the case's representative increment.
    pub active_frame: FrameIx,
}

/// One mesh element as seen through the engine boundary.
///
/// `seq` is the engine-assigned internal sequential index: the only valid
/// index into result arrays from the same model. `id` is the user-facing
/// element number from the source mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub part: String,
    pub kind: String,
    pub seq: SeqIx,
}

/// Envelope extremum criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    ExtremeMax,
    ExtremeMin,
}

/// What an envelope case's result arrays hold per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeGroup {
    /// The extreme value itself.
    ByContour,
    /// The ID of the contributing case that produced the extreme.
    ByLoadCase,
}

/// Output frame of reference for result queries.
///
/// Passed through to the engine opaquely; the reference backend stores one
/// array set per axes choice when the source data provides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResultAxes {
    #[default]
    Element,
    Material,
}

/// Options for model loading.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Ask the engine to use internal parallel processing. Opaque: callers
    /// observe no concurrency either way.
    pub parallel: bool,
}

/// A result query: one load case, one frame, one named quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRequest {
    pub case: LcId,
    pub frame: FrameIx,
    pub quantity: String,
    #[serde(default)]
    pub axes: ResultAxes,
}

impl ResultRequest {
    pub fn new(case: LcId, frame: FrameIx, quantity: impl Into<String>) -> Self {
        Self {
            case,
            frame,
            quantity: quantity.into(),
            axes: ResultAxes::Element,
        }
    }

    pub fn with_axes(mut self, axes: ResultAxes) -> Self {
        self.axes = axes;
        self
    }
}

/// Dense per-entity arrays for one (case, frame, quantity), keyed by
/// component name. Arrays are indexed by internal sequential index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub quantity: String,
    components: BTreeMap<String, Vec<f64>>,
}

impl ResultSet {
    pub fn new(quantity: impl Into<String>, components: BTreeMap<String, Vec<f64>>) -> Self {
        Self {
            quantity: quantity.into(),
            components,
        }
    }

    /// Dense values for one component, one entry per mesh entity.
    pub fn component(&self, name: &str) -> ModelResult<&[f64]> {
        self.components
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ModelError::UnknownComponent {
                quantity: self.quantity.clone(),
                component: name.to_string(),
            })
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn into_components(self) -> BTreeMap<String, Vec<f64>> {
        self.components
    }
}

/// Counts shown in the model summary box / `summary` subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub name: String,
    pub elements: usize,
    pub nodes: usize,
    pub connectors: usize,
    pub coord_systems: usize,
    /// Load case IDs in load order.
    pub load_cases: Vec<LcId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_set_component_lookup() {
        let mut comps = BTreeMap::new();
        comps.insert("FX".to_string(), vec![1.0, 2.0]);
        let set = ResultSet::new("FORCES", comps);

        assert_eq!(set.component("FX").unwrap(), &[1.0, 2.0]);
        assert!(matches!(
            set.component("FY"),
            Err(ModelError::UnknownComponent { .. })
        ));
    }
}
