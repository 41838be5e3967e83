//! Job schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub version: u32,
    pub name: String,
    /// Mesh (or mesh + results) file handed to the backend.
    pub model: PathBuf,
    /// Result files imported after the mesh is loaded.
    #[serde(default)]
    pub results: Vec<PathBuf>,
    /// Ask the engine for internal parallel processing while loading.
    #[serde(default)]
    pub parallel: bool,
    pub combine: CombineDef,
    pub export: ExportDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombineDef {
    /// The thermal case superposed onto every mechanical case.
    pub thermal_case: i64,
    /// Scale factor on the mechanical contribution.
    #[serde(default = "default_factor")]
    pub factor: f64,
    /// Reference case excluded from the mechanical set, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportDef {
    /// Result quantity queried on the envelope cases (e.g. `FORCES`).
    pub quantity: String,
    /// Component of that quantity (e.g. `FX`).
    pub component: String,
    /// Restrict the export to one element kind (e.g. `CQUAD4`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_kind: Option<String>,
    /// Destination CSV path.
    pub output: PathBuf,
}

fn default_factor() -> f64 {
    1.5
}
