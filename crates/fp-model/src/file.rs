//! JSON interchange format for the in-memory reference backend.
//!
//! A model file describes the mesh entity tables plus any result blocks
//! bundled with it; a result file carries additional load cases and blocks
//! for a mesh that is already loaded. Solver-grade backends read their own
//! native formats instead and never touch this module.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::types::ResultAxes;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelFile {
    pub name: String,
    #[serde(default)]
    pub nodes: usize,
    #[serde(default)]
    pub connectors: usize,
    #[serde(default)]
    pub coord_systems: usize,
    pub elements: Vec<ElementDef>,
    #[serde(default)]
    pub load_cases: Vec<LoadCaseDef>,
    #[serde(default)]
    pub results: Vec<ResultBlockDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDef {
    pub id: u64,
    pub part: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadCaseDef {
    pub id: i64,
    pub name: String,
}

/// Dense per-entity arrays for one (case, frame, quantity, axes), keyed by
/// component name. Array order follows the element table of the owning mesh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultBlockDef {
    pub case: i64,
    #[serde(default)]
    pub frame: u32,
    pub quantity: String,
    #[serde(default)]
    pub axes: ResultAxes,
    pub components: BTreeMap<String, Vec<f64>>,
}

/// A standalone result file: extra cases plus their blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultFile {
    #[serde(default)]
    pub load_cases: Vec<LoadCaseDef>,
    pub results: Vec<ResultBlockDef>,
}

pub fn load_model_file(path: &Path) -> ModelResult<ModelFile> {
    let content = std::fs::read_to_string(path).map_err(|e| ModelError::ModelFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file: ModelFile = serde_json::from_str(&content).map_err(|e| ModelError::Unsupported {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(file)
}

pub fn load_result_file(path: &Path) -> ModelResult<ResultFile> {
    let content = std::fs::read_to_string(path).map_err(|e| ModelError::ResultFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file: ResultFile = serde_json::from_str(&content).map_err(|e| ModelError::Incompatible {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(file)
}

pub fn save_model_file(path: &Path, file: &ModelFile) -> ModelResult<()> {
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn save_result_file(path: &Path, file: &ResultFile) -> ModelResult<()> {
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}
