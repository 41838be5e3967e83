//! Multi-component force tables.
//!
//! The interactive tool's report feature: pick load cases, one quantity,
//! several components and an element selection; get one CSV row per
//! (case, element) with one column per component. Rows are grouped by load
//! case, in selection order.

use std::fmt::Write as _;
use std::path::Path;

use fp_core::{ElementId, FrameIx, LcId};
use fp_model::{Element, FeModel, ResultAxes, ResultRequest};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::select::select;
use crate::{ReportError, ReportResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSpec {
    /// (case, frame) pairs, in output order.
    pub cases: Vec<(LcId, FrameIx)>,
    pub quantity: String,
    pub components: Vec<String>,
    #[serde(default)]
    pub axes: ResultAxes,
    /// Restrict to one element kind (e.g. `CQUAD4`). Ignored when
    /// `element_ids` is set.
    #[serde(default)]
    pub element_kind: Option<String>,
    /// Explicit element selection by user-facing ID.
    #[serde(default)]
    pub element_ids: Option<Vec<ElementId>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub case: LcId,
    pub frame: FrameIx,
    pub element: ElementId,
    pub part: String,
    /// One value per spec component, in spec order.
    pub values: Vec<f64>,
}

/// Summary written next to the CSV on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportManifest {
    pub report_id: String,
    pub generated_utc: String,
    pub quantity: String,
    pub components: Vec<String>,
    pub case_count: usize,
    pub element_count: usize,
    pub row_count: usize,
}

/// A calculated report, ready to write.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    spec: ReportSpec,
    elements: Vec<Element>,
    rows: Vec<ReportRow>,
}

impl Report {
    /// Pull every (case, frame, component) array through the engine boundary
    /// and gather the selected elements.
    pub fn calculate(model: &dyn FeModel, spec: ReportSpec) -> ReportResult<Self> {
        if spec.cases.is_empty() {
            return Err(ReportError::EmptyCases);
        }
        if spec.components.is_empty() {
            return Err(ReportError::EmptyComponents);
        }

        let elements = resolve_selection(model, &spec)?;
        if elements.is_empty() {
            return Err(ReportError::EmptySelection);
        }

        let mut rows = Vec::with_capacity(spec.cases.len() * elements.len());
        for (case, frame) in &spec.cases {
            let set = model.result(
                &ResultRequest::new(*case, *frame, spec.quantity.clone()).with_axes(spec.axes),
            )?;
            let mut columns = Vec::with_capacity(spec.components.len());
            for component in &spec.components {
                let dense = set.component(component)?;
                columns.push(select(dense, &elements)?);
            }
            for (i, element) in elements.iter().enumerate() {
                rows.push(ReportRow {
                    case: *case,
                    frame: *frame,
                    element: element.id,
                    part: element.part.clone(),
                    values: columns.iter().map(|col| col[i]).collect(),
                });
            }
        }

        Ok(Self {
            spec,
            elements,
            rows,
        })
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Content-based report identifier: stable for identical specs.
    pub fn id(&self) -> String {
        let mut hasher = Sha256::new();
        let spec_json = serde_json::to_string(&self.spec).unwrap_or_default();
        hasher.update(spec_json.as_bytes());
        let digest = hasher.finalize();
        format!("{:x}", digest)
    }

    pub fn manifest(&self) -> ReportManifest {
        ReportManifest {
            report_id: self.id(),
            generated_utc: chrono::Utc::now().to_rfc3339(),
            quantity: self.spec.quantity.clone(),
            components: self.spec.components.clone(),
            case_count: self.spec.cases.len(),
            element_count: self.elements.len(),
            row_count: self.rows.len(),
        }
    }

    /// Write the table. Same atomic-content rules as the envelope export.
    pub fn to_csv(&self, path: &Path) -> ReportResult<()> {
        let mut content = String::new();
        let _ = write!(content, "LoadCase,Frame,ID_E,PARTS_E");
        for component in &self.spec.components {
            let _ = write!(content, ",{component}");
        }
        content.push('\n');
        for row in &self.rows {
            let _ = write!(
                content,
                "{},{},{},{}",
                row.case, row.frame, row.element, row.part
            );
            for value in &row.values {
                let _ = write!(content, ",{value}");
            }
            content.push('\n');
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn write_manifest(&self, path: &Path) -> ReportResult<()> {
        let content = serde_json::to_string_pretty(&self.manifest())?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn resolve_selection(model: &dyn FeModel, spec: &ReportSpec) -> ReportResult<Vec<Element>> {
    if let Some(ids) = &spec.element_ids {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let element = model
                .elements()
                .iter()
                .find(|e| e.id == *id)
                .ok_or(ReportError::UnknownElement(*id))?;
            out.push(element.clone());
        }
        return Ok(out);
    }
    Ok(match &spec.element_kind {
        Some(kind) => model.elements_of_kind(kind),
        None => model.elements().to_vec(),
    })
}
