//! Report generation service.

use std::path::{Path, PathBuf};
use std::time::Instant;

use fp_core::{FrameIx, LcId};
use fp_model::FeModel;
use fp_report::{Report, ReportSpec};

use crate::error::{AppError, AppResult};

/// What a finished report produced.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub report_id: String,
    pub rows: usize,
    pub output: PathBuf,
}

/// Expand a user-entered case selection.
///
/// `ALL` means every load case at its representative frame; anything else is
/// a `<LC{id}:FR{frame}>` list or combination whose terms name the cases.
pub fn expand_case_selection(
    model: &dyn FeModel,
    input: &str,
) -> AppResult<Vec<(LcId, FrameIx)>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "case selection must not be empty".to_string(),
        ));
    }
    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(model
            .load_cases()
            .iter()
            .map(|lc| (lc.id, lc.active_frame))
            .collect());
    }
    let formula = fp_formula::parse_formula(trimmed)?;
    Ok(formula
        .terms()
        .iter()
        .map(|t| (t.case, t.frame))
        .collect())
}

/// Calculate a report and write its CSV (and optionally a JSON manifest).
pub fn generate_report(
    model: &dyn FeModel,
    spec: ReportSpec,
    output: &Path,
    manifest: Option<&Path>,
) -> AppResult<ReportOutcome> {
    let started = Instant::now();
    let report = Report::calculate(model, spec)?;
    report.to_csv(output)?;
    if let Some(manifest_path) = manifest {
        report.write_manifest(manifest_path)?;
    }
    tracing::info!(
        rows = report.rows().len(),
        output = %output.display(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "report written"
    );
    Ok(ReportOutcome {
        report_id: report.id(),
        rows: report.rows().len(),
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_model::{ElementDef, LoadCaseDef, LoadOptions, MemModel, ModelFile};

    fn model() -> MemModel {
        let parsed = ModelFile {
            name: "m".to_string(),
            nodes: 0,
            connectors: 0,
            coord_systems: 0,
            elements: vec![ElementDef {
                id: 1,
                part: "p".to_string(),
                kind: "CQUAD4".to_string(),
            }],
            load_cases: vec![
                LoadCaseDef {
                    id: 10,
                    name: "a".to_string(),
                },
                LoadCaseDef {
                    id: 20,
                    name: "b".to_string(),
                },
            ],
            results: vec![],
        };
        MemModel::from_file(std::path::Path::new("inline"), parsed, &LoadOptions::default())
            .unwrap()
    }

    #[test]
    fn all_expands_to_every_case() {
        let model = model();
        let cases = expand_case_selection(&model, "ALL").unwrap();
        assert_eq!(cases, vec![(LcId(10), FrameIx(0)), (LcId(20), FrameIx(0))]);
    }

    #[test]
    fn formula_selection_names_cases_and_frames() {
        let model = model();
        let cases = expand_case_selection(&model, "<LC20:FR1>,<LC10:FR0>").unwrap();
        assert_eq!(cases, vec![(LcId(20), FrameIx(1)), (LcId(10), FrameIx(0))]);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let model = model();
        assert!(expand_case_selection(&model, "  ").is_err());
    }
}
