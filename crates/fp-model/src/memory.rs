//! In-memory reference backend over the JSON interchange format.
//!
//! Derived and envelope cases are evaluated lazily at query time from their
//! stored formulas, so creating them is cheap and querying them always
//! reflects the arrays currently attached to the model. Synthesized cases
//! get negative IDs, keeping solver subcase numbering untouched.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use fp_core::{CoreError, ElementId, FrameIx, LcId, SeqIx};
use fp_formula::Formula;
use rayon::prelude::*;

use crate::error::{ModelError, ModelResult};
use crate::file::{self, ModelFile, ResultBlockDef, ResultFile};
use crate::model::{FeBackend, FeModel};
use crate::types::{
    Criterion, Element, EnvelopeGroup, LcKind, LoadCaseInfo, LoadOptions, ModelSummary,
    ResultAxes, ResultRequest, ResultSet,
};

/// Backend over [`ModelFile`]/[`ResultFile`] JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemBackend;

impl MemBackend {
    pub fn new() -> Self {
        Self
    }
}

impl FeBackend for MemBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn load_model(&self, path: &Path, options: &LoadOptions) -> ModelResult<Box<dyn FeModel>> {
        let parsed = file::load_model_file(path)?;
        let model = MemModel::from_file(path, parsed, options)?;
        Ok(Box::new(model))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BlockKey {
    case: LcId,
    frame: FrameIx,
    quantity: String,
    axes: ResultAxes,
}

#[derive(Debug, Clone)]
struct EnvelopeCase {
    formula: Formula,
    criterion: Criterion,
    group: EnvelopeGroup,
}

/// A fully in-memory model.
pub struct MemModel {
    name: String,
    nodes: usize,
    connectors: usize,
    coord_systems: usize,
    elements: Vec<Element>,
    cases: Vec<LoadCaseInfo>,
    blocks: HashMap<BlockKey, BTreeMap<String, Vec<f64>>>,
    derived: HashMap<LcId, Formula>,
    envelopes: HashMap<LcId, EnvelopeCase>,
    parallel: bool,
    next_synthetic: i64,
}

impl MemModel {
    /// Build a model from an interchange document. `path` is only used in
    /// error messages.
    pub fn from_file(path: &Path, parsed: ModelFile, options: &LoadOptions) -> ModelResult<Self> {
        let elements: Vec<Element> = parsed
            .elements
            .iter()
            .enumerate()
            .map(|(i, e)| Element {
                id: ElementId(e.id),
                part: e.part.clone(),
                kind: e.kind.clone(),
                seq: SeqIx::from_index(i as u32),
            })
            .collect();

        let cases: Vec<LoadCaseInfo> = parsed
            .load_cases
            .iter()
            .map(|lc| LoadCaseInfo {
                id: LcId(lc.id),
                name: lc.name.clone(),
                kind: LcKind::Original,
                active_frame: FrameIx(0),
            })
            .collect();

        let mut ids = cases.iter().map(|c| c.id).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        if ids.len() != cases.len() {
            return Err(ModelError::Unsupported {
                path: path.to_path_buf(),
                message: "duplicate load case IDs".to_string(),
            });
        }

        let mut model = Self {
            name: parsed.name,
            nodes: parsed.nodes,
            connectors: parsed.connectors,
            coord_systems: parsed.coord_systems,
            elements,
            cases,
            blocks: HashMap::new(),
            derived: HashMap::new(),
            envelopes: HashMap::new(),
            parallel: options.parallel,
            next_synthetic: -1,
        };
        model.stage_blocks(path, &parsed.results)?;
        Ok(model)
    }

    /// Validate blocks against the mesh and declared cases, then store them.
    fn stage_blocks(&mut self, path: &Path, blocks: &[ResultBlockDef]) -> ModelResult<()> {
        let known: Vec<LcId> = self.cases.iter().map(|c| c.id).collect();
        let staged = Self::validate_blocks(path, blocks, &known, self.elements.len())?;
        self.commit_blocks(staged);
        Ok(())
    }

    fn validate_blocks(
        path: &Path,
        blocks: &[ResultBlockDef],
        known_cases: &[LcId],
        entity_count: usize,
    ) -> ModelResult<Vec<(BlockKey, BTreeMap<String, Vec<f64>>)>> {
        let mut staged = Vec::new();
        for block in blocks {
            let case = LcId(block.case);
            if !known_cases.contains(&case) {
                return Err(ModelError::Incompatible {
                    path: path.to_path_buf(),
                    message: format!("result block references unknown load case {case}"),
                });
            }
            for (comp, values) in &block.components {
                if values.len() != entity_count {
                    return Err(ModelError::Incompatible {
                        path: path.to_path_buf(),
                        message: format!(
                            "component {comp} of case {case} has {} values, mesh has {} elements",
                            values.len(),
                            entity_count
                        ),
                    });
                }
            }
            let key = BlockKey {
                case,
                frame: FrameIx(block.frame),
                quantity: block.quantity.clone(),
                axes: block.axes,
            };
            staged.push((key, block.components.clone()));
        }
        Ok(staged)
    }

    fn commit_blocks(&mut self, staged: Vec<(BlockKey, BTreeMap<String, Vec<f64>>)>) {
        for (key, components) in staged {
            self.blocks.entry(key).or_default().extend(components);
        }
    }

    fn load_case_info(&self, id: LcId) -> Option<&LoadCaseInfo> {
        self.cases.iter().find(|c| c.id == id)
    }

    fn alloc_synthetic_id(&mut self) -> LcId {
        let id = LcId(self.next_synthetic);
        self.next_synthetic -= 1;
        id
    }

    /// Creation-time formula check: every referenced case must exist.
    fn check_formula(&self, formula: &Formula) -> ModelResult<()> {
        for term in formula.terms() {
            if self.load_case_info(term.case).is_none() {
                return Err(ModelError::Formula {
                    formula: formula.render(),
                    message: format!("unknown load case {}", term.case),
                });
            }
        }
        Ok(())
    }

    fn stored_result(&self, request: &ResultRequest) -> ModelResult<ResultSet> {
        let key = BlockKey {
            case: request.case,
            frame: request.frame,
            quantity: request.quantity.clone(),
            axes: request.axes,
        };
        if let Some(components) = self.blocks.get(&key) {
            return Ok(ResultSet::new(request.quantity.clone(), components.clone()));
        }
        // Distinguish a missing frame from a missing quantity for the error.
        let frame_exists = self
            .blocks
            .keys()
            .any(|k| k.case == request.case && k.frame == request.frame);
        if frame_exists {
            Err(ModelError::UnknownQuantity {
                case: request.case,
                quantity: request.quantity.clone(),
            })
        } else {
            Err(ModelError::UnknownFrame {
                case: request.case,
                frame: request.frame.0,
            })
        }
    }

    /// Arrays for every term of a formula, restricted to the components all
    /// terms share.
    fn term_arrays(
        &self,
        formula: &Formula,
        request: &ResultRequest,
    ) -> ModelResult<Vec<(LcId, f64, BTreeMap<String, Vec<f64>>)>> {
        let mut per_term = Vec::with_capacity(formula.terms().len());
        for term in formula.terms() {
            let sub = self.result(
                &ResultRequest::new(term.case, term.frame, request.quantity.clone())
                    .with_axes(request.axes),
            )?;
            per_term.push((term.case, term.coeff, sub.into_components()));
        }
        // Intersect component names across terms.
        let mut shared: Vec<String> = per_term
            .first()
            .map(|(_, _, comps)| comps.keys().cloned().collect())
            .unwrap_or_default();
        shared.retain(|name| per_term.iter().all(|(_, _, comps)| comps.contains_key(name)));
        if shared.is_empty() {
            return Err(ModelError::UnknownQuantity {
                case: request.case,
                quantity: request.quantity.clone(),
            });
        }
        for (_, _, comps) in &mut per_term {
            comps.retain(|name, _| shared.contains(name));
        }
        Ok(per_term)
    }

    /// Synthesized cases expose only their representative frame 0.
    fn check_synthetic_frame(&self, request: &ResultRequest) -> ModelResult<()> {
        if request.frame != FrameIx(0) {
            return Err(ModelError::UnknownFrame {
                case: request.case,
                frame: request.frame.0,
            });
        }
        Ok(())
    }

    fn derived_result(&self, request: &ResultRequest, formula: &Formula) -> ModelResult<ResultSet> {
        self.check_synthetic_frame(request)?;
        let per_term = self.term_arrays(formula, request)?;
        let n = self.elements.len();
        let mut out: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (_, coeff, comps) in &per_term {
            for (name, values) in comps {
                if values.len() != n {
                    return Err(CoreError::Invariant {
                        what: "result array length must equal mesh entity count",
                    }
                    .into());
                }
                let acc = out.entry(name.clone()).or_insert_with(|| vec![0.0; n]);
                for (slot, v) in acc.iter_mut().zip(values) {
                    *slot += coeff * v;
                }
            }
        }
        Ok(ResultSet::new(request.quantity.clone(), out))
    }

    fn envelope_result(
        &self,
        request: &ResultRequest,
        env: &EnvelopeCase,
    ) -> ModelResult<ResultSet> {
        self.check_synthetic_frame(request)?;
        let per_term = self.term_arrays(&env.formula, request)?;
        let n = self.elements.len();
        let mut out: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let component_names: Vec<String> = per_term
            .first()
            .map(|(_, _, comps)| comps.keys().cloned().collect())
            .unwrap_or_default();
        for name in component_names {
            let mut best_value = vec![f64::NAN; n];
            let mut best_case = vec![0i64; n];
            for (term_ix, (case, _, comps)) in per_term.iter().enumerate() {
                let values = match comps.get(&name) {
                    Some(v) => v,
                    None => continue,
                };
                if values.len() != n {
                    return Err(CoreError::Invariant {
                        what: "result array length must equal mesh entity count",
                    }
                    .into());
                }
                for i in 0..n {
                    let candidate = values[i];
                    let wins = term_ix == 0
                        || match env.criterion {
                            Criterion::ExtremeMax => candidate > best_value[i],
                            Criterion::ExtremeMin => candidate < best_value[i],
                        };
                    if wins {
                        best_value[i] = candidate;
                        best_case[i] = case.0;
                    }
                }
            }
            let column = match env.group {
                EnvelopeGroup::ByContour => best_value,
                EnvelopeGroup::ByLoadCase => best_case.into_iter().map(|c| c as f64).collect(),
            };
            out.insert(name, column);
        }
        Ok(ResultSet::new(request.quantity.clone(), out))
    }
}

impl FeModel for MemModel {
    fn load_cases(&self) -> &[LoadCaseInfo] {
        &self.cases
    }

    fn import_results(&mut self, paths: &[PathBuf]) -> ModelResult<()> {
        let parsed: Vec<(PathBuf, ResultFile)> = if self.parallel {
            paths
                .par_iter()
                .map(|p| file::load_result_file(p).map(|f| (p.clone(), f)))
                .collect::<ModelResult<_>>()?
        } else {
            paths
                .iter()
                .map(|p| file::load_result_file(p).map(|f| (p.clone(), f)))
                .collect::<ModelResult<_>>()?
        };

        // Validate everything before touching the model: a failed import must
        // leave it unchanged.
        let mut known: Vec<LcId> = self.cases.iter().map(|c| c.id).collect();
        let mut new_cases: Vec<LoadCaseInfo> = Vec::new();
        for (path, rf) in &parsed {
            for lc in &rf.load_cases {
                let id = LcId(lc.id);
                match self.load_case_info(id) {
                    Some(existing) if existing.kind != LcKind::Original => {
                        return Err(ModelError::Incompatible {
                            path: path.clone(),
                            message: format!("load case {id} exists and is not an original case"),
                        });
                    }
                    Some(_) => {}
                    None if known.contains(&id) => {}
                    None => {
                        known.push(id);
                        new_cases.push(LoadCaseInfo {
                            id,
                            name: lc.name.clone(),
                            kind: LcKind::Original,
                            active_frame: FrameIx(0),
                        });
                    }
                }
            }
        }
        let mut staged = Vec::new();
        for (path, rf) in &parsed {
            staged.extend(Self::validate_blocks(
                path,
                &rf.results,
                &known,
                self.elements.len(),
            )?);
        }

        self.cases.extend(new_cases);
        self.commit_blocks(staged);
        Ok(())
    }

    fn new_derived_loadcase(&mut self, name: &str, formula: &Formula) -> ModelResult<LcId> {
        self.check_formula(formula)?;
        let id = self.alloc_synthetic_id();
        self.cases.push(LoadCaseInfo {
            id,
            name: name.to_string(),
            kind: LcKind::Derived,
            active_frame: FrameIx(0),
        });
        self.derived.insert(id, formula.clone());
        Ok(id)
    }

    fn new_envelope_loadcase(
        &mut self,
        name: &str,
        formula: &Formula,
        criterion: Criterion,
        group: EnvelopeGroup,
    ) -> ModelResult<LcId> {
        self.check_formula(formula)?;
        let id = self.alloc_synthetic_id();
        self.cases.push(LoadCaseInfo {
            id,
            name: name.to_string(),
            kind: LcKind::Envelope,
            active_frame: FrameIx(0),
        });
        self.envelopes.insert(
            id,
            EnvelopeCase {
                formula: formula.clone(),
                criterion,
                group,
            },
        );
        Ok(id)
    }

    fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn result(&self, request: &ResultRequest) -> ModelResult<ResultSet> {
        let info = self
            .load_case_info(request.case)
            .ok_or(ModelError::UnknownLoadCase { id: request.case })?;
        match info.kind {
            LcKind::Original => self.stored_result(request),
            LcKind::Derived => {
                let formula = self
                    .derived
                    .get(&request.case)
                    .ok_or(ModelError::UnknownLoadCase { id: request.case })?;
                self.derived_result(request, formula)
            }
            LcKind::Envelope => {
                let env = self
                    .envelopes
                    .get(&request.case)
                    .ok_or(ModelError::UnknownLoadCase { id: request.case })?;
                self.envelope_result(request, env)
            }
        }
    }

    fn summary(&self) -> ModelSummary {
        ModelSummary {
            name: self.name.clone(),
            elements: self.elements.len(),
            nodes: self.nodes,
            connectors: self.connectors,
            coord_systems: self.coord_systems,
            load_cases: self.cases.iter().map(|c| c.id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{ElementDef, LoadCaseDef};
    use fp_formula::Term;

    fn two_case_model() -> MemModel {
        let parsed = ModelFile {
            name: "box".to_string(),
            nodes: 8,
            connectors: 0,
            coord_systems: 1,
            elements: vec![
                ElementDef {
                    id: 101,
                    part: "skin".to_string(),
                    kind: "CQUAD4".to_string(),
                },
                ElementDef {
                    id: 102,
                    part: "skin".to_string(),
                    kind: "CQUAD4".to_string(),
                },
                ElementDef {
                    id: 201,
                    part: "frame".to_string(),
                    kind: "CBAR".to_string(),
                },
            ],
            load_cases: vec![
                LoadCaseDef {
                    id: 10,
                    name: "pressure".to_string(),
                },
                LoadCaseDef {
                    id: 20,
                    name: "gust".to_string(),
                },
            ],
            results: vec![
                ResultBlockDef {
                    case: 10,
                    frame: 1,
                    quantity: "FORCES".to_string(),
                    axes: ResultAxes::Element,
                    components: BTreeMap::from([("FX".to_string(), vec![1.0, -4.0, 2.0])]),
                },
                ResultBlockDef {
                    case: 20,
                    frame: 1,
                    quantity: "FORCES".to_string(),
                    axes: ResultAxes::Element,
                    components: BTreeMap::from([("FX".to_string(), vec![3.0, -1.0, 0.5])]),
                },
            ],
        };
        MemModel::from_file(Path::new("inline"), parsed, &LoadOptions::default()).unwrap()
    }

    #[test]
    fn derived_case_is_a_linear_combination() {
        let mut model = two_case_model();
        let formula = Formula::combination(vec![
            Term::new(LcId(10), FrameIx(1), 2.0),
            Term::unit(LcId(20), FrameIx(1)),
        ])
        .unwrap();
        let id = model.new_derived_loadcase("2*10+20", &formula).unwrap();
        assert_eq!(id, LcId(-1));

        let set = model
            .result(&ResultRequest::new(id, FrameIx(0), "FORCES"))
            .unwrap();
        assert_eq!(set.component("FX").unwrap(), &[5.0, -9.0, 4.5]);
    }

    #[test]
    fn envelope_tracks_values_and_contributors() {
        let mut model = two_case_model();
        let formula =
            Formula::envelope([(LcId(10), FrameIx(1)), (LcId(20), FrameIx(1))]).unwrap();
        let by_value = model
            .new_envelope_loadcase("env ct", &formula, Criterion::ExtremeMax, EnvelopeGroup::ByContour)
            .unwrap();
        let by_case = model
            .new_envelope_loadcase("env lc", &formula, Criterion::ExtremeMax, EnvelopeGroup::ByLoadCase)
            .unwrap();

        let values = model
            .result(&ResultRequest::new(by_value, FrameIx(0), "FORCES"))
            .unwrap();
        assert_eq!(values.component("FX").unwrap(), &[3.0, -1.0, 2.0]);

        let sources = model
            .result(&ResultRequest::new(by_case, FrameIx(0), "FORCES"))
            .unwrap();
        assert_eq!(sources.component("FX").unwrap(), &[20.0, 20.0, 10.0]);
    }

    #[test]
    fn formula_referencing_unknown_case_is_rejected() {
        let mut model = two_case_model();
        let formula = Formula::combination(vec![Term::unit(LcId(999), FrameIx(1))]).unwrap();
        let got = model.new_derived_loadcase("bad", &formula);
        assert!(matches!(got, Err(ModelError::Formula { .. })));
    }

    #[test]
    fn synthetic_cases_only_expose_frame_zero() {
        let mut model = two_case_model();
        let formula = Formula::combination(vec![Term::unit(LcId(10), FrameIx(1))]).unwrap();
        let id = model.new_derived_loadcase("copy", &formula).unwrap();
        let got = model.result(&ResultRequest::new(id, FrameIx(1), "FORCES"));
        assert!(matches!(got, Err(ModelError::UnknownFrame { .. })));
    }

    #[test]
    fn elements_of_kind_preserves_order() {
        let model = two_case_model();
        let quads = model.elements_of_kind("CQUAD4");
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].id, ElementId(101));
        assert_eq!(quads[1].id, ElementId(102));
    }
}
