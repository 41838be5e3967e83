use std::path::PathBuf;

use egui_file_dialog::{DialogMode, FileDialog};
use fp_app::report_service;
use fp_core::ElementId;
use fp_formula::parse_formula;
use fp_model::{Criterion, EnvelopeGroup, FeModel, ResultAxes};
use fp_report::ReportSpec;

use crate::import_worker::{ImportWorker, WorkerMessage};

const REPORT_QUANTITY: &str = "FORCES";
const REPORT_COMPONENTS: [&str; 3] = ["FX", "FY", "FXY"];

/// All tool state. Mutated only on the UI thread; the import worker hands a
/// finished model back over a channel.
pub struct FepostApp {
    model_path: Option<PathBuf>,
    result_paths: Vec<PathBuf>,
    parallel: bool,
    model: Option<Box<dyn FeModel>>,
    import_worker: Option<ImportWorker>,
    summary_text: String,
    info: String,

    envelope_entry: String,
    envelope_created: String,
    derived_entry: String,
    derived_created: String,
    ids_entry: String,
    ids_selected: Option<Vec<ElementId>>,
    ids_label: String,
    cases_entry: String,
    cases_label: String,
    material_axes: bool,

    file_dialog: FileDialog,
    file_dialog_action: Option<FileDialogAction>,
    last_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FileDialogAction {
    PickModel,
    AddResult,
    SaveReport,
}

impl FepostApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            model_path: None,
            result_paths: Vec::new(),
            parallel: false,
            model: None,
            import_worker: None,
            summary_text: String::new(),
            info: String::new(),
            envelope_entry: String::new(),
            envelope_created: String::new(),
            derived_entry: String::new(),
            derived_created: String::new(),
            ids_entry: String::new(),
            ids_selected: None,
            ids_label: String::new(),
            cases_entry: String::new(),
            cases_label: String::new(),
            material_axes: false,
            file_dialog: FileDialog::new(),
            file_dialog_action: None,
            last_directory: None,
        }
    }

    fn open_dialog(&mut self, action: FileDialogAction) {
        self.file_dialog_action = Some(action);
        let initial_dir = self.last_directory.as_ref().and_then(|p| p.to_str());
        match action {
            FileDialogAction::SaveReport => self.file_dialog.save_file(),
            _ => {
                let _ = self
                    .file_dialog
                    .open(DialogMode::SelectFile, true, initial_dir);
            }
        }
    }

    fn start_import(&mut self) {
        let Some(model_path) = self.model_path.clone() else {
            self.info = "Select a model first".to_string();
            return;
        };
        self.model = None;
        self.summary_text.clear();
        self.import_worker = Some(ImportWorker::start(
            model_path,
            self.result_paths.clone(),
            self.parallel,
        ));
        self.info = "Importing...".to_string();
    }

    fn poll_worker(&mut self) {
        let Some(worker) = &self.import_worker else {
            return;
        };
        match worker.message_rx.try_recv() {
            Ok(WorkerMessage::Loaded { model, elapsed_s }) => {
                self.model = Some(model);
                self.import_worker = None;
                self.info = format!("Imported in {elapsed_s:.2} s");
                self.refresh_summary();
            }
            Ok(WorkerMessage::Error { message }) => {
                self.import_worker = None;
                self.info = message;
            }
            Err(_) => {}
        }
    }

    fn refresh_summary(&mut self) {
        let Some(model) = &self.model else {
            self.summary_text.clear();
            return;
        };
        let summary = fp_app::model_summary(model.as_ref());
        let case_ids: Vec<String> = summary.load_cases.iter().map(|id| id.to_string()).collect();
        self.summary_text = format!(
            "Elements: {}\nNodes: {}\nConnectors: {}\nCoordinate Systems: {}\nLoad Cases: {} -> [{}]",
            summary.elements,
            summary.nodes,
            summary.connectors,
            summary.coord_systems,
            summary.load_cases.len(),
            case_ids.join(", "),
        );
    }

    fn create_envelope(&mut self) {
        if self.envelope_entry.trim().is_empty() {
            return;
        }
        let Some(model) = self.model.as_mut() else {
            self.info = "Import a model first".to_string();
            return;
        };
        let created = parse_formula(&self.envelope_entry)
            .map_err(|e| e.to_string())
            .and_then(|formula| {
                model
                    .new_envelope_loadcase(
                        "ENV-CASE",
                        &formula,
                        Criterion::ExtremeMax,
                        EnvelopeGroup::ByContour,
                    )
                    .map_err(|e| e.to_string())
            });
        match created {
            Ok(id) => {
                self.envelope_created = format!("<LC{id}:FR0>");
                self.info = format!("Created envelope case {id}");
                self.refresh_summary();
            }
            Err(message) => self.info = format!("Error creating envelope: {message}"),
        }
    }

    fn create_derived(&mut self) {
        if self.derived_entry.trim().is_empty() {
            return;
        }
        let Some(model) = self.model.as_mut() else {
            self.info = "Import a model first".to_string();
            return;
        };
        let created = parse_formula(&self.derived_entry)
            .map_err(|e| e.to_string())
            .and_then(|formula| {
                model
                    .new_derived_loadcase("DEV-CASE", &formula)
                    .map_err(|e| e.to_string())
            });
        match created {
            Ok(id) => {
                self.derived_created = format!("<LC{id}:FR0>");
                self.info = format!("Created derived case {id}");
                self.refresh_summary();
            }
            Err(message) => self.info = format!("Error creating derived case: {message}"),
        }
    }

    fn save_ids(&mut self) {
        let input = self.ids_entry.trim();
        if input.eq_ignore_ascii_case("all") {
            self.ids_selected = None;
            self.ids_label = "ALL".to_string();
            return;
        }
        let parsed: Result<Vec<ElementId>, String> = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u64>()
                    .map(ElementId)
                    .map_err(|_| format!("invalid element ID `{s}`"))
            })
            .collect();
        match parsed {
            Ok(ids) if ids.is_empty() => self.info = "No element IDs entered".to_string(),
            Ok(ids) => {
                self.ids_label = if ids.len() < 8 {
                    format!("{ids:?}")
                } else {
                    format!("{:?}...", &ids[..8])
                };
                self.ids_selected = Some(ids);
            }
            Err(message) => self.info = format!("Error selecting IDs: {message}"),
        }
    }

    fn save_cases(&mut self) {
        let input = self.cases_entry.trim().to_string();
        if input.is_empty() {
            return;
        }
        let Some(model) = &self.model else {
            self.info = "Import a model first".to_string();
            return;
        };
        match report_service::expand_case_selection(model.as_ref(), &input) {
            Ok(cases) => {
                self.cases_label = format!("{} case(s) selected", cases.len());
            }
            Err(e) => self.info = format!("Error selecting cases: {e}"),
        }
    }

    fn generate_report(&mut self, output: PathBuf) {
        let Some(model) = &self.model else {
            self.info = "Import a model first".to_string();
            return;
        };
        if self.cases_entry.trim().is_empty() {
            self.info = "Select load cases first".to_string();
            return;
        }
        let result = report_service::expand_case_selection(model.as_ref(), &self.cases_entry)
            .and_then(|cases| {
                let spec = ReportSpec {
                    cases,
                    quantity: REPORT_QUANTITY.to_string(),
                    components: REPORT_COMPONENTS.iter().map(|c| c.to_string()).collect(),
                    axes: if self.material_axes {
                        ResultAxes::Material
                    } else {
                        ResultAxes::Element
                    },
                    element_kind: None,
                    element_ids: self.ids_selected.clone(),
                };
                report_service::generate_report(model.as_ref(), spec, &output, None)
            });
        match result {
            Ok(outcome) => {
                self.info = format!(
                    "Report ({} rows) written to {}",
                    outcome.rows,
                    outcome.output.display()
                );
            }
            Err(e) => self.info = format!("Error generating report: {e}"),
        }
    }

    fn handle_picked_path(&mut self, path: PathBuf) {
        if let Some(parent) = path.parent() {
            self.last_directory = Some(parent.to_path_buf());
        }
        match self.file_dialog_action.take() {
            Some(FileDialogAction::PickModel) => self.model_path = Some(path),
            Some(FileDialogAction::AddResult) => self.result_paths.push(path),
            Some(FileDialogAction::SaveReport) => self.generate_report(path),
            None => {}
        }
    }
}

impl eframe::App for FepostApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        if self.import_worker.is_some() {
            // Keep polling while the worker runs.
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("inputs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Selected Model:");
                let model_text = self
                    .model_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                ui.label(model_text);
                if ui.button("Select Model").clicked() {
                    self.open_dialog(FileDialogAction::PickModel);
                }
            });
            ui.horizontal(|ui| {
                ui.label(format!("Selected Results: {}", self.result_paths.len()));
                if ui.button("Add Result").clicked() {
                    self.open_dialog(FileDialogAction::AddResult);
                }
                if ui.button("Clear").clicked() {
                    self.result_paths.clear();
                }
            });
            ui.horizontal(|ui| {
                ui.add_enabled_ui(self.import_worker.is_none(), |ui| {
                    if ui.button("Import Data").clicked() {
                        self.start_import();
                    }
                });
                ui.checkbox(&mut self.parallel, "Parallel");
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.info);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Model Data");
            ui.label(&self.summary_text);
            ui.separator();

            ui.label("Create Envelope LC <LC#:FR#>:");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.envelope_entry);
                if ui.button("Create").clicked() {
                    self.create_envelope();
                }
            });
            ui.label(&self.envelope_created);
            ui.separator();

            ui.label("Create Derived LC <LC#:FR#>:");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.derived_entry);
                if ui.button("Create").clicked() {
                    self.create_derived();
                }
            });
            ui.label(&self.derived_created);
            ui.separator();

            ui.label("Select Ids:");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.ids_entry);
                if ui.button("Select").clicked() {
                    self.save_ids();
                }
            });
            ui.label(&self.ids_label);
            ui.separator();

            ui.label("Select LC:FR <LC#:FR#>:");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.cases_entry);
                if ui.button("Select").clicked() {
                    self.save_cases();
                }
            });
            ui.label(&self.cases_label);
            ui.separator();

            ui.heading("Force Report");
            ui.label(format!(
                "Result: {REPORT_QUANTITY}\nComponents: {}",
                REPORT_COMPONENTS.join(", ")
            ));
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.material_axes, "Material Axis");
                ui.add_enabled_ui(self.model.is_some(), |ui| {
                    if ui.button("Generate Report").clicked() {
                        self.open_dialog(FileDialogAction::SaveReport);
                    }
                });
            });
        });

        self.file_dialog.update(ctx);
        if let Some(path) = self.file_dialog.take_selected() {
            self.handle_picked_path(path.to_path_buf());
        }
    }
}
