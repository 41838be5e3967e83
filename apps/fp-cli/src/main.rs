use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use fp_app::{AppError, AppResult, model_service, query, report_service};
use fp_core::ElementId;
use fp_model::{FeModel, LoadOptions, MemBackend, ResultAxes};
use fp_report::ReportSpec;

#[derive(Parser)]
#[command(name = "fp-cli")]
#[command(about = "fepost CLI - FE post-processing workflows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a job file without running it
    Validate {
        /// Path to the job YAML file
        job_path: PathBuf,
    },
    /// Load a model and print a content summary
    Summary {
        /// Path to the model file
        model_path: PathBuf,
        /// Result files to import after loading
        #[arg(long)]
        results: Vec<PathBuf>,
        /// Ask the engine for internal parallel processing
        #[arg(long)]
        parallel: bool,
    },
    /// Run an envelope job: combine, envelope and export
    Run {
        /// Path to the job YAML file
        job_path: PathBuf,
    },
    /// Generate a multi-component force report
    Report {
        /// Path to the model file
        model_path: PathBuf,
        /// Result files to import after loading
        #[arg(long)]
        results: Vec<PathBuf>,
        /// Case selection: ALL, or a <LC#:FR#> list
        #[arg(long, default_value = "ALL")]
        cases: String,
        /// Result quantity to report
        #[arg(long, default_value = "FORCES")]
        quantity: String,
        /// Comma-separated component names
        #[arg(long, default_value = "FX,FY,FXY")]
        components: String,
        /// Report in material axes instead of element axes
        #[arg(long)]
        material_axes: bool,
        /// Restrict to one element kind (e.g. CQUAD4)
        #[arg(long)]
        element_kind: Option<String>,
        /// Comma-separated element IDs (overrides --element-kind)
        #[arg(long)]
        ids: Option<String>,
        /// Output CSV file path
        #[arg(short, long)]
        output: PathBuf,
        /// Also write a JSON manifest next to the CSV
        #[arg(long)]
        manifest: bool,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { job_path } => cmd_validate(&job_path),
        Commands::Summary {
            model_path,
            results,
            parallel,
        } => cmd_summary(&model_path, &results, parallel),
        Commands::Run { job_path } => cmd_run(&job_path),
        Commands::Report {
            model_path,
            results,
            cases,
            quantity,
            components,
            material_axes,
            element_kind,
            ids,
            output,
            manifest,
        } => cmd_report(
            &model_path,
            &results,
            &cases,
            &quantity,
            &components,
            material_axes,
            element_kind,
            ids,
            &output,
            manifest,
        ),
    }
}

fn cmd_validate(job_path: &Path) -> AppResult<()> {
    println!("Validating job: {}", job_path.display());
    fp_job::load_yaml(job_path)?;
    println!("✓ Job is valid");
    Ok(())
}

fn load_with_results(
    model_path: &Path,
    results: &[PathBuf],
    parallel: bool,
) -> AppResult<Box<dyn FeModel>> {
    let backend = MemBackend::new();
    let mut model = model_service::load_model(&backend, model_path, &LoadOptions { parallel })?;
    if !results.is_empty() {
        model_service::import_results(model.as_mut(), results)?;
    }
    Ok(model)
}

fn cmd_summary(model_path: &Path, results: &[PathBuf], parallel: bool) -> AppResult<()> {
    let model = load_with_results(model_path, results, parallel)?;
    let summary = query::model_summary(model.as_ref());

    println!("Model: {}", summary.name);
    println!("  Elements: {}", summary.elements);
    println!("  Nodes: {}", summary.nodes);
    println!("  Connectors: {}", summary.connectors);
    println!("  Coordinate systems: {}", summary.coord_systems);
    println!("  Load cases: {}", summary.load_cases.len());
    for (id, kind, name) in query::case_listing(model.as_ref()) {
        println!("    {} ({:?}) - {}", id, kind, name);
    }
    Ok(())
}

fn cmd_run(job_path: &Path) -> AppResult<()> {
    let job = fp_job::load_yaml(job_path)?;
    println!("Running envelope job: {}", job.name);

    let outcome = fp_app::run_envelope_job(&MemBackend::new(), &job)?;

    println!("✓ Created {} derived load cases", outcome.derived_cases);
    println!(
        "✓ Envelope cases: {} (values), {} (contributors)",
        outcome.envelopes.by_value, outcome.envelopes.by_case
    );
    println!(
        "✓ Exported {} rows to {}",
        outcome.rows,
        outcome.output.display()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_report(
    model_path: &Path,
    results: &[PathBuf],
    cases: &str,
    quantity: &str,
    components: &str,
    material_axes: bool,
    element_kind: Option<String>,
    ids: Option<String>,
    output: &Path,
    manifest: bool,
) -> AppResult<()> {
    let model = load_with_results(model_path, results, false)?;

    let spec = ReportSpec {
        cases: report_service::expand_case_selection(model.as_ref(), cases)?,
        quantity: quantity.to_string(),
        components: components
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        axes: if material_axes {
            ResultAxes::Material
        } else {
            ResultAxes::Element
        },
        element_kind,
        element_ids: ids.as_deref().map(parse_ids).transpose()?,
    };

    let manifest_path = manifest.then(|| output.with_extension("manifest.json"));
    let outcome =
        report_service::generate_report(model.as_ref(), spec, output, manifest_path.as_deref())?;

    println!(
        "✓ Report {} ({} rows) written to {}",
        &outcome.report_id[..12],
        outcome.rows,
        outcome.output.display()
    );
    Ok(())
}

fn parse_ids(input: &str) -> AppResult<Vec<ElementId>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map(ElementId)
                .map_err(|_| AppError::InvalidInput(format!("invalid element ID `{s}`")))
        })
        .collect()
}
