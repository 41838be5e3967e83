use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fp_job::{CombineDef, ExportDef, Job};
use fp_model::file::{save_model_file, save_result_file};
use fp_model::{
    ElementDef, LoadCaseDef, MemBackend, ModelFile, ResultAxes, ResultBlockDef, ResultFile,
};

fn fx_block(case: i64, fx: Vec<f64>) -> ResultBlockDef {
    ResultBlockDef {
        case,
        frame: 1,
        quantity: "FORCES".to_string(),
        axes: ResultAxes::Element,
        components: BTreeMap::from([("FX".to_string(), fx)]),
    }
}

/// Thermal case 17500 bundled with the mesh; two mechanical subcases in
/// standalone result files.
fn write_fixture(dir: &Path) -> (PathBuf, Vec<PathBuf>) {
    let model = ModelFile {
        name: "webinar box".to_string(),
        nodes: 16,
        connectors: 2,
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
                id: 103,
                part: "skin".to_string(),
                kind: "CQUAD4".to_string(),
            },
            ElementDef {
                id: 900,
                part: "stiffener".to_string(),
                kind: "CBAR".to_string(),
            },
        ],
        load_cases: vec![LoadCaseDef {
            id: 17500,
            name: "thermal".to_string(),
        }],
        results: vec![fx_block(17500, vec![10.0, 0.0, -10.0, 5.0])],
    };
    let model_path = dir.join("subcase_17500.json");
    save_model_file(&model_path, &model).unwrap();

    let mech = [
        (17501, vec![1.0, 2.0, 3.0, 4.0]),
        (17502, vec![3.0, -2.0, 1.0, 0.0]),
    ];
    let mut result_paths = Vec::new();
    for (case, fx) in mech {
        let file = ResultFile {
            load_cases: vec![LoadCaseDef {
                id: case,
                name: format!("subcase {case}"),
            }],
            results: vec![fx_block(case, fx)],
        };
        let path = dir.join(format!("subcase_{case}.json"));
        save_result_file(&path, &file).unwrap();
        result_paths.push(path);
    }
    (model_path, result_paths)
}

fn fixture_job(dir: &Path) -> Job {
    let (model, results) = write_fixture(dir);
    Job {
        version: 1,
        name: "fx envelope".to_string(),
        model,
        results,
        parallel: false,
        combine: CombineDef {
            thermal_case: 17500,
            factor: 1.5,
            baseline: None,
        },
        export: ExportDef {
            quantity: "FORCES".to_string(),
            component: "FX".to_string(),
            element_kind: Some("CQUAD4".to_string()),
            output: dir.join("fx_cquad_envelope.csv"),
        },
    }
}

#[test]
fn envelope_job_end_to_end() {
    let dir = std::env::temp_dir().join("fp_app_pipeline_test");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let job = fixture_job(&dir);
    let outcome = fp_app::run_envelope_job(&MemBackend::new(), &job).unwrap();

    assert_eq!(outcome.derived_cases, 2);
    assert_eq!(outcome.rows, 3);

    // Hand-computed: d1 = 1.5*17501 + 17500, d2 = 1.5*17502 + 17500.
    //   d1 = [11.5, 3, -5.5, 11]   (case -1)
    //   d2 = [14.5, -3, -8.5, 5]   (case -2)
    // Extreme max over CQUAD4 entities with its contributor:
    let content = std::fs::read_to_string(&job.export.output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "ID_E,PARTS_E,FX,LoadCase");
    assert_eq!(lines[1], "101,skin,14.5,-2");
    assert_eq!(lines[2], "102,skin,3,-1");
    assert_eq!(lines[3], "103,skin,-5.5,-1");
}

#[test]
fn parallel_import_gives_the_same_answer() {
    let dir = std::env::temp_dir().join("fp_app_pipeline_parallel_test");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let mut job = fixture_job(&dir);
    job.parallel = true;
    let outcome = fp_app::run_envelope_job(&MemBackend::new(), &job).unwrap();
    assert_eq!(outcome.rows, 3);

    let content = std::fs::read_to_string(&job.export.output).unwrap();
    assert_eq!(content.lines().nth(1), Some("101,skin,14.5,-2"));
}

#[test]
fn missing_result_file_aborts_without_output() {
    let dir = std::env::temp_dir().join("fp_app_pipeline_missing_test");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let mut job = fixture_job(&dir);
    job.results.push(dir.join("subcase_17599.json"));
    let got = fp_app::run_envelope_job(&MemBackend::new(), &job);

    assert!(got.is_err());
    assert!(!job.export.output.exists());
}

#[test]
fn unknown_thermal_case_aborts_the_run() {
    let dir = std::env::temp_dir().join("fp_app_pipeline_thermal_test");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let mut job = fixture_job(&dir);
    job.combine.thermal_case = 99999;
    let got = fp_app::run_envelope_job(&MemBackend::new(), &job);

    assert!(matches!(got, Err(fp_app::AppError::Combine(_))));
}
