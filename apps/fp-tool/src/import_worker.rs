use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use fp_model::{FeModel, LoadOptions, MemBackend};

/// Loads a mesh and imports results off the UI thread.
pub struct ImportWorker {
    pub message_rx: Receiver<WorkerMessage>,
    _handle: JoinHandle<()>,
}

pub enum WorkerMessage {
    Loaded {
        model: Box<dyn FeModel>,
        elapsed_s: f64,
    },
    Error {
        message: String,
    },
}

impl ImportWorker {
    pub fn start(model_path: PathBuf, result_paths: Vec<PathBuf>, parallel: bool) -> Self {
        let (tx, rx) = channel();

        let handle = thread::spawn(move || {
            if let Err(message) = Self::import(model_path, result_paths, parallel, &tx) {
                let _ = tx.send(WorkerMessage::Error { message });
            }
        });

        Self {
            message_rx: rx,
            _handle: handle,
        }
    }

    fn import(
        model_path: PathBuf,
        result_paths: Vec<PathBuf>,
        parallel: bool,
        tx: &Sender<WorkerMessage>,
    ) -> Result<(), String> {
        let backend = MemBackend::new();
        let started = Instant::now();

        let mut model =
            fp_app::load_model(&backend, &model_path, &LoadOptions { parallel })
                .map_err(|e| e.to_string())?;
        if !result_paths.is_empty() {
            fp_app::import_results(model.as_mut(), &result_paths).map_err(|e| e.to_string())?;
        }

        let _ = tx.send(WorkerMessage::Loaded {
            model,
            elapsed_s: started.elapsed().as_secs_f64(),
        });
        Ok(())
    }
}
