//! fp-job: the workflow job file format and its validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_job};

pub type JobResult<T> = Result<T, JobError>;

#[derive(thiserror::Error, Debug)]
pub enum JobError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn load_yaml(path: &std::path::Path) -> JobResult<Job> {
    let content = std::fs::read_to_string(path)?;
    let job: Job = serde_yaml::from_str(&content)?;
    validate_job(&job)?;
    Ok(job)
}

pub fn save_yaml(path: &std::path::Path, job: &Job) -> JobResult<()> {
    validate_job(job)?;
    let content = serde_yaml::to_string(job)?;
    std::fs::write(path, content)?;
    Ok(())
}
