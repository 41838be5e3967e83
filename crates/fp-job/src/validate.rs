//! Job validation, run on every load and save.

use thiserror::Error;

use crate::schema::Job;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("job.model must not be empty")]
    EmptyModelPath,

    #[error("job.results must list at least one result file")]
    NoResultFiles,

    #[error("job.combine.factor must be finite and positive (got {0})")]
    NonPositiveFactor(f64),

    #[error("job.combine.baseline must differ from job.combine.thermal_case")]
    BaselineIsThermal,

    #[error("job.export.quantity must not be empty")]
    EmptyQuantity,

    #[error("job.export.component must not be empty")]
    EmptyComponent,

    #[error("job.export.element_kind must not be empty when present")]
    EmptyElementKind,

    #[error("job.export.output must not be empty")]
    EmptyOutputPath,
}

pub fn validate_job(job: &Job) -> Result<(), ValidationError> {
    if job.model.as_os_str().is_empty() {
        return Err(ValidationError::EmptyModelPath);
    }
    if job.results.is_empty() {
        return Err(ValidationError::NoResultFiles);
    }
    if !job.combine.factor.is_finite() || job.combine.factor <= 0.0 {
        return Err(ValidationError::NonPositiveFactor(job.combine.factor));
    }
    if job.combine.baseline == Some(job.combine.thermal_case) {
        return Err(ValidationError::BaselineIsThermal);
    }
    if job.export.quantity.trim().is_empty() {
        return Err(ValidationError::EmptyQuantity);
    }
    if job.export.component.trim().is_empty() {
        return Err(ValidationError::EmptyComponent);
    }
    if matches!(&job.export.element_kind, Some(kind) if kind.trim().is_empty()) {
        return Err(ValidationError::EmptyElementKind);
    }
    if job.export.output.as_os_str().is_empty() {
        return Err(ValidationError::EmptyOutputPath);
    }
    Ok(())
}
