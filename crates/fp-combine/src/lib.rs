//! fp-combine: derived-case fan-out and envelope construction.
//!
//! Superposes a thermal case onto every mechanical case of a loaded model,
//! then builds two envelope cases over the derived set: one holding the
//! per-entity extreme values, one holding the ID of the case that produced
//! each extreme.

pub mod combine;
pub mod spec;

pub use combine::{EnvelopePair, combine};
pub use spec::CombineSpec;

use fp_core::LcId;

pub type CombineResult<T> = Result<T, CombineError>;

#[derive(thiserror::Error, Debug)]
pub enum CombineError {
    #[error("Thermal load case {0} is not present in the model")]
    UnknownThermal(LcId),

    #[error("Baseline load case {0} is not present in the model")]
    UnknownBaseline(LcId),

    #[error("Baseline load case {0} is also the thermal case")]
    BaselineIsThermal(LcId),

    #[error("Mechanical factor must be finite and positive (got {0})")]
    InvalidFactor(f64),

    #[error("No mechanical load case left to combine")]
    NoMechanicalCases,

    #[error(transparent)]
    Model(#[from] fp_model::ModelError),

    #[error(transparent)]
    Formula(#[from] fp_formula::FormulaError),
}
