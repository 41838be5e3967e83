//! fp-formula: typed builder for the engine's load-case combination language.
//!
//! Post-processing engines accept combination rules as strings of
//! `<LC{id}:FR{frame}>` tokens, either summed with coefficients
//! (`1.5*<LC10:FR1>+<LC17500:FR1>`, a derived case) or comma-joined
//! (`<LC-1:FR0>,<LC-2:FR0>`, an envelope input list). Building those strings
//! by hand at call sites invites interpolation bugs, so this crate models a
//! formula as a list of typed terms and renders the string form only at the
//! engine boundary. The parser accepts the same language for user-entered
//! formulas.

pub mod parse;
pub mod term;

pub use parse::parse_formula;
pub use term::{Formula, Join, Term};

pub type FormulaResult<T> = Result<T, FormulaError>;

#[derive(thiserror::Error, Debug)]
pub enum FormulaError {
    #[error("Formula has no terms")]
    Empty,

    #[error("Envelope term lists take no coefficients (got {coeff})")]
    ListCoefficient { coeff: f64 },

    #[error("Coefficient must be finite (got {coeff})")]
    NonFiniteCoefficient { coeff: f64 },

    #[error("Parse error at byte {at}: {message}")]
    Parse { at: usize, message: String },
}
