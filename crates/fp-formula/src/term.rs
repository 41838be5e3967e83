//! Formula terms and rendering.

use core::fmt;
use fp_core::{FrameIx, LcId};

use crate::{FormulaError, FormulaResult};

/// One `<LC{id}:FR{frame}>` reference, scaled by a coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub case: LcId,
    pub frame: FrameIx,
    pub coeff: f64,
}

impl Term {
    pub fn new(case: LcId, frame: FrameIx, coeff: f64) -> Self {
        Self { case, frame, coeff }
    }

    /// Unit-coefficient reference, as used in envelope term lists.
    pub fn unit(case: LcId, frame: FrameIx) -> Self {
        Self::new(case, frame, 1.0)
    }
}

/// How the terms of a formula are joined in the engine string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// Arithmetic sum with coefficients: a derived-case combination rule.
    Sum,
    /// Comma-joined list of unit references: an envelope input list.
    List,
}

/// A validated, typed combination formula.
///
/// Construct via [`Formula::combination`] or [`Formula::envelope`]; both
/// reject empty term lists, so a `Formula` always renders to a non-empty
/// engine string.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    join: Join,
    terms: Vec<Term>,
}

impl Formula {
    /// Build a derived-case combination (sum of scaled terms).
    pub fn combination(terms: Vec<Term>) -> FormulaResult<Self> {
        if terms.is_empty() {
            return Err(FormulaError::Empty);
        }
        for t in &terms {
            if !t.coeff.is_finite() {
                return Err(FormulaError::NonFiniteCoefficient { coeff: t.coeff });
            }
        }
        Ok(Self {
            join: Join::Sum,
            terms,
        })
    }

    /// Build an envelope input list from (case, frame) references.
    pub fn envelope(refs: impl IntoIterator<Item = (LcId, FrameIx)>) -> FormulaResult<Self> {
        let terms: Vec<Term> = refs
            .into_iter()
            .map(|(case, frame)| Term::unit(case, frame))
            .collect();
        if terms.is_empty() {
            return Err(FormulaError::Empty);
        }
        Ok(Self {
            join: Join::List,
            terms,
        })
    }

    /// Rebuild from already-parsed parts, revalidating list coefficients.
    pub(crate) fn from_parts(join: Join, terms: Vec<Term>) -> FormulaResult<Self> {
        if terms.is_empty() {
            return Err(FormulaError::Empty);
        }
        if join == Join::List {
            if let Some(t) = terms.iter().find(|t| t.coeff != 1.0) {
                return Err(FormulaError::ListCoefficient { coeff: t.coeff });
            }
        }
        for t in &terms {
            if !t.coeff.is_finite() {
                return Err(FormulaError::NonFiniteCoefficient { coeff: t.coeff });
            }
        }
        Ok(Self { join, terms })
    }

    pub fn join(&self) -> Join {
        self.join
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Render the engine string form.
    ///
    /// Unit coefficients are left implicit, matching the form the engines
    /// document (`1.5*<LC10:FR1>+<LC17500:FR1>`, not `...+1*<LC17500:FR1>`).
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, t) in self.terms.iter().enumerate() {
            if i > 0 {
                out.push(match self.join {
                    Join::Sum => '+',
                    Join::List => ',',
                });
            }
            if self.join == Join::Sum && t.coeff != 1.0 {
                let _ = fmt::Write::write_fmt(&mut out, format_args!("{}*", t.coeff));
            }
            let _ = fmt::Write::write_fmt(&mut out, format_args!("<LC{}:FR{}>", t.case, t.frame));
        }
        out
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combination_renders_coefficients() {
        let f = Formula::combination(vec![
            Term::new(LcId(10), FrameIx(1), 1.5),
            Term::unit(LcId(17500), FrameIx(1)),
        ])
        .unwrap();
        assert_eq!(f.render(), "1.5*<LC10:FR1>+<LC17500:FR1>");
    }

    #[test]
    fn envelope_renders_comma_list() {
        let f = Formula::envelope([
            (LcId(-1), FrameIx(0)),
            (LcId(-2), FrameIx(0)),
        ])
        .unwrap();
        assert_eq!(f.render(), "<LC-1:FR0>,<LC-2:FR0>");
    }

    #[test]
    fn empty_formulas_are_rejected() {
        assert!(matches!(
            Formula::combination(vec![]),
            Err(FormulaError::Empty)
        ));
        assert!(matches!(
            Formula::envelope(std::iter::empty()),
            Err(FormulaError::Empty)
        ));
    }

    #[test]
    fn non_finite_coefficient_is_rejected() {
        let got = Formula::combination(vec![Term::new(LcId(1), FrameIx(1), f64::NAN)]);
        assert!(matches!(
            got,
            Err(FormulaError::NonFiniteCoefficient { .. })
        ));
    }
}
