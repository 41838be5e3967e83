//! Combination parameters.

use fp_core::{FrameIx, LcId};

/// What to superpose and how.
///
/// Older scripting around this workflow skipped the model's first load case
/// on positional grounds; that convention is not replicated here. The only
/// implicit exclusion from the mechanical set is the thermal case itself;
/// anything else to skip must be named in `baseline`.
#[derive(Debug, Clone, PartialEq)]
pub struct CombineSpec {
    /// The thermal case superposed onto every mechanical case.
    pub thermal: LcId,
    /// Scale factor applied to the mechanical contribution.
    pub factor: f64,
    /// Explicit reference case to exclude from the mechanical set, if any.
    pub baseline: Option<LcId>,
    /// Increment at which both contributions are evaluated.
    pub frame: FrameIx,
}

impl CombineSpec {
    pub const DEFAULT_FACTOR: f64 = 1.5;

    pub fn new(thermal: LcId) -> Self {
        Self {
            thermal,
            factor: Self::DEFAULT_FACTOR,
            baseline: None,
            frame: FrameIx(1),
        }
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_baseline(mut self, baseline: LcId) -> Self {
        self.baseline = Some(baseline);
        self
    }
}
