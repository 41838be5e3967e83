use core::fmt;
use core::num::NonZeroU32;

/// Engine-assigned dense index into result arrays.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<SeqIx>` to be pointer-optimized
///
/// A `SeqIx` is only meaningful for the lifetime of the model that assigned
/// it, and is the only valid index into result arrays produced by that model.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeqIx(NonZeroU32);

impl SeqIx {
    /// Create a SeqIx from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        // index+1 must be nonzero
        Self(NonZeroU32::new(index + 1).expect("index+1 is nonzero"))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for SeqIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeqIx({})", self.index())
    }
}

impl fmt::Display for SeqIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// User-facing load case number.
///
/// Solver subcases carry positive numbers; engines hand out negative numbers
/// for cases they synthesize (derived and envelope cases), keeping the two
/// ranges disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LcId(pub i64);

impl fmt::Display for LcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Increment/frame index within a load case.
///
/// Frame 0 is the case's own representative frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FrameIx(pub u32);

impl fmt::Display for FrameIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-facing element number from the source mesh. Distinct from `SeqIx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_ix_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let ix = SeqIx::from_index(i);
            assert_eq!(ix.index(), i as usize);
        }
    }

    #[test]
    fn option_seq_ix_is_small() {
        // This is a classic reason for NonZero: Option<SeqIx> can be same size as SeqIx.
        assert_eq!(
            core::mem::size_of::<SeqIx>(),
            core::mem::size_of::<Option<SeqIx>>()
        );
    }

    #[test]
    fn lc_id_displays_sign() {
        assert_eq!(LcId(17500).to_string(), "17500");
        assert_eq!(LcId(-2).to_string(), "-2");
    }
}
