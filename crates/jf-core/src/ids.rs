use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier used across the engine model.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        let stored = index.checked_add(1).and_then(NonZeroU32::new);
        Self(stored.expect("index+1 is nonzero"))
    }

    /// Create an Id from a `usize` arena position.
    ///
    /// Panics if `index` does not fit in `u32`.
    pub fn from_usize(index: usize) -> Self {
        let index = u32::try_from(index).expect("arena position fits in u32");
        Self::from_index(index)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Recover the 0-based index as an arena position.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type CompId = Id;
pub type StreamId = Id;
pub type ShaftId = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
            assert_eq!(id.slot(), i as usize);
        }
    }

    #[test]
    fn option_id_is_small() {
        // This is a classic reason for NonZero: Option<Id> can be same size as Id.
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "arena position fits in u32")]
    fn oversized_position_panics() {
        Id::from_usize(u32::MAX as usize + 1);
    }

    #[test]
    fn display_uses_index() {
        assert_eq!(Id::from_usize(7).to_string(), "7");
    }
}
