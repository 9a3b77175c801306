// vivify-core - Feature gate
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The feature gate: a bitset of optional target-syntax features.
//!
//! The gate is input-only. The parser refuses values whose type needs a
//! disabled feature; the emitter downgrades syntax (function expressions
//! instead of arrows, manual patches instead of `Object.assign`) when an
//! optional feature is absent. Both sides of one pipeline must observe
//! the same gate, which the envelope persists as raw bits.

use std::fmt;
use std::ops::{BitAnd, BitOr, Sub};

/// Bitset of target-syntax features.
///
/// # Examples
///
/// ```
/// use vivify_core::Feature;
///
/// let gate = Feature::LATEST - Feature::ARROW_FUNCTION;
/// assert!(gate.contains(Feature::MAP));
/// assert!(!gate.contains(Feature::ARROW_FUNCTION));
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Feature(u32);

impl Feature {
    pub const AGGREGATE_ERROR: Feature = Feature(1 << 0);
    pub const ARRAY_PROTOTYPE_VALUES: Feature = Feature(1 << 1);
    pub const ARROW_FUNCTION: Feature = Feature(1 << 2);
    pub const BIGINT: Feature = Feature(1 << 3);
    pub const ERROR_PROTOTYPE_STACK: Feature = Feature(1 << 4);
    pub const MAP: Feature = Feature(1 << 5);
    pub const METHOD_SHORTHAND: Feature = Feature(1 << 6);
    pub const OBJECT_ASSIGN: Feature = Feature(1 << 7);
    pub const PROMISE: Feature = Feature(1 << 8);
    pub const SET: Feature = Feature(1 << 9);
    pub const SYMBOL: Feature = Feature(1 << 10);
    pub const TYPED_ARRAY: Feature = Feature(1 << 11);
    pub const BIGINT_TYPED_ARRAY: Feature = Feature(1 << 12);
    pub const WEB_API: Feature = Feature(1 << 13);

    /// Every feature: the default gate.
    pub const LATEST: Feature = Feature((1 << 14) - 1);

    /// The empty gate.
    #[must_use]
    pub fn empty() -> Self {
        Feature(0)
    }

    /// True when every flag of `other` is present in `self`.
    #[inline]
    #[must_use]
    pub fn contains(self, other: Feature) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags present in either gate.
    #[inline]
    #[must_use]
    pub fn union(self, other: Feature) -> Feature {
        Feature(self.0 | other.0)
    }

    /// Flags of `self` not present in `other`.
    #[inline]
    #[must_use]
    pub fn difference(self, other: Feature) -> Feature {
        Feature(self.0 & !other.0)
    }

    /// True when no flags are set.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bits, for the envelope.
    #[inline]
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Rebuild from raw bits; unknown bits are dropped.
    #[inline]
    #[must_use]
    pub fn from_bits(bits: u32) -> Feature {
        Feature(bits & Self::LATEST.0)
    }
}

impl Default for Feature {
    fn default() -> Self {
        Feature::LATEST
    }
}

impl BitOr for Feature {
    type Output = Feature;

    fn bitor(self, rhs: Feature) -> Feature {
        self.union(rhs)
    }
}

impl BitAnd for Feature {
    type Output = Feature;

    fn bitand(self, rhs: Feature) -> Feature {
        Feature(self.0 & rhs.0)
    }
}

impl Sub for Feature {
    type Output = Feature;

    fn sub(self, rhs: Feature) -> Feature {
        self.difference(rhs)
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Feature, &str); 14] = [
            (Feature::AGGREGATE_ERROR, "AggregateError"),
            (Feature::ARRAY_PROTOTYPE_VALUES, "ArrayPrototypeValues"),
            (Feature::ARROW_FUNCTION, "ArrowFunction"),
            (Feature::BIGINT, "BigInt"),
            (Feature::ERROR_PROTOTYPE_STACK, "ErrorPrototypeStack"),
            (Feature::MAP, "Map"),
            (Feature::METHOD_SHORTHAND, "MethodShorthand"),
            (Feature::OBJECT_ASSIGN, "ObjectAssign"),
            (Feature::PROMISE, "Promise"),
            (Feature::SET, "Set"),
            (Feature::SYMBOL, "Symbol"),
            (Feature::TYPED_ARRAY, "TypedArray"),
            (Feature::BIGINT_TYPED_ARRAY, "BigIntTypedArray"),
            (Feature::WEB_API, "WebAPI"),
        ];
        let mut first = true;
        write!(f, "Feature(")?;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    write!(f, " | ")?;
                }
                first = false;
                write!(f, "{}", name)?;
            }
        }
        if first {
            write!(f, "empty")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_contains_every_flag() {
        assert!(Feature::LATEST.contains(Feature::AGGREGATE_ERROR));
        assert!(Feature::LATEST.contains(Feature::WEB_API));
        assert!(Feature::LATEST.contains(Feature::MAP | Feature::SET));
    }

    #[test]
    fn difference_removes_flags() {
        let gate = Feature::LATEST - Feature::MAP;
        assert!(!gate.contains(Feature::MAP));
        assert!(gate.contains(Feature::SET));
    }

    #[test]
    fn bits_round_trip() {
        let gate = Feature::MAP | Feature::SET | Feature::BIGINT;
        assert_eq!(Feature::from_bits(gate.bits()), gate);
        // Unknown bits are masked off.
        assert_eq!(Feature::from_bits(u32::MAX), Feature::LATEST);
    }

    #[test]
    fn empty_gate() {
        assert!(Feature::empty().is_empty());
        assert!(!Feature::empty().contains(Feature::MAP));
        // Every gate contains the empty gate.
        assert!(Feature::empty().contains(Feature::empty()));
    }
}
