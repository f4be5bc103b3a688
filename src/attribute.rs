//! Attribute identifiers and the half-to-even rounding rule.
//!
//! Provides [`AttrId`], an interned string identifier for attributes
//! (point attributes like Power, derived stats like Critical Chance,
//! and the per-condition synthetic attributes `"{Condition} Damage"` /
//! `"{Condition} Stacks"` / `"{Condition} DPS"`), and [`PointKind`],
//! which distinguishes the attributes that round on conversion from
//! those that don't.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Interned string identifier for an attribute.
///
/// Uses `Arc<str>` for cheap cloning and fast equality, exactly like a
/// gear slot's affix identifiers: many `Character`s reference the same
/// attribute names, so interning avoids a fresh heap allocation per
/// candidate.
///
/// # Examples
///
/// ```rust
/// use gearsolve::attribute::AttrId;
///
/// let power = AttrId::new("Power");
/// let power2: AttrId = "Power".into();
/// assert_eq!(power, power2);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttrId(Arc<str>);

impl AttrId {
    /// Create an `AttrId` from a string slice.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the synthetic identifier for a per-condition attribute,
    /// e.g. `condition_attr("Torment", "DPS")` → `"Torment DPS"`.
    pub fn condition_attr(condition: &str, suffix: &str) -> Self {
        Self(Arc::from(format!("{condition} {suffix}")))
    }
}

impl From<&str> for AttrId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AttrId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for AttrId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AttrId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AttrId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(AttrId::from(s))
    }
}

/// Whether an attribute rounds half-to-even on conversion.
///
/// Point attributes (Power, Precision, Ferocity, Condition Damage, …)
/// round; derived attributes (Critical Chance, Boon Duration, the
/// per-condition DPS/Stacks values, …) never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    /// Rounds half-to-even when written by a conversion.
    Point,
    /// Never rounds.
    Derived,
}

/// Round `x` to the nearest integer, breaking exact ties toward the
/// nearest even integer ("banker's rounding").
///
/// This must match in-game behavior exactly: a fractional part of
/// precisely `0.5` resolves to whichever neighbor is even, not always
/// up. `round_even(x + 0.5) == round_even(x + 0.5 + 2k)` for any
/// integer `k` — the result's parity is independent of magnitude.
///
/// # Examples
///
/// ```rust
/// use gearsolve::attribute::round_even;
///
/// assert_eq!(round_even(1.5), 2.0);
/// assert_eq!(round_even(2.5), 2.0);
/// assert_eq!(round_even(3.5), 4.0);
/// assert_eq!(round_even(-2.5), -2.0);
/// ```
pub fn round_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    if diff < 0.5 {
        floor
    } else if diff > 0.5 {
        floor + 1.0
    } else {
        // Exactly .5: round to the even neighbor.
        if (floor as i64) % 2 == 0 {
            floor
        } else {
            floor + 1.0
        }
    }
}

/// Clamp `x` into `[lo, hi]`.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_id_equality_and_display() {
        let a = AttrId::new("Power");
        let b: AttrId = "Power".into();
        assert_eq!(a, b);
        assert_eq!(format!("{a}"), "Power");
    }

    #[test]
    fn condition_attr_builds_synthetic_name() {
        let dps = AttrId::condition_attr("Torment", "DPS");
        assert_eq!(dps.as_str(), "Torment DPS");
    }

    #[test]
    fn round_even_ties_go_to_even_neighbor() {
        assert_eq!(round_even(0.5), 0.0);
        assert_eq!(round_even(1.5), 2.0);
        assert_eq!(round_even(2.5), 2.0);
        assert_eq!(round_even(3.5), 4.0);
        assert_eq!(round_even(4.5), 4.0);
    }

    #[test]
    fn round_even_non_tie_rounds_normally() {
        assert_eq!(round_even(1.2), 1.0);
        assert_eq!(round_even(1.8), 2.0);
        assert_eq!(round_even(-1.2), -1.0);
    }

    #[test]
    fn round_even_parity_independent_of_magnitude() {
        for k in -5..5 {
            let shifted = 0.5 + 2.0 * k as f64;
            assert_eq!(round_even(0.5), round_even(shifted) - 2.0 * k as f64);
        }
    }

    #[test]
    fn clamp_bounds_value() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }
}
