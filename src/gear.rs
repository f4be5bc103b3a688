//! Affixes, gear assignments, and their accumulated stat bonuses.

use crate::attribute::AttrId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An opaque affix identifier, e.g. `Berserker`, `Assassin`.
///
/// Affixes are ordered by their position in a slot's canonical affix
/// list (`spec.md` §3) — that stable order is what the search engine's
/// symmetry pruning compares against, not any lexical property of the
/// name.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affix(pub String);

impl Affix {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for Affix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `(attribute, bonus)` pairs a single affix grants in a single
/// slot, pre-multiplied by that slot's weight.
pub type AffixBonuses = Vec<(AttrId, f64)>;

/// A gear assignment: one affix per slot, in slot order.
///
/// Indices carry the symmetry semantics documented in `spec.md` §3
/// (armor triples, ring pair, accessory pair, weapon pair); the engine
/// reads the `forced_*` flags on [`crate::settings::Settings`] rather
/// than hardcoding slot counts.
pub type Gear = Vec<Affix>;

/// Accumulated attribute bonuses from the gear chosen so far.
///
/// Invariant: for any prefix `gear[0..k]`, `GearStats` equals the sum
/// of `affix_bonuses(slot, gear[slot])` for `slot < k`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GearStats(pub HashMap<AttrId, f64>);

impl GearStats {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Add another slot's bonuses onto this accumulator, returning a
    /// new `GearStats` (the search engine pushes a fresh accumulator
    /// per stack entry rather than mutating a shared one).
    pub fn plus(&self, bonuses: &AffixBonuses) -> GearStats {
        let mut out = self.0.clone();
        for (attr, bonus) in bonuses {
            *out.entry(attr.clone()).or_insert(0.0) += bonus;
        }
        GearStats(out)
    }

    pub fn get(&self, attr: &AttrId) -> f64 {
        self.0.get(attr).copied().unwrap_or(0.0)
    }
}
