//! Static game tables (C1).
//!
//! Read-only data supplied at construction: which attribute names round
//! (point attributes), per-condition damage coefficients, the infusion
//! bonus constant, and the list of attributes shown as display
//! indicators. None of this is authoritative game data — loading it
//! from the real game's data files is explicitly out of scope (see
//! `spec.md` §1); this module only defines the shapes and a small
//! reference instance used by the test suite.

use crate::attribute::AttrId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Per-tick damage coefficients for one condition.
///
/// Per-tick damage is `factor * ConditionDamage + base_damage`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionCoefficients {
    pub factor: f64,
    pub base_damage: f64,
}

/// Bonus granted by a single infusion slotted into an attribute.
pub const INFUSION_BONUS: f64 = 5.0;

/// The read-only static tables the engine is constructed with.
///
/// # Examples
///
/// ```rust
/// use gearsolve::tables::GameData;
///
/// let data = GameData::reference();
/// assert!(data.is_point_attribute("Power"));
/// assert!(!data.is_point_attribute("Critical Chance"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    /// Attribute names that round half-to-even on conversion.
    pub point_attributes: HashSet<AttrId>,
    /// Per-condition damage coefficients, including the synthetic
    /// `TormentMoving` and `ConfusionActive` entries.
    pub conditions: HashMap<String, ConditionCoefficients>,
    /// Attributes shown as display indicators by the result finalizer.
    pub indicators: Vec<AttrId>,
}

impl GameData {
    /// Whether `attr` is a point attribute (rounds on conversion).
    pub fn is_point_attribute(&self, attr: &str) -> bool {
        self.point_attributes.contains(&AttrId::new(attr))
    }

    /// Look up the per-tick coefficients for a condition by name.
    pub fn condition(&self, name: &str) -> Option<ConditionCoefficients> {
        self.conditions.get(name).copied()
    }

    /// Deserialize a `GameData` bundle from a JSON document, as a
    /// caller would load it from a game-data asset file. Loading the
    /// real game's attribute/condition tables is out of scope for this
    /// crate (`spec.md` §1); this only defines the wire shape.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Serialize this bundle back to JSON, e.g. for caching a
    /// caller-assembled table between runs.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// A reference table covering the attributes and conditions this
    /// crate's seed scenarios and tests exercise. Not a claim about the
    /// real game's numbers beyond what `spec.md` states explicitly.
    pub fn reference() -> Self {
        let point_attributes = [
            "Power",
            "Precision",
            "Ferocity",
            "Condition Damage",
            "Expertise",
            "Concentration",
            "Toughness",
            "Vitality",
            "Healing Power",
            "Health",
        ]
        .iter()
        .map(|s| AttrId::new(s))
        .collect();

        let mut conditions = HashMap::new();
        conditions.insert(
            "Bleeding".to_string(),
            ConditionCoefficients {
                factor: 0.05,
                base_damage: 22.0,
            },
        );
        conditions.insert(
            "Burning".to_string(),
            ConditionCoefficients {
                factor: 0.155,
                base_damage: 131.0,
            },
        );
        conditions.insert(
            "Torment".to_string(),
            ConditionCoefficients {
                factor: 0.05,
                base_damage: 18.0,
            },
        );
        conditions.insert(
            "TormentMoving".to_string(),
            ConditionCoefficients {
                factor: 0.1,
                base_damage: 36.0,
            },
        );
        conditions.insert(
            "Confusion".to_string(),
            ConditionCoefficients {
                factor: 0.03,
                base_damage: 9.0,
            },
        );
        conditions.insert(
            "ConfusionActive".to_string(),
            ConditionCoefficients {
                factor: 0.03,
                base_damage: 9.0,
            },
        );
        conditions.insert(
            "Poison".to_string(),
            ConditionCoefficients {
                factor: 0.06,
                base_damage: 17.0,
            },
        );

        let indicators = ["Power", "Precision", "Ferocity", "Condition Damage", "Health"]
            .iter()
            .map(|s| AttrId::new(s))
            .collect();

        GameData {
            point_attributes,
            conditions,
            indicators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_table_classifies_point_vs_derived() {
        let data = GameData::reference();
        assert!(data.is_point_attribute("Power"));
        assert!(data.is_point_attribute("Condition Damage"));
        assert!(!data.is_point_attribute("Critical Chance"));
        assert!(!data.is_point_attribute("Boon Duration"));
    }

    #[test]
    fn json_round_trip_preserves_point_attributes_and_conditions() {
        let data = GameData::reference();
        let json = data.to_json().unwrap();
        let restored = GameData::from_json(&json).unwrap();
        assert!(restored.is_point_attribute("Power"));
        assert!(restored.condition("Torment").is_some());
    }

    #[test]
    fn reference_table_has_torment_and_confusion_variants() {
        let data = GameData::reference();
        assert!(data.condition("Torment").is_some());
        assert!(data.condition("TormentMoving").is_some());
        assert!(data.condition("Confusion").is_some());
        assert!(data.condition("ConfusionActive").is_some());
    }
}
