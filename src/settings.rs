//! The immutable, pre-validated settings bundle (C2).
//!
//! `Settings` is built once per search and never mutated afterward.
//! Everything the search engine, attribute pipeline, scoring, and
//! infusion applier read comes from here or from the per-candidate
//! [`crate::character::Character`] state it seeds.

use crate::attribute::AttrId;
use crate::error::GearError;
use crate::gear::{Affix, AffixBonuses};
use crate::tables::GameData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The objective a search ranks candidates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankBy {
    Damage,
    Survivability,
    Healing,
}

/// Which of the five infusion allocation strategies (C6) to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfusionMode {
    /// No infusions applied.
    None,
    /// All infusions go to the primary attribute.
    Primary,
    /// Primary and secondary each get their max count (total within budget).
    Few,
    /// Enumerate every `(primary, secondary)` split, inserting each
    /// distinct valid candidate.
    Secondary,
    /// Enumerate every split but keep only the single best candidate.
    SecondaryNoDuplicates,
}

impl InfusionMode {
    /// Parse a mode name, as it would arrive from a caller-facing form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gearsolve::settings::InfusionMode;
    ///
    /// assert_eq!(InfusionMode::parse("few").unwrap(), InfusionMode::Few);
    /// assert!(InfusionMode::parse("quintuple").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, GearError> {
        match name {
            "none" => Ok(InfusionMode::None),
            "primary" => Ok(InfusionMode::Primary),
            "few" => Ok(InfusionMode::Few),
            "secondary" => Ok(InfusionMode::Secondary),
            "secondary-no-duplicates" => Ok(InfusionMode::SecondaryNoDuplicates),
            other => Err(GearError::UnknownInfusionMode(other.to_string())),
        }
    }
}

/// Infusion allocation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfusionSettings {
    pub mode: InfusionMode,
    /// Total infusions available across both attributes.
    pub max_infusions: u32,
    pub primary_attr: AttrId,
    pub secondary_attr: AttrId,
    /// Maximum infusions the primary attribute can individually absorb.
    pub primary_max: u32,
    /// Maximum infusions the secondary attribute can individually absorb.
    pub secondary_max: u32,
}

/// User-supplied lower/upper bounds on derived stats (`spec.md` §4.2).
///
/// All comparisons are strict: a candidate is rejected only when a
/// bound is actually violated, never on equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Constraints {
    /// Minimum Boon Duration, as a percent (e.g. `50.0` for 50%).
    pub min_boon_duration: Option<f64>,
    pub min_healing_power: Option<f64>,
    pub min_toughness: Option<f64>,
    pub max_toughness: Option<f64>,
    pub min_health: Option<f64>,
    /// Minimum Critical Chance, as a percent.
    pub min_crit_chance: Option<f64>,
}

/// The modifier bundle a preprocessing step hands to the engine:
/// conversions, buffs, post-buff conversions, and damage multipliers.
///
/// The engine does not decide which modifiers apply — that policy
/// lives upstream (`spec.md` §1 Non-goals); this is the ready-to-use
/// result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Pre-buff conversions: target attribute ← sum of `(source, percent)`
    /// read from `baseAttributes`.
    pub convert: HashMap<AttrId, Vec<(AttrId, f64)>>,
    /// Flat additive buffs applied after conversions.
    pub buff: HashMap<AttrId, f64>,
    /// Post-buff conversions: target attribute ← sum of `(source, percent)`
    /// read from the updated `attributes` map.
    pub convert_after_buffs: HashMap<AttrId, Vec<(AttrId, f64)>>,
    /// Named multipliers consulted by scoring, e.g. `"Critical Damage"`,
    /// `"Strike Damage"`, `"Siphon Damage"`, `"Condition Damage"`,
    /// `"{Condition} Damage"`, `"Damage Taken"`.
    pub damage_multiplier: HashMap<String, f64>,
    /// Whether the `bountiful-maintenance-oil` healing multiplier applies.
    pub bountiful_maintenance_oil: bool,
    /// A flat DPS addend included in the total Damage score.
    pub flat_dps: f64,
}

impl Modifiers {
    /// Look up a named multiplier, defaulting to `1.0` (neutral) when
    /// absent — unlike the additive scoring coefficients
    /// (`Power Coefficient`, `Siphon Base Coefficient`, …), which
    /// default to `0.0` on a character's attribute map, a *missing*
    /// multiplier means "this modifier bundle doesn't touch this dial",
    /// not "zero it out".
    pub fn damage_multiplier(&self, key: &str) -> f64 {
        self.damage_multiplier.get(key).copied().unwrap_or(1.0)
    }
}

/// One entry in the damage distribution: a display key and the
/// attribute holding its coefficient (e.g. `"Power Coefficient"`,
/// `"Torment Coefficient"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub key: String,
    pub coefficient_attr: AttrId,
}

/// The fully materialized, immutable settings bundle the engine is
/// constructed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Number of gear slots (fixes `Gear`'s length).
    pub slots: usize,
    /// Allowed affixes per slot, in canonical order (index 0 is the
    /// "default"/reused alternative in the search's expansion step).
    pub affixes_by_slot: Vec<Vec<Affix>>,
    /// Per-slot, per-affix attribute bonuses (already slot-weighted).
    pub affix_bonuses: Vec<HashMap<Affix, AffixBonuses>>,
    pub base_attributes: HashMap<AttrId, f64>,
    pub modifiers: Modifiers,
    pub distribution: Vec<DistributionEntry>,
    pub constraints: Constraints,
    pub rankby: RankBy,
    pub infusion: InfusionSettings,
    /// Conditions this build deals, in the order scoring iterates them.
    pub relevant_conditions: Vec<String>,
    /// Fraction of uptime the target spends moving (Torment).
    pub movement_uptime: f64,
    /// Attacks per second (Confusion).
    pub attack_rate: f64,
    pub forced_armor: bool,
    pub forced_ring: bool,
    pub forced_acc: bool,
    pub forced_wep: bool,
    pub max_results: usize,
    pub disable_condi_result_cache: bool,
    pub game_data: GameData,
    /// Precomputed `∏_{j ≥ k} |affixesArray[j]|`, used only for the
    /// approximate progress counter when symmetry pruning skips a
    /// subtree.
    pub runs_after_this_slot: Vec<u64>,
}

impl Settings {
    /// Validate and finish building a settings bundle.
    ///
    /// Computes `runs_after_this_slot` from `affixes_by_slot`. Returns
    /// [`GearError::InvalidSlotLayout`] if `affixes_by_slot` or
    /// `affix_bonuses` don't have exactly `slots` entries.
    pub fn finish(mut self) -> Result<Self, GearError> {
        if self.affixes_by_slot.len() != self.slots {
            return Err(GearError::InvalidSlotLayout(format!(
                "expected {} slots, affixes_by_slot has {}",
                self.slots,
                self.affixes_by_slot.len()
            )));
        }
        if self.affix_bonuses.len() != self.slots {
            return Err(GearError::InvalidSlotLayout(format!(
                "expected {} slots, affix_bonuses has {}",
                self.slots,
                self.affix_bonuses.len()
            )));
        }

        let mut runs = vec![0u64; self.slots + 1];
        runs[self.slots] = 1;
        for k in (0..self.slots).rev() {
            let count = self.affixes_by_slot[k].len().max(1) as u64;
            runs[k] = runs[k + 1] * count;
        }
        self.runs_after_this_slot = runs;
        Ok(self)
    }

    /// Whether the search space is empty (`spec.md` §8 seed scenario 1).
    pub fn is_empty_search_space(&self) -> bool {
        self.slots == 0 || self.affixes_by_slot.iter().any(|a| a.is_empty())
    }

    /// Look up the precomputed bonuses for `affix` in `slot`.
    pub fn bonuses_for(&self, slot: usize, affix: &Affix) -> &AffixBonuses {
        static EMPTY: Vec<(AttrId, f64)> = Vec::new();
        self.affix_bonuses[slot].get(affix).unwrap_or(&EMPTY)
    }
}

/// Display-only projection of [`Settings`], used by a UI layer that
/// does not need (and should not receive) the full search
/// configuration — profession, specialization, weapon, applied
/// modifier names, the ranking objective, and a handful of feature
/// flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinimalSettings {
    pub profession: String,
    pub specialization: String,
    pub weapon_type: String,
    pub applied_modifier_names: Vec<String>,
    pub rankby: Option<RankBy>,
    pub extras_enabled: bool,
}
