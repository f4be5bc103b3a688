//! A single candidate gear assignment under evaluation.

use crate::attribute::AttrId;
use crate::condi_cache::CondiCache;
use crate::finalize::ResultSummary;
use crate::gear::{Gear, GearStats};
use crate::pipeline;
use crate::scoring;
use crate::settings::{RankBy, Settings};
use std::collections::HashMap;
use std::sync::Arc;

/// A candidate evaluation: one gear assignment, its derived attributes,
/// and (once evaluated) its scores.
///
/// `settings` is a cheap `Arc` handle shared by every `Character` the
/// search produces — it is read-only for the engine's whole lifetime,
/// so cloning the handle is free. `gear`, `gear_stats`, `base_attributes`,
/// `attributes`, and `infusions` are owned per-candidate state.
#[derive(Debug, Clone)]
pub struct Character {
    pub settings: Arc<Settings>,
    pub gear: Gear,
    pub gear_stats: GearStats,
    pub base_attributes: HashMap<AttrId, f64>,
    pub attributes: HashMap<AttrId, f64>,
    pub valid: bool,
    pub infusions: HashMap<AttrId, f64>,
    pub id: String,
    /// Set once, by [`crate::heap::ResultHeap::insert_character`], for
    /// every character that is actually accepted into the result list.
    pub summary: Option<ResultSummary>,
}

impl Character {
    /// Build a character from a completed gear assignment, before any
    /// infusions or evaluation.
    pub fn new(settings: Arc<Settings>, gear: Gear, gear_stats: GearStats) -> Self {
        let base_attributes = pipeline::seed_base_attributes(&settings, &gear_stats, &HashMap::new());
        Character {
            settings,
            gear,
            gear_stats,
            base_attributes,
            attributes: HashMap::new(),
            valid: false,
            infusions: HashMap::new(),
            id: String::new(),
            summary: None,
        }
    }

    /// Re-derive `base_attributes` after `infusions` has changed.
    pub fn reseed_base_attributes(&mut self) {
        self.base_attributes = pipeline::seed_base_attributes(&self.settings, &self.gear_stats, &self.infusions);
    }

    /// Run the attribute pipeline (C3) only.
    pub fn calc_stats(&mut self, no_rounding: bool) {
        self.attributes = pipeline::calc_stats(
            &self.base_attributes,
            &self.settings.modifiers,
            &self.settings.game_data,
            no_rounding,
        );
    }

    /// Run the constraint check (§4.2), updating `self.valid`.
    ///
    /// Returns `true` iff the character is invalid.
    fn check_invalid(&mut self) -> bool {
        let invalid = pipeline::check_invalid(&self.attributes, &self.settings.constraints);
        self.valid = !invalid;
        invalid
    }

    /// The fast evaluation path (`spec.md` §4.4): rounded attribute
    /// pipeline, optional constraint check, and scoring restricted to
    /// the configured `rankby` objective.
    ///
    /// Returns `false` if the candidate failed validation (and
    /// `skip_validation` was not set).
    pub fn update_attributes_fast(&mut self, skip_validation: bool, cache: &mut CondiCache) -> bool {
        self.calc_stats(false);
        if !skip_validation && self.check_invalid() {
            return false;
        }
        self.valid = true;

        match self.settings.rankby {
            RankBy::Damage => {
                let power = scoring::power_dps(&mut self.attributes, &self.settings.modifiers);
                let condi = scoring::condition_dps_cached(&mut self.attributes, &self.settings, cache);
                let damage = scoring::total_damage(power, condi, &self.settings.modifiers);
                self.attributes.insert(AttrId::new("Damage"), damage);
            }
            RankBy::Survivability => {
                let survivability = scoring::survivability(&self.attributes, &self.settings.modifiers);
                self.attributes.insert(AttrId::new("Survivability"), survivability);
            }
            RankBy::Healing => {
                let healing = scoring::healing(&self.attributes, &self.settings.modifiers);
                self.attributes.insert(AttrId::new("Healing"), healing);
            }
        }
        true
    }

    /// The full evaluation path (`spec.md` §4.5): all four score
    /// families are computed and stored, regardless of `rankby`. Used
    /// only for accepted candidates and the ±5 sensitivity pass.
    pub fn update_attributes(&mut self, no_rounding: bool) {
        self.calc_stats(no_rounding);
        self.check_invalid();

        let power = scoring::power_dps(&mut self.attributes, &self.settings.modifiers);
        let condi = scoring::condition_dps(
            &mut self.attributes,
            &self.settings.modifiers,
            &self.settings.game_data,
            &self.settings.relevant_conditions,
            self.settings.movement_uptime,
            self.settings.attack_rate,
        );
        let damage = scoring::total_damage(power, condi, &self.settings.modifiers);
        self.attributes.insert(AttrId::new("Damage"), damage);

        let survivability = scoring::survivability(&self.attributes, &self.settings.modifiers);
        self.attributes.insert(AttrId::new("Survivability"), survivability);

        let healing = scoring::healing(&self.attributes, &self.settings.modifiers);
        self.attributes.insert(AttrId::new("Healing"), healing);
    }

    /// The attribute value this character is ranked by.
    pub fn rank_score(&self) -> f64 {
        let name = match self.settings.rankby {
            RankBy::Damage => "Damage",
            RankBy::Survivability => "Survivability",
            RankBy::Healing => "Healing",
        };
        self.attributes.get(&AttrId::new(name)).copied().unwrap_or(0.0)
    }

    /// The tiebreak attribute for this character's `rankby`
    /// (`spec.md` §4.7): Survivability for Damage, Damage otherwise.
    pub fn tiebreak_score(&self) -> f64 {
        let name = match self.settings.rankby {
            RankBy::Damage => "Survivability",
            RankBy::Survivability | RankBy::Healing => "Damage",
        };
        self.attributes.get(&AttrId::new(name)).copied().unwrap_or(0.0)
    }
}
