//! The attribute derivation pipeline (C3) and constraint check (§4.2).
//!
//! `calc_stats` is a pure, deterministic function: base attributes plus
//! gear stats in, a full attribute map out. It applies, strictly in
//! order: pre-buff conversions, buffs, derived primaries, then
//! post-buff conversions — exactly the order in `spec.md` §4.1, with
//! half-to-even rounding on point attributes unless `no_rounding` is
//! set.

use crate::attribute::{clamp, round_even, AttrId};
use crate::settings::{Constraints, Modifiers, Settings};
use std::collections::HashMap;

/// Run the full attribute pipeline against `base_attributes`.
///
/// `base_attributes` already includes the settings' base attributes
/// plus the candidate's accumulated gear stats and any infusions — the
/// pipeline itself does not know about gear or infusions, only about
/// conversions, buffs, and derived formulas.
///
/// # Examples
///
/// ```rust
/// use gearsolve::pipeline::calc_stats;
/// use gearsolve::settings::Modifiers;
/// use gearsolve::tables::GameData;
/// use std::collections::HashMap;
///
/// let mut base = HashMap::new();
/// base.insert("Power".into(), 1000.0);
/// base.insert("Precision".into(), 1000.0);
///
/// let attrs = calc_stats(&base, &Modifiers::default(), &GameData::reference(), false);
/// assert_eq!(attrs.get(&"Power".into()).copied().unwrap(), 1000.0);
/// ```
pub fn calc_stats(
    base_attributes: &HashMap<AttrId, f64>,
    modifiers: &Modifiers,
    game_data: &crate::tables::GameData,
    no_rounding: bool,
) -> HashMap<AttrId, f64> {
    // Step 1: start from a by-value copy of the base attributes.
    let mut attributes = base_attributes.clone();

    // Step 2: pre-buff conversions. Sources are read from
    // `base_attributes`, never from the map being written. Each
    // source's delta rounds individually before being added — rounding
    // the summed total instead would not equal the sum of the
    // per-source roundings, since half-to-even rounding is non-linear.
    for (target, sources) in &modifiers.convert {
        let is_point = game_data.is_point_attribute(target.as_str());
        for (source, percent) in sources {
            let source_value = base_attributes.get(source).copied().unwrap_or(0.0);
            let mut delta = source_value * percent;
            if is_point && !no_rounding {
                delta = round_even(delta);
            }
            *attributes.entry(target.clone()).or_insert(0.0) += delta;
        }
    }

    // Step 3: flat buffs.
    for (attr, bonus) in &modifiers.buff {
        *attributes.entry(attr.clone()).or_insert(0.0) += bonus;
    }

    // Step 4: derived primaries.
    let precision = attributes.get(&AttrId::new("Precision")).copied().unwrap_or(0.0);
    *attributes.entry(AttrId::new("Critical Chance")).or_insert(0.0) += (precision - 1000.0) / 2100.0;

    let ferocity = attributes.get(&AttrId::new("Ferocity")).copied().unwrap_or(0.0);
    *attributes.entry(AttrId::new("Critical Damage")).or_insert(0.0) += ferocity / 1500.0;

    let concentration = attributes.get(&AttrId::new("Concentration")).copied().unwrap_or(0.0);
    *attributes.entry(AttrId::new("Boon Duration")).or_insert(0.0) += concentration / 1500.0;

    let health = attributes.get(&AttrId::new("Health")).copied().unwrap_or(0.0);
    let vitality = attributes.get(&AttrId::new("Vitality")).copied().unwrap_or(0.0);
    let max_health_bonus = attributes.get(&AttrId::new("Maximum Health")).copied().unwrap_or(0.0);
    let mut derived_health = (health + vitality * 10.0) * (1.0 + max_health_bonus);
    if !no_rounding {
        derived_health = round_even(derived_health);
    }
    attributes.insert(AttrId::new("Health"), derived_health);

    // Step 5: post-buff conversions. Each source's delta rounds
    // individually, same reasoning as step 2.
    for (target, sources) in &modifiers.convert_after_buffs {
        let is_point = game_data.is_point_attribute(target.as_str());
        for (source, percent) in sources {
            let source_value = post_buff_source_value(&attributes, source.as_str());
            let mut delta = source_value * percent;
            if is_point && !no_rounding {
                delta = round_even(delta);
            }
            *attributes.entry(target.clone()).or_insert(0.0) += delta;
        }
    }

    attributes
}

/// Resolve a post-buff conversion source name, handling the
/// `"Critical Chance"` and `"Critical Chance -X"` special cases
/// (`spec.md` §4.1 step 5).
///
/// `"Critical Chance -37"` is the one branch `spec.md` §9 calls out as
/// buggy in the original design (a redundant second addend reading a
/// literal attribute named `"Critical Chance -37"`, which never
/// exists). This crate implements only the documented clamp, per the
/// Open Question's recommendation.
fn post_buff_source_value(attributes: &HashMap<AttrId, f64>, source: &str) -> f64 {
    if source == "Critical Chance" {
        let cc = attributes.get(&AttrId::new("Critical Chance")).copied().unwrap_or(0.0);
        return clamp(cc, 0.0, 1.0);
    }
    if let Some(rest) = source.strip_prefix("Critical Chance -") {
        if let Ok(x) = rest.parse::<f64>() {
            let cc = attributes.get(&AttrId::new("Critical Chance")).copied().unwrap_or(0.0);
            return clamp(cc - x / 100.0, 0.0, 1.0);
        }
    }
    attributes.get(&AttrId::new(source)).copied().unwrap_or(0.0)
}

/// Check the five bound constraints (`spec.md` §4.2).
///
/// Returns `true` (invalid) iff any configured bound is strictly
/// violated. Comparisons use strict `<` / `>`, never `<=` / `>=`.
pub fn check_invalid(attributes: &HashMap<AttrId, f64>, constraints: &Constraints) -> bool {
    let get = |name: &str| attributes.get(&AttrId::new(name)).copied().unwrap_or(0.0);

    if let Some(min) = constraints.min_boon_duration {
        if get("Boon Duration") < min / 100.0 {
            return true;
        }
    }
    if let Some(min) = constraints.min_healing_power {
        if get("Healing Power") < min {
            return true;
        }
    }
    if let Some(min) = constraints.min_toughness {
        if get("Toughness") < min {
            return true;
        }
    }
    if let Some(max) = constraints.max_toughness {
        if get("Toughness") > max {
            return true;
        }
    }
    if let Some(min) = constraints.min_health {
        if get("Health") < min {
            return true;
        }
    }
    if let Some(min) = constraints.min_crit_chance {
        if get("Critical Chance") < min / 100.0 {
            return true;
        }
    }
    false
}

/// Build the `base_attributes` a character's pipeline run starts from:
/// settings' base attributes, plus gear stats, plus infusions.
pub fn seed_base_attributes(
    settings: &Settings,
    gear_stats: &crate::gear::GearStats,
    infusions: &HashMap<AttrId, f64>,
) -> HashMap<AttrId, f64> {
    let mut base = settings.base_attributes.clone();
    for (attr, bonus) in &gear_stats.0 {
        *base.entry(attr.clone()).or_insert(0.0) += bonus;
    }
    for (attr, bonus) in infusions {
        // `bonus` already carries `count * INFUSION_BONUS` (see infusion.rs).
        *base.entry(attr.clone()).or_insert(0.0) += bonus;
    }
    base
}
