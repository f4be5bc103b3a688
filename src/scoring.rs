//! Scoring functions (C4): Power DPS, per-condition DPS, survivability,
//! and healing, all read from a fully-derived attribute map and the
//! settings' damage multiplier table.

use crate::attribute::{clamp, AttrId};
use crate::condi_cache::CondiCache;
use crate::settings::{Modifiers, Settings};
use crate::tables::GameData;
use std::collections::HashMap;

fn get(attributes: &HashMap<AttrId, f64>, name: &str) -> f64 {
    attributes.get(&AttrId::new(name)).copied().unwrap_or(0.0)
}

/// The standard target armor value Power DPS is computed against.
pub const TARGET_ARMOR: f64 = 2597.0;

/// Power (+ siphon) DPS, `spec.md` §4.3.
///
/// Missing additive coefficients (`Power Coefficient`,
/// `Siphon Base Coefficient`) default to 0; missing multipliers default
/// to 1 (neutral — see [`Modifiers::damage_multiplier`]).
///
/// Writes `"Effective Power"`, `"Power DPS"`, and `"Siphon DPS"` back
/// into `attributes`, matching the side-effect contract condition
/// scoring already has. The original design assigned
/// `attributes["Siphon DPS"] = powerDamage` here — a copy-paste bug
/// `spec.md` §9 flags as OQ-4; this crate assigns the computed siphon
/// value instead, since nothing downstream needs bit-for-bit parity
/// with that mistake.
pub fn power_dps(attributes: &mut HashMap<AttrId, f64>, modifiers: &Modifiers) -> f64 {
    let crit_damage = get(attributes, "Critical Damage") * modifiers.damage_multiplier("Critical Damage");
    let crit_chance = clamp(get(attributes, "Critical Chance"), 0.0, 1.0);
    let power = get(attributes, "Power");
    let effective_power = power * (1.0 + crit_chance * (crit_damage - 1.0)) * modifiers.damage_multiplier("Strike Damage");

    let power_coefficient = get(attributes, "Power Coefficient");
    let power_dps = (power_coefficient / TARGET_ARMOR) * effective_power;

    let siphon_coefficient = get(attributes, "Siphon Base Coefficient");
    let siphon_dps = siphon_coefficient * modifiers.damage_multiplier("Siphon Damage");

    attributes.insert(AttrId::new("Effective Power"), effective_power);
    attributes.insert(AttrId::new("Power DPS"), power_dps);
    attributes.insert(AttrId::new("Siphon DPS"), siphon_dps);

    power_dps + siphon_dps
}

/// Per-condition DPS, `spec.md` §4.3.
///
/// Writes `"{c} Damage"`, `"{c} Stacks"`, and `"{c} DPS"` into
/// `attributes` for every relevant condition (the documented
/// side-effect contract), and returns the summed condition score.
pub fn condition_dps(
    attributes: &mut HashMap<AttrId, f64>,
    modifiers: &Modifiers,
    game_data: &GameData,
    relevant_conditions: &[String],
    movement_uptime: f64,
    attack_rate: f64,
) -> f64 {
    let expertise = get(attributes, "Expertise");
    let condition_duration_bonus = expertise / 1500.0;
    *attributes.entry(AttrId::new("Condition Duration")).or_insert(0.0) += condition_duration_bonus;
    let condition_duration = get(attributes, "Condition Duration");

    let condition_damage = get(attributes, "Condition Damage");

    let mut total = 0.0;
    for c in relevant_conditions {
        let mult = modifiers.damage_multiplier("Condition Damage") * modifiers.damage_multiplier(&format!("{c} Damage"));

        let tick = |name: &str| -> f64 {
            game_data
                .condition(name)
                .map(|coef| coef.factor * condition_damage + coef.base_damage)
                .unwrap_or(0.0)
        };

        let damage_c = if c == "Torment" {
            tick("Torment") * (1.0 - movement_uptime) + tick("TormentMoving") * movement_uptime
        } else if c == "Confusion" {
            tick("Confusion") + tick("ConfusionActive") * attack_rate
        } else {
            tick(c) * mult
        };

        let duration_attr = get(attributes, &format!("{c} Duration"));
        let duration = 1.0 + clamp(duration_attr + condition_duration, 0.0, 1.0);
        let stacks_attr = get(attributes, &format!("{c} Coefficient"));
        let stacks = stacks_attr * duration;

        let dps_c = stacks * damage_c;

        attributes.insert(AttrId::condition_attr(c, "Damage"), damage_c);
        attributes.insert(AttrId::condition_attr(c, "Stacks"), stacks);
        attributes.insert(AttrId::condition_attr(c, "DPS"), dps_c);

        total += dps_c;
    }
    total
}

/// Condition DPS through the fast path's memoization cache
/// (`spec.md` §4.4): skips the cache entirely when disabled or when
/// there are no relevant conditions.
pub fn condition_dps_cached(
    attributes: &mut HashMap<AttrId, f64>,
    settings: &Settings,
    cache: &mut CondiCache,
) -> f64 {
    if settings.disable_condi_result_cache || settings.relevant_conditions.is_empty() {
        return condition_dps(
            attributes,
            &settings.modifiers,
            &settings.game_data,
            &settings.relevant_conditions,
            settings.movement_uptime,
            settings.attack_rate,
        );
    }

    let expertise = get(attributes, "Expertise");
    let condition_damage = get(attributes, "Condition Damage");
    if let Some(score) = cache.get(expertise, condition_damage) {
        return score;
    }
    let score = condition_dps(
        attributes,
        &settings.modifiers,
        &settings.game_data,
        &settings.relevant_conditions,
        settings.movement_uptime,
        settings.attack_rate,
    );
    cache.insert(expertise, condition_damage, score);
    score
}

/// Effective health and survivability score, `spec.md` §4.3.
pub fn survivability(attributes: &HashMap<AttrId, f64>, modifiers: &Modifiers) -> f64 {
    let mut armor = get(attributes, "Armor");
    armor += get(attributes, "Toughness");
    let health = get(attributes, "Health");
    let damage_taken = modifiers.damage_multiplier("Damage Taken");
    let effective_health = health * armor / damage_taken;
    effective_health / 1967.0
}

/// Outgoing healing score, `spec.md` §4.3.
pub fn healing(attributes: &HashMap<AttrId, f64>, modifiers: &Modifiers) -> f64 {
    let healing_power = get(attributes, "Healing Power");
    let outgoing_healing = get(attributes, "Outgoing Healing");
    let mut effective_healing = (healing_power * 0.3 + 390.0) * (1.0 + outgoing_healing);
    if modifiers.bountiful_maintenance_oil {
        let concentration = get(attributes, "Concentration");
        effective_healing *= 1.0 + (healing_power * 0.6 + concentration * 0.8) / 10_000.0;
    }
    effective_healing
}

/// Total Damage score: power + condition + flat, `spec.md` §4.3.
pub fn total_damage(power: f64, condi: f64, modifiers: &Modifiers) -> f64 {
    power + condi + modifiers.flat_dps
}
