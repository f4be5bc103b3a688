//! The Result Finalizer (C9): turns an accepted, fully-evaluated
//! `Character` into the display-ready summary a caller renders.

use crate::attribute::AttrId;
use crate::character::Character;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The linear response of total Damage to one distribution coefficient
/// being set uniformly to 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientResponse {
    pub slope: f64,
    pub intercept: f64,
}

/// Everything the Result Finalizer computes for one accepted character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// The `rankby` attribute's value.
    pub value: f64,
    /// C1's indicator attributes, formatted to 4 decimals with
    /// thousands grouping.
    pub indicators: HashMap<String, String>,
    /// Signed Damage delta (5 decimals) from adding 5 to each of
    /// Power, Precision, Ferocity, Condition Damage, Expertise.
    pub effective_positive_deltas: HashMap<String, String>,
    /// Signed Damage delta (5 decimals) from subtracting 5 (clamped at
    /// 0) from the same five attributes.
    pub effective_negative_deltas: HashMap<String, String>,
    /// Percent of total Damage from each distribution key, `"NN.N%"`.
    pub effective_damage_distribution: HashMap<String, String>,
    /// Raw DPS per distribution key, 2 decimals with thousands grouping.
    pub damage_breakdown: HashMap<String, String>,
    /// Per distribution key, the linear response of Damage to that
    /// key's coefficient going from 0 to 1.
    pub coefficient_helper: HashMap<String, CoefficientResponse>,
}

const SENSITIVITY_ATTRS: [&str; 5] = ["Power", "Precision", "Ferocity", "Condition Damage", "Expertise"];

fn format_grouped(x: f64, decimals: usize) -> String {
    let sign = if x < 0.0 { "-" } else { "" };
    let formatted = format!("{:.*}", decimals, x.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let grouped = group_thousands(int_part);
    if decimals == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

fn damage_dps_attr(key: &str) -> AttrId {
    if key == "Power" {
        AttrId::new("Power DPS")
    } else {
        AttrId::condition_attr(key, "DPS")
    }
}

/// Compute the full result summary for an accepted, evaluated
/// character (`spec.md` §4.9). `character.attributes` must already
/// hold a full, non-`no_rounding` evaluation (`ResultHeap` guarantees
/// this before calling in).
pub fn summarize(character: &Character) -> ResultSummary {
    let value = character.rank_score();

    let mut indicators = HashMap::new();
    for attr in &character.settings.game_data.indicators {
        let v = character.attributes.get(attr).copied().unwrap_or(0.0);
        indicators.insert(attr.as_str().to_string(), format_grouped(v, 4));
    }

    let mut baseline = character.clone();
    baseline.update_attributes(true);
    let baseline_damage = baseline.attributes.get(&AttrId::new("Damage")).copied().unwrap_or(0.0);

    let mut effective_positive_deltas = HashMap::new();
    let mut effective_negative_deltas = HashMap::new();
    for name in SENSITIVITY_ATTRS {
        let attr = AttrId::new(name);

        let mut plus = character.clone();
        *plus.base_attributes.entry(attr.clone()).or_insert(0.0) += 5.0;
        plus.update_attributes(true);
        let plus_damage = plus.attributes.get(&AttrId::new("Damage")).copied().unwrap_or(0.0);
        effective_positive_deltas.insert(name.to_string(), format_grouped(plus_damage - baseline_damage, 5));

        let mut minus = character.clone();
        let current = minus.base_attributes.get(&attr).copied().unwrap_or(0.0);
        minus.base_attributes.insert(attr, (current - 5.0).max(0.0));
        minus.update_attributes(true);
        let minus_damage = minus.attributes.get(&AttrId::new("Damage")).copied().unwrap_or(0.0);
        effective_negative_deltas.insert(name.to_string(), format_grouped(minus_damage - baseline_damage, 5));
    }

    let total_damage = character.attributes.get(&AttrId::new("Damage")).copied().unwrap_or(0.0);

    let mut effective_damage_distribution = HashMap::new();
    let mut damage_breakdown = HashMap::new();
    let mut coefficient_helper = HashMap::new();
    for entry in &character.settings.distribution {
        let dps = character.attributes.get(&damage_dps_attr(&entry.key)).copied().unwrap_or(0.0);
        let pct = if total_damage != 0.0 { dps / total_damage * 100.0 } else { 0.0 };
        effective_damage_distribution.insert(entry.key.clone(), format!("{pct:.1}%"));
        damage_breakdown.insert(entry.key.clone(), format_grouped(dps, 2));

        // Every other distribution key's coefficient must be zeroed, not
        // left at the character's baseline, or its contribution leaks into
        // this key's intercept and gets double-counted once per key when
        // the round-trip sum is taken over all keys.
        let mut at_zero = character.clone();
        for other in &character.settings.distribution {
            at_zero.base_attributes.insert(other.coefficient_attr.clone(), 0.0);
        }
        at_zero.update_attributes(true);
        let dps_at_zero = at_zero.attributes.get(&AttrId::new("Damage")).copied().unwrap_or(0.0);

        let mut at_one = character.clone();
        for other in &character.settings.distribution {
            at_one.base_attributes.insert(other.coefficient_attr.clone(), 0.0);
        }
        at_one.base_attributes.insert(entry.coefficient_attr.clone(), 1.0);
        at_one.update_attributes(true);
        let dps_at_one = at_one.attributes.get(&AttrId::new("Damage")).copied().unwrap_or(0.0);

        coefficient_helper.insert(
            entry.key.clone(),
            CoefficientResponse {
                slope: dps_at_one - dps_at_zero,
                intercept: dps_at_zero,
            },
        );
    }

    ResultSummary {
        value,
        indicators,
        effective_positive_deltas,
        effective_negative_deltas,
        effective_damage_distribution,
        damage_breakdown,
        coefficient_helper,
    }
}
