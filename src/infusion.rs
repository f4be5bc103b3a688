//! The Infusion Applier (C6): the five infusion allocation strategies
//! a leaf gear assignment is run through before the result is scored
//! and offered to the heap.

use crate::character::Character;
use crate::condi_cache::CondiCache;
use crate::heap::{cmp_better, ResultHeap};
use crate::settings::{InfusionMode, InfusionSettings};
use crate::tables::INFUSION_BONUS;
use std::cmp::Ordering;

/// Evaluate (fast path) and offer a single candidate to the heap.
fn evaluate_and_offer(c: &mut Character, cache: &mut CondiCache, heap: &mut ResultHeap) {
    c.update_attributes_fast(false, cache);
    heap.insert_character(c.clone());
}

/// Clone `base`, add `primary` counts of the primary infusion attribute
/// and `secondary` counts of the secondary one, and reseed.
fn with_infusions(base: &Character, infusion: &InfusionSettings, primary: u32, secondary: u32) -> Character {
    let mut c = base.clone();
    c.infusions.insert(infusion.primary_attr.clone(), primary as f64 * INFUSION_BONUS);
    c.infusions.insert(infusion.secondary_attr.clone(), secondary as f64 * INFUSION_BONUS);
    c.reseed_base_attributes();
    c
}

/// `spec.md` §4.6 pruning guard: skip the expensive enumeration unless
/// the best possible allocation could still beat the heap's current
/// floor. Skipped entirely while the heap isn't yet full
/// (`worstScore == 0`).
fn test_infusion_usefulness(
    base: &Character,
    infusion: &InfusionSettings,
    cache: &mut CondiCache,
    heap: &ResultHeap,
) -> bool {
    let worst = heap.worst_score();
    if worst == 0.0 {
        return true;
    }
    let mut probe = with_infusions(base, infusion, infusion.primary_max, infusion.secondary_max);
    probe.update_attributes_fast(true, cache);
    probe.rank_score() > worst
}

/// Apply the configured infusion strategy to a leaf gear assignment
/// and offer the resulting candidate(s) to the heap.
pub fn apply(base: &Character, infusion: &InfusionSettings, cache: &mut CondiCache, heap: &mut ResultHeap) {
    match infusion.mode {
        InfusionMode::None => {
            let mut c = base.clone();
            evaluate_and_offer(&mut c, cache, heap);
        }

        InfusionMode::Primary => {
            let mut c = with_infusions(base, infusion, infusion.primary_max, 0);
            evaluate_and_offer(&mut c, cache, heap);
        }

        InfusionMode::Few => {
            let mut c = with_infusions(base, infusion, infusion.primary_max, infusion.secondary_max);
            evaluate_and_offer(&mut c, cache, heap);
        }

        InfusionMode::Secondary => {
            if !test_infusion_usefulness(base, infusion, cache, heap) {
                return;
            }
            let mut prev_score: Option<f64> = None;
            for p in splits(infusion) {
                let s = infusion.max_infusions - p;
                let mut c = with_infusions(base, infusion, p, s);
                c.update_attributes_fast(false, cache);
                let score = c.rank_score();
                if prev_score == Some(score) {
                    continue;
                }
                prev_score = Some(score);
                heap.insert_character(c);
            }
        }

        InfusionMode::SecondaryNoDuplicates => {
            if !test_infusion_usefulness(base, infusion, cache, heap) {
                return;
            }
            let mut best: Option<Character> = None;
            for p in splits(infusion) {
                let s = infusion.max_infusions - p;
                let mut c = with_infusions(base, infusion, p, s);
                c.update_attributes_fast(false, cache);
                match &best {
                    Some(current) if cmp_better(current, &c) != Ordering::Greater => {}
                    _ => best = Some(c),
                }
            }
            if let Some(c) = best {
                heap.insert_character(c);
            }
        }
    }
}

/// `p` descending from `primaryMax`, bounded below so `s = maxInfusions
/// - p` never exceeds `secondaryMax` (`spec.md` §4.6).
fn splits(infusion: &InfusionSettings) -> impl Iterator<Item = u32> {
    let lower = infusion.max_infusions.saturating_sub(infusion.secondary_max);
    let upper = infusion.primary_max.min(infusion.max_infusions);
    (lower..=upper).rev()
}
