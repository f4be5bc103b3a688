//! The bounded, sorted Result Heap (C7) and its total order.
//!
//! Despite the name this is a plain sorted `Vec`, not a binary heap:
//! `maxResults` is small enough (typically ≤ 500, per `spec.md` §4.7)
//! that linear insertion is cheaper than the bookkeeping a real heap
//! would add.

use crate::character::Character;
use crate::finalize;
use std::cmp::Ordering;

/// Compare two characters under the same `rankby`, worst-to-best.
///
/// Returns `Ordering::Less` when `a` outranks `b`, `Equal` on a true
/// tie (primary score and tiebreak score both equal), `Greater`
/// otherwise. Primary key is the `rankby` attribute descending;
/// ties break on the complementary score (`spec.md` §4.7): Damage
/// builds tiebreak on Survivability, Survivability/Healing builds
/// tiebreak on Damage.
pub fn cmp_better(a: &Character, b: &Character) -> Ordering {
    match b.rank_score().partial_cmp(&a.rank_score()) {
        Some(Ordering::Equal) | None => b
            .tiebreak_score()
            .partial_cmp(&a.tiebreak_score())
            .unwrap_or(Ordering::Equal),
        Some(ord) => ord,
    }
}

/// The accepted, ranked, bounded top-K of a search.
pub struct ResultHeap {
    entries: Vec<Character>,
    max_results: usize,
    /// Rank score of the last element once `entries.len() ==
    /// max_results`; `0.0` (meaning "not yet full") until then.
    worst_score: f64,
    counter: u64,
    run_id: String,
    /// Set on every accepted insertion, cleared by the search loop once
    /// it has produced a progress snapshot (`spec.md` §4.8 step 1).
    pub is_changed: bool,
}

impl ResultHeap {
    pub fn new(max_results: usize, run_id: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            max_results,
            worst_score: 0.0,
            counter: 0,
            run_id: run_id.into(),
            is_changed: false,
        }
    }

    pub fn worst_score(&self) -> f64 {
        self.worst_score
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Character] {
        &self.entries
    }

    /// A shallow snapshot of the current top-K, for a progress event.
    pub fn snapshot(&self) -> Vec<Character> {
        self.entries.clone()
    }

    /// Attempt to insert a fast-evaluated candidate (`spec.md` §4.7).
    ///
    /// Runs the full evaluation and result summary only for candidates
    /// that survive the cheap pre-checks. Returns `true` iff accepted.
    pub fn insert_character(&mut self, mut c: Character) -> bool {
        if !c.valid {
            return false;
        }
        if self.worst_score > 0.0 && c.rank_score() < self.worst_score {
            return false;
        }

        c.update_attributes(false);
        if !c.valid {
            return false;
        }
        if self.worst_score > 0.0 && c.rank_score() < self.worst_score {
            return false;
        }

        c.summary = Some(finalize::summarize(&c));
        c.id = format!("{} ({})", self.counter, self.run_id);
        self.counter += 1;

        let mut pos = self.entries.len();
        while pos > 0 && cmp_better(&self.entries[pos - 1], &c) == Ordering::Greater {
            pos -= 1;
        }
        if pos >= self.max_results {
            return false;
        }

        self.entries.insert(pos, c);
        if self.entries.len() > self.max_results {
            self.entries.truncate(self.max_results);
        }
        if self.entries.len() == self.max_results {
            self.worst_score = self.entries.last().map(|c| c.rank_score()).unwrap_or(0.0);
        }
        self.is_changed = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttrId;
    use crate::gear::{Affix, GearStats};
    use crate::settings::{Constraints, InfusionMode, InfusionSettings, Modifiers, RankBy, Settings};
    use crate::tables::GameData;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn settings_for(rankby: RankBy, max_results: usize) -> Arc<Settings> {
        Arc::new(
            Settings {
                slots: 1,
                affixes_by_slot: vec![vec![Affix::new("a")]],
                affix_bonuses: vec![HashMap::new()],
                base_attributes: HashMap::new(),
                modifiers: Modifiers::default(),
                distribution: vec![],
                constraints: Constraints::default(),
                rankby,
                infusion: InfusionSettings {
                    mode: InfusionMode::None,
                    max_infusions: 0,
                    primary_attr: AttrId::new("Power"),
                    secondary_attr: AttrId::new("Precision"),
                    primary_max: 0,
                    secondary_max: 0,
                },
                relevant_conditions: vec![],
                movement_uptime: 0.0,
                attack_rate: 0.0,
                forced_armor: true,
                forced_ring: true,
                forced_acc: true,
                forced_wep: true,
                max_results,
                disable_condi_result_cache: false,
                game_data: GameData::reference(),
                runs_after_this_slot: vec![1, 1],
            }
            .finish()
            .unwrap(),
        )
    }

    fn candidate(settings: &Arc<Settings>, power: f64) -> Character {
        let mut gear_stats = GearStats::new();
        gear_stats.0.insert(AttrId::new("Power"), power);
        gear_stats.0.insert(AttrId::new("Power Coefficient"), 2597.0);
        let mut c = Character::new(settings.clone(), vec![Affix::new("a")], gear_stats);
        let mut cache = crate::condi_cache::CondiCache::new();
        c.update_attributes_fast(true, &mut cache);
        c
    }

    #[test]
    fn accepts_and_sorts_descending() {
        let settings = settings_for(RankBy::Damage, 10);
        let mut heap = ResultHeap::new(10, "test");
        assert!(heap.insert_character(candidate(&settings, 100.0)));
        assert!(heap.insert_character(candidate(&settings, 300.0)));
        assert!(heap.insert_character(candidate(&settings, 200.0)));

        let scores: Vec<f64> = heap.entries().iter().map(|c| c.rank_score()).collect();
        assert_eq!(scores, vec![scores[0], scores[1], scores[2]]);
        assert!(scores[0] >= scores[1] && scores[1] >= scores[2]);
    }

    #[test]
    fn truncates_to_max_results_and_sets_worst_score() {
        let settings = settings_for(RankBy::Damage, 2);
        let mut heap = ResultHeap::new(2, "test");
        heap.insert_character(candidate(&settings, 100.0));
        heap.insert_character(candidate(&settings, 300.0));
        heap.insert_character(candidate(&settings, 200.0));

        assert_eq!(heap.len(), 2);
        assert!(heap.worst_score() > 0.0);
        assert_eq!(heap.worst_score(), heap.entries().last().unwrap().rank_score());
    }

    #[test]
    fn rejects_candidate_worse_than_worst_score_once_full() {
        let settings = settings_for(RankBy::Damage, 1);
        let mut heap = ResultHeap::new(1, "test");
        assert!(heap.insert_character(candidate(&settings, 300.0)));
        assert!(!heap.insert_character(candidate(&settings, 50.0)));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn invalid_candidate_is_rejected() {
        let settings = settings_for(RankBy::Damage, 10);
        let mut c = candidate(&settings, 100.0);
        c.valid = false;
        let mut heap = ResultHeap::new(10, "test");
        assert!(!heap.insert_character(c));
        assert!(heap.is_empty());
    }
}
