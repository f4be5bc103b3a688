//! The Search Engine (C8): iterative depth-first enumeration over gear
//! slot assignments, expressed as an explicit `step()`-driven state
//! object rather than a generator or a background thread (`spec.md`
//! §5's "re-architect as an explicit state object" note).

use crate::character::Character;
use crate::condi_cache::CondiCache;
use crate::error::GearError;
use crate::gear::{Affix, Gear, GearStats};
use crate::heap::ResultHeap;
use crate::infusion;
use crate::settings::{MinimalSettings, Settings};
use std::sync::Arc;
use std::time::{Duration, Instant};

const YIELD_EVERY: u64 = 1000;
const YIELD_AFTER: Duration = Duration::from_millis(90);

/// One cooperative progress snapshot from [`Engine::step`].
#[derive(Debug, Clone)]
pub struct Progress {
    pub is_changed: bool,
    pub calculation_runs: u64,
    /// A shallow snapshot of the current top-K, present only when the
    /// heap changed since the last snapshot.
    pub new_list: Option<Vec<Character>>,
    /// Set once the search has fully enumerated the slot tree. Not
    /// part of `spec.md` §6's `Progress` shape verbatim, but every
    /// driver needs it to stop calling `step()`; left off would just
    /// push the same check into every caller.
    pub done: bool,
}

/// The gear-combination search engine.
///
/// Owns two aligned stacks (`gear_stack`, `stats_stack`) mirroring
/// `spec.md` §4.8's `gearStack`/`statsStack`, the condi-damage cache,
/// and the bounded result heap. Holds no external resources across a
/// yield: dropping the engine mid-search frees everything it owns.
pub struct Engine {
    settings: Arc<Settings>,
    #[allow(dead_code)]
    minimal_settings: MinimalSettings,
    gear_stack: Vec<Gear>,
    stats_stack: Vec<GearStats>,
    cache: CondiCache,
    heap: ResultHeap,
    calculation_runs: u64,
    /// Count of actual leaf evaluations (`test_character` calls), not
    /// inflated by the approximate pruning-skip accounting
    /// `calculation_runs` folds in for progress reporting.
    leaves_evaluated: u64,
    last_yield: Instant,
    done: bool,
    /// Set at construction when `settings.is_empty_search_space()`.
    empty_search_space: bool,
    /// Whether an empty search space's one terminal progress value has
    /// already been handed back (`spec.md` §8 seed scenario 1).
    empty_terminal_emitted: bool,
}

impl Engine {
    /// Construct an engine ready to run. `run_id` is the once-chosen
    /// identifier results are tagged with (`spec.md` §4.7's
    /// `randomId`); generating it is a caller concern (forms, UUIDs,
    /// a counter) this crate does not prescribe.
    ///
    /// `InfusionMode` validation already happened when `settings` was
    /// built (`InfusionMode::parse`, `spec.md` §4.6's "unknown mode is
    /// a fatal error" is enforced there); by the time a `Settings` value
    /// exists, its infusion mode is a valid Rust enum variant, so
    /// construction here cannot fail on that account.
    pub fn new(settings: Arc<Settings>, minimal_settings: MinimalSettings, run_id: impl Into<String>) -> Self {
        let empty = settings.is_empty_search_space();
        Engine {
            gear_stack: if empty { Vec::new() } else { vec![Gear::new()] },
            stats_stack: if empty { Vec::new() } else { vec![GearStats::new()] },
            cache: CondiCache::new(),
            heap: ResultHeap::new(settings.max_results, run_id),
            calculation_runs: 0,
            leaves_evaluated: 0,
            last_yield: Instant::now(),
            done: empty,
            empty_search_space: empty,
            empty_terminal_emitted: false,
            settings,
            minimal_settings,
        }
    }

    pub fn calculation_runs(&self) -> u64 {
        self.calculation_runs
    }

    /// Number of leaves actually evaluated, unlike
    /// [`Engine::calculation_runs`] which also folds in the
    /// approximate count of leaves a pruned subtree would have
    /// contained.
    pub fn leaves_evaluated(&self) -> u64 {
        self.leaves_evaluated
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The accepted, sorted, bounded top-K once the search is done (or
    /// the best-so-far while it is still running).
    pub fn list(&self) -> Vec<Character> {
        self.heap.entries().to_vec()
    }

    /// Run the loop until the next cooperative yield point or
    /// completion (`spec.md` §4.8 step 1).
    ///
    /// Returns [`GearError::StackUnderflow`] if `gear_stack` and
    /// `stats_stack` ever desync — an internal invariant violation that
    /// means the engine's own bookkeeping is broken, never something a
    /// caller's input can trigger. The engine is marked done when this
    /// happens; a caller should stop driving it.
    pub fn step(&mut self) -> Result<Progress, GearError> {
        if self.done {
            if self.empty_search_space && !self.empty_terminal_emitted {
                self.empty_terminal_emitted = true;
                return Ok(Progress {
                    is_changed: true,
                    calculation_runs: 0,
                    new_list: Some(Vec::new()),
                    done: true,
                });
            }
            return Ok(Progress {
                is_changed: false,
                calculation_runs: self.calculation_runs,
                new_list: None,
                done: true,
            });
        }

        let mut iterations = 0u64;
        loop {
            let Some(gear) = self.gear_stack.pop() else {
                self.done = true;
                return Ok(self.snapshot(true));
            };
            let k = gear.len();
            let Some(stats) = self.stats_stack.pop() else {
                self.done = true;
                return Err(GearError::StackUnderflow { at_slot: k });
            };

            if is_pruned(&self.settings, &gear) {
                self.calculation_runs += self.settings.runs_after_this_slot.get(k).copied().unwrap_or(0);
                tracing::trace!(slot = k, "symmetry pruning skip");
            } else if k == self.settings.slots {
                self.calculation_runs += 1;
                self.leaves_evaluated += 1;
                let base = Character::new(self.settings.clone(), gear, stats);
                infusion::apply(&base, &self.settings.infusion, &mut self.cache, &mut self.heap);
            } else {
                self.expand(gear, stats, k);
            }

            iterations += 1;
            if iterations >= YIELD_EVERY && self.last_yield.elapsed() > YIELD_AFTER {
                let progress = self.snapshot(false);
                tracing::debug!(
                    calculation_runs = self.calculation_runs,
                    heap_len = self.heap.len(),
                    "search yield"
                );
                self.last_yield = Instant::now();
                return Ok(progress);
            }
        }
    }

    /// Push one child state per alternative affix at slot `k`, index 0
    /// last (`spec.md` §4.8 step 5).
    fn expand(&mut self, gear: Gear, stats: GearStats, k: usize) {
        let alternatives = &self.settings.affixes_by_slot[k];
        for affix in alternatives.iter().skip(1) {
            let bonuses = self.settings.bonuses_for(k, affix);
            let mut next_gear = gear.clone();
            next_gear.push(affix.clone());
            self.gear_stack.push(next_gear);
            self.stats_stack.push(stats.plus(bonuses));
        }
        if let Some(first) = alternatives.first() {
            let bonuses = self.settings.bonuses_for(k, first);
            let next_stats = stats.plus(bonuses);
            let mut next_gear = gear;
            next_gear.push(first.clone());
            self.gear_stack.push(next_gear);
            self.stats_stack.push(next_stats);
        }
    }

    fn snapshot(&mut self, done: bool) -> Progress {
        let is_changed = self.heap.is_changed;
        let new_list = if is_changed { Some(self.heap.snapshot()) } else { None };
        self.heap.is_changed = false;
        Progress {
            is_changed,
            calculation_runs: self.calculation_runs,
            new_list,
            done,
        }
    }
}

/// The affix's position in its slot's canonical alternative list
/// (`spec.md` §3), used as the symmetry comparison key.
fn affix_rank(settings: &Settings, slot: usize, affix: &Affix) -> usize {
    settings.affixes_by_slot[slot].iter().position(|a| a == affix).unwrap_or(0)
}

/// The four symmetry-breaking pruning rules (`spec.md` §4.8 step 3),
/// evaluated against the canonical affix order established in C2.
fn is_pruned(settings: &Settings, gear: &Gear) -> bool {
    let k = gear.len();
    let rank = |slot: usize| affix_rank(settings, slot, &gear[slot]);

    if !settings.forced_armor && k == 6 && (rank(1) > rank(3) || rank(3) > rank(5)) {
        return true;
    }
    if !settings.forced_ring && k == 9 && rank(7) > rank(8) {
        return true;
    }
    if !settings.forced_acc && k == 11 && rank(9) > rank(10) {
        return true;
    }
    if !settings.forced_wep && k == 14 && rank(12) > rank(13) {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttrId;
    use crate::gear::AffixBonuses;
    use crate::settings::{Constraints, InfusionMode, InfusionSettings, Modifiers, RankBy};
    use crate::tables::GameData;
    use std::collections::HashMap;

    fn two_affix_settings() -> Arc<Settings> {
        let affixes = vec![Affix::new("weak"), Affix::new("strong")];
        let mut bonuses: HashMap<Affix, AffixBonuses> = HashMap::new();
        bonuses.insert(Affix::new("weak"), vec![(AttrId::new("Power"), 10.0)]);
        bonuses.insert(Affix::new("strong"), vec![(AttrId::new("Power"), 100.0)]);

        Arc::new(
            Settings {
                slots: 1,
                affixes_by_slot: vec![affixes],
                affix_bonuses: vec![bonuses],
                base_attributes: {
                    let mut b = HashMap::new();
                    b.insert(AttrId::new("Power Coefficient"), 2597.0);
                    b
                },
                modifiers: Modifiers::default(),
                distribution: vec![],
                constraints: Constraints::default(),
                rankby: RankBy::Damage,
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
                max_results: 10,
                disable_condi_result_cache: false,
                game_data: GameData::reference(),
                runs_after_this_slot: vec![],
            }
            .finish()
            .unwrap(),
        )
    }

    #[test]
    fn empty_search_space_completes_immediately() {
        let mut settings = (*two_affix_settings()).clone();
        settings.affixes_by_slot[0].clear();
        let settings = Arc::new(settings.finish().unwrap());
        let mut engine = Engine::new(settings, MinimalSettings::default(), "test");
        assert!(engine.is_done());
        let progress = engine.step().expect("empty search space never underflows");
        assert!(progress.done);
        assert_eq!(engine.calculation_runs(), 0);
    }

    #[test]
    fn runs_to_completion_and_ranks_the_stronger_affix_first() {
        let settings = two_affix_settings();
        let mut engine = Engine::new(settings, MinimalSettings::default(), "test");

        let mut guard = 0;
        loop {
            let progress = engine.step().expect("aligned stacks never underflow");
            guard += 1;
            if progress.done || guard > 10_000 {
                break;
            }
        }

        assert!(engine.is_done());
        assert_eq!(engine.calculation_runs(), 2);
        let list = engine.list();
        assert_eq!(list.len(), 2);
        assert!(list[0].rank_score() >= list[1].rank_score());
        assert_eq!(list[0].gear[0], Affix::new("strong"));
    }

    #[test]
    fn armor_symmetry_pruning_skips_out_of_order_prefix() {
        let mut settings = (*two_affix_settings()).clone();
        settings.forced_armor = false;
        settings.affixes_by_slot = vec![vec![Affix::new("a"), Affix::new("b")]; 6];
        settings.affix_bonuses = vec![HashMap::new(); 6];
        settings.slots = 6;
        let settings = settings.finish().unwrap();

        let gear: Gear = vec![
            Affix::new("b"),
            Affix::new("b"), // rank 1 > rank at slot 3 below -> out of order
            Affix::new("a"),
            Affix::new("a"),
            Affix::new("a"),
            Affix::new("a"),
        ];
        assert!(is_pruned(&settings, &gear));
    }

    #[test]
    fn misaligned_stacks_surface_stack_underflow_error() {
        let settings = two_affix_settings();
        let mut engine = Engine::new(settings, MinimalSettings::default(), "test");
        engine.stats_stack.pop();

        let result = engine.step();
        assert!(matches!(result, Err(GearError::StackUnderflow { at_slot: 0 })));
        assert!(engine.is_done());
    }
}
