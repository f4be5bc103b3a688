//! The six literal seed scenarios the search engine's behavior is
//! pinned against.

use gearsolve::attribute::AttrId;
use gearsolve::condi_cache::CondiCache;
use gearsolve::gear::{Affix, AffixBonuses};
use gearsolve::scoring::condition_dps_cached;
use gearsolve::search::Engine;
use gearsolve::settings::{
    Constraints, InfusionMode, InfusionSettings, MinimalSettings, Modifiers, RankBy, Settings,
};
use gearsolve::tables::GameData;
use std::collections::HashMap;
use std::sync::Arc;

fn infusion_none() -> InfusionSettings {
    InfusionSettings {
        mode: InfusionMode::None,
        max_infusions: 0,
        primary_attr: AttrId::new("Power"),
        secondary_attr: AttrId::new("Precision"),
        primary_max: 0,
        secondary_max: 0,
    }
}

fn base_settings(slots: usize, affixes_by_slot: Vec<Vec<Affix>>, affix_bonuses: Vec<HashMap<Affix, AffixBonuses>>) -> Settings {
    Settings {
        slots,
        affixes_by_slot,
        affix_bonuses,
        base_attributes: HashMap::new(),
        modifiers: Modifiers::default(),
        distribution: vec![],
        constraints: Constraints::default(),
        rankby: RankBy::Damage,
        infusion: infusion_none(),
        relevant_conditions: vec![],
        movement_uptime: 0.0,
        attack_rate: 0.0,
        forced_armor: true,
        forced_ring: true,
        forced_acc: true,
        forced_wep: true,
        max_results: 500,
        disable_condi_result_cache: false,
        game_data: GameData::reference(),
        runs_after_this_slot: vec![],
    }
}

fn run_to_completion(engine: &mut Engine) {
    let mut guard = 0;
    loop {
        let progress = engine.step().expect("aligned stacks never underflow");
        guard += 1;
        if progress.done || guard > 1_000_000 {
            break;
        }
    }
}

#[test]
fn seed_1_empty_affixes_yields_single_terminal_progress() {
    let settings = base_settings(1, vec![vec![]], vec![HashMap::new()]);
    let settings = Arc::new(settings.finish().unwrap());
    let mut engine = Engine::new(settings, MinimalSettings::default(), "seed-1");

    let progress = engine.step().expect("empty search space never underflows");
    assert!(progress.is_changed);
    assert_eq!(progress.calculation_runs, 0);
    assert!(progress.new_list.as_ref().is_some_and(|list| list.is_empty()));
    assert!(progress.done);
}

#[test]
fn seed_2_single_slot_single_affix() {
    let mut bonuses: HashMap<Affix, AffixBonuses> = HashMap::new();
    bonuses.insert(Affix::new("berserker"), vec![(AttrId::new("Power"), 100.0)]);

    let mut settings = base_settings(1, vec![vec![Affix::new("berserker")]], vec![bonuses]);
    settings.base_attributes.insert(AttrId::new("Power"), 1000.0);
    settings.base_attributes.insert(AttrId::new("Precision"), 1000.0);
    settings.base_attributes.insert(AttrId::new("Ferocity"), 0.0);
    settings.base_attributes.insert(AttrId::new("Condition Damage"), 0.0);
    settings.base_attributes.insert(AttrId::new("Power Coefficient"), 2597.0);
    let settings = Arc::new(settings.finish().unwrap());

    let mut engine = Engine::new(settings, MinimalSettings::default(), "seed-2");
    run_to_completion(&mut engine);

    let list = engine.list();
    assert_eq!(list.len(), 1);
    let character = &list[0];
    assert_eq!(character.attributes[&AttrId::new("Power")], 1100.0);
    assert_eq!(character.attributes[&AttrId::new("Effective Power")], 1100.0);
    assert_eq!(character.attributes[&AttrId::new("Power DPS")], 1100.0);
    assert_eq!(character.attributes[&AttrId::new("Damage")], 1100.0);
}

#[test]
fn seed_3_round_even_conversion() {
    use gearsolve::pipeline::calc_stats;

    let mut modifiers = Modifiers::default();
    modifiers.convert.insert(AttrId::new("Power"), vec![(AttrId::new("Seed"), 1.0)]);
    let game_data = GameData::reference();

    for (seed, expected) in [(0.5, 0.0), (1.5, 2.0), (2.5, 2.0), (3.5, 4.0)] {
        let mut base = HashMap::new();
        base.insert(AttrId::new("Seed"), seed);
        let attrs = calc_stats(&base, &modifiers, &game_data, false);
        assert_eq!(attrs[&AttrId::new("Power")], expected);
    }
}

#[test]
fn seed_4_symmetry_pruning_skips_out_of_order_armor_pair() {
    let affixes = vec![Affix::new("A"), Affix::new("B")];
    let mut bonuses: HashMap<Affix, AffixBonuses> = HashMap::new();
    bonuses.insert(Affix::new("A"), vec![(AttrId::new("Power"), 10.0)]);
    bonuses.insert(Affix::new("B"), vec![(AttrId::new("Power"), 20.0)]);

    // One armor slot pair (slots 1 and 3, as in the canonical layout);
    // pad with the other required slots so depth 6 is reached.
    let affixes_by_slot: Vec<Vec<Affix>> = (0..6).map(|_| affixes.clone()).collect();
    let affix_bonuses: Vec<HashMap<Affix, AffixBonuses>> = (0..6).map(|_| bonuses.clone()).collect();

    let mut settings = base_settings(6, affixes_by_slot, affix_bonuses);
    settings.base_attributes.insert(AttrId::new("Power Coefficient"), 2597.0);
    settings.forced_armor = false;
    let settings_no_pruning = {
        let mut s = settings.clone();
        s.forced_armor = true;
        Arc::new(s.finish().unwrap())
    };
    let settings_pruned = Arc::new(settings.finish().unwrap());

    let mut engine_full = Engine::new(settings_no_pruning, MinimalSettings::default(), "seed-4-full");
    run_to_completion(&mut engine_full);
    assert_eq!(engine_full.leaves_evaluated(), 64); // 2^6 leaves, no pruning

    let mut engine_pruned = Engine::new(settings_pruned, MinimalSettings::default(), "seed-4-pruned");
    run_to_completion(&mut engine_pruned);
    // Slots 1 and 3 out of canonical order is skipped: half of the
    // 2x2 combinations across that pair are pruned.
    assert!(engine_pruned.leaves_evaluated() < engine_full.leaves_evaluated());
}

#[test]
fn seed_5_infusion_secondary_vs_secondary_no_duplicates() {
    let mut bonuses: HashMap<Affix, AffixBonuses> = HashMap::new();
    bonuses.insert(Affix::new("a"), vec![(AttrId::new("Power"), 0.0)]);

    let mut settings = base_settings(1, vec![vec![Affix::new("a")]], vec![bonuses]);
    settings.base_attributes.insert(AttrId::new("Power Coefficient"), 2597.0);
    settings.infusion = InfusionSettings {
        mode: InfusionMode::Secondary,
        max_infusions: 18,
        primary_attr: AttrId::new("Power"),
        secondary_attr: AttrId::new("Precision"),
        primary_max: 18,
        secondary_max: 18,
    };
    let settings_secondary = Arc::new(settings.clone().finish().unwrap());
    let mut engine = Engine::new(settings_secondary, MinimalSettings::default(), "seed-5-secondary");
    run_to_completion(&mut engine);
    assert!(engine.list().len() <= 19);
    assert!(!engine.list().is_empty());

    settings.infusion.mode = InfusionMode::SecondaryNoDuplicates;
    let settings_no_dup = Arc::new(settings.finish().unwrap());
    let mut engine = Engine::new(settings_no_dup, MinimalSettings::default(), "seed-5-no-dup");
    run_to_completion(&mut engine);
    assert_eq!(engine.list().len(), 1);
}

#[test]
fn seed_6_condi_cache_hit_returns_memoized_value() {
    let mut settings = base_settings(0, vec![], vec![]);
    settings.relevant_conditions = vec!["Bleeding".to_string()];
    let settings = settings.finish().unwrap();

    let mut attrs_a = HashMap::new();
    attrs_a.insert(AttrId::new("Expertise"), 1500.0);
    attrs_a.insert(AttrId::new("Condition Damage"), 2000.0);
    attrs_a.insert(AttrId::new("Bleeding Coefficient"), 3.0);
    attrs_a.insert(AttrId::new("Power"), 100.0);

    let mut attrs_b = attrs_a.clone();
    attrs_b.insert(AttrId::new("Power"), 9999.0);

    let mut cache = CondiCache::new();
    let score_a = condition_dps_cached(&mut attrs_a, &settings, &mut cache);
    let score_b = condition_dps_cached(&mut attrs_b, &settings, &mut cache);
    assert_eq!(score_a, score_b);
    assert_eq!(cache.len(), 1);
}
