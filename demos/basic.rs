//! Basic example: run a small power-DPS search to completion and print
//! the top result.
//!
//! This example demonstrates:
//! - Building a `Settings` bundle for a toy two-slot gear search
//! - Driving `Engine::step()` to completion
//! - Reading back the accepted, ranked result list

use gearsolve::attribute::AttrId;
use gearsolve::gear::{Affix, AffixBonuses};
use gearsolve::search::Engine;
use gearsolve::settings::{
    Constraints, InfusionMode, InfusionSettings, MinimalSettings, Modifiers, RankBy, Settings,
};
use gearsolve::tables::GameData;
use std::collections::HashMap;
use std::sync::Arc;

fn main() {
    println!("=== Basic Gear Search Demo ===\n");

    let affixes = vec![Affix::new("berserker"), Affix::new("assassin")];
    let mut weapon_bonuses: HashMap<Affix, AffixBonuses> = HashMap::new();
    weapon_bonuses.insert(Affix::new("berserker"), vec![(AttrId::new("Power"), 100.0)]);
    weapon_bonuses.insert(
        Affix::new("assassin"),
        vec![(AttrId::new("Power"), 60.0), (AttrId::new("Precision"), 60.0)],
    );

    let mut base_attributes = HashMap::new();
    base_attributes.insert(AttrId::new("Power"), 1000.0);
    base_attributes.insert(AttrId::new("Precision"), 1000.0);
    base_attributes.insert(AttrId::new("Ferocity"), 700.0);
    base_attributes.insert(AttrId::new("Power Coefficient"), 2597.0);

    let settings = Settings {
        slots: 1,
        affixes_by_slot: vec![affixes],
        affix_bonuses: vec![weapon_bonuses],
        base_attributes,
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
    .expect("settings are internally consistent");

    let mut engine = Engine::new(Arc::new(settings), MinimalSettings::default(), "basic-demo");

    let mut steps = 0;
    loop {
        let progress = engine.step().expect("search does not hit an internal invariant violation");
        steps += 1;
        if progress.done {
            println!("search finished after {steps} step() call(s), {} leaves evaluated", engine.leaves_evaluated());
            break;
        }
    }

    for (rank, character) in engine.list().iter().enumerate() {
        println!(
            "#{}: gear={:?} Damage={:.2}",
            rank + 1,
            character.gear,
            character.rank_score()
        );
    }
}
