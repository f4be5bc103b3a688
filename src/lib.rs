//! # gearsolve — deterministic gear-combination search and scoring
//!
//! Enumerates gear-slot assignments for an action-RPG character,
//! derives attributes per candidate through a fixed pipeline, scores
//! candidates against a chosen objective (Damage, Survivability,
//! Healing), and keeps a bounded top-K ranked list. The search yields
//! progress to its driver periodically so a caller can render
//! incremental results or cancel.
//!
//! ## Pipeline
//!
//! ```text
//! [Settings] → [Search Engine] → [Character × N] → [Result Heap] → [Result Finalizer]
//! ```
//!
//! 1. [`settings::Settings`] is built once and never mutated.
//! 2. [`search::Engine`] performs the iterative depth-first slot
//!    enumeration, applying symmetry pruning and the configured
//!    infusion strategy ([`infusion`]) at each leaf.
//! 3. Each leaf becomes a [`character::Character`], whose attributes are
//!    derived by [`pipeline::calc_stats`] and scored by [`scoring`].
//! 4. Accepted candidates are kept in a [`heap::ResultHeap`], bounded to
//!    `maxResults` and sorted by the total order in `spec.md` §4.7.
//! 5. [`finalize::summarize`] turns an accepted character into a
//!    display-ready [`finalize::ResultSummary`].
//!
//! ## Example
//!
//! ```rust
//! use gearsolve::attribute::AttrId;
//! use gearsolve::gear::{Affix, AffixBonuses};
//! use gearsolve::search::Engine;
//! use gearsolve::settings::{
//!     Constraints, InfusionMode, InfusionSettings, MinimalSettings, Modifiers, RankBy, Settings,
//! };
//! use gearsolve::tables::GameData;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let mut base_attributes = HashMap::new();
//! base_attributes.insert(AttrId::new("Power Coefficient"), 2597.0);
//!
//! let mut bonuses: HashMap<Affix, AffixBonuses> = HashMap::new();
//! bonuses.insert(Affix::new("berserker"), vec![(AttrId::new("Power"), 100.0)]);
//!
//! let settings = Settings {
//!     slots: 1,
//!     affixes_by_slot: vec![vec![Affix::new("berserker")]],
//!     affix_bonuses: vec![bonuses],
//!     base_attributes,
//!     modifiers: Modifiers::default(),
//!     distribution: vec![],
//!     constraints: Constraints::default(),
//!     rankby: RankBy::Damage,
//!     infusion: InfusionSettings {
//!         mode: InfusionMode::None,
//!         max_infusions: 0,
//!         primary_attr: AttrId::new("Power"),
//!         secondary_attr: AttrId::new("Precision"),
//!         primary_max: 0,
//!         secondary_max: 0,
//!     },
//!     relevant_conditions: vec![],
//!     movement_uptime: 0.0,
//!     attack_rate: 0.0,
//!     forced_armor: true,
//!     forced_ring: true,
//!     forced_acc: true,
//!     forced_wep: true,
//!     max_results: 10,
//!     disable_condi_result_cache: false,
//!     game_data: GameData::reference(),
//!     runs_after_this_slot: vec![],
//! }
//! .finish()
//! .unwrap();
//!
//! let mut engine = Engine::new(Arc::new(settings), MinimalSettings::default(), "example-run");
//! loop {
//!     let progress = engine.step().expect("search does not hit an internal invariant violation");
//!     if progress.done {
//!         break;
//!     }
//! }
//! assert_eq!(engine.list().len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`attribute`] - attribute identifiers and half-to-even rounding
//! - [`tables`] - static game tables (C1)
//! - [`gear`] - affixes, gear assignments, accumulated gear stats
//! - [`settings`] - the immutable settings bundle (C2)
//! - [`pipeline`] - the attribute derivation pipeline (C3)
//! - [`scoring`] - Power/Condition DPS, Survivability, Healing (C4)
//! - [`condi_cache`] - condition-damage memoization (C5)
//! - [`infusion`] - the five infusion allocation strategies (C6)
//! - [`heap`] - the bounded, sorted result list (C7)
//! - [`character`] - one candidate gear assignment under evaluation
//! - [`search`] - the cooperative search engine (C8)
//! - [`finalize`] - the result finalizer (C9)
//! - [`error`] - error types

pub mod attribute;
pub mod character;
pub mod condi_cache;
pub mod error;
pub mod finalize;
pub mod gear;
pub mod heap;
pub mod infusion;
pub mod pipeline;
pub mod scoring;
pub mod search;
pub mod settings;
pub mod tables;

pub use character::Character;
pub use error::GearError;
pub use finalize::ResultSummary;
pub use search::{Engine, Progress};
pub use settings::Settings;
