//! Alembic Core -- runtime alchemy recipe synthesis and bench gating.
//!
//! At load time the [`distributor::Distributor`] classifies every ingredient
//! into a rarity tier, groups craftable potions and poisons into per-effect
//! families of up to five levels, and generates one two-ingredient recipe per
//! unordered ingredient pair for each rule of a fixed rarity lattice. At
//! runtime the [`gate::AccessGate`] reacts to the player entering or leaving
//! an alchemy bench, revealing the recipes the player's perks and
//! ingredient knowledge allow and upgrading their output.
//!
//! # Pipeline
//!
//! 1. **Resolve** -- keywords and perks from `plugin|hex-id` references.
//! 2. **Override** -- alchemy benches switch to create-object mode.
//! 3. **Classify** -- ingredients into common / uncommon / rare.
//! 4. **Index** -- craftable single-effect potions by effect and level.
//! 5. **Synthesize** -- recipes for every family and lattice rule.
//! 6. **Register** -- the access gate on the furniture event source.
//!
//! # Key Types
//!
//! - [`host::Host`] -- The adapter every host integration implements.
//! - [`rarity::RarityPools`] -- Ingredients partitioned by tier.
//! - [`potion::PotionIndex`] -- Effect to [`potion::PotionFamily`] mapping.
//! - [`recipe::Synthesizer`] -- Creates recipes and their metadata.
//! - [`gate::AccessGate`] -- Event sink that re-gates recipes per visit.
//! - [`event::FurnitureEventSource`] -- Synchronous sink registry.
//!
//! The host engine delivers events on a single thread. Nothing here locks;
//! all state is written during load and afterwards only by the gate.

pub mod distributor;
pub mod event;
pub mod gate;
pub mod host;
pub mod id;
pub mod keyword;
pub mod perk;
pub mod potion;
pub mod rarity;
pub mod recipe;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
