//! Load-time pipeline: resolve, classify, index, synthesize, register.
//!
//! Initialization is all-or-nothing. If a keyword or a level perk cannot be
//! resolved, nothing is synthesized, no bench is touched, and no sink is
//! registered.

use crate::event::FurnitureEventSource;
use crate::gate::AccessGate;
use crate::host::{BenchType, Host};
use crate::keyword::{KeywordSet, resolve_keywords};
use crate::perk::{PerkTable, resolve_perks};
use crate::potion::{PotionIndex, index_potions};
use crate::rarity::{RarityPools, classify_ingredients};
use crate::recipe::{MetadataIndex, synthesize_recipes};
use crate::settings::Settings;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("unable to resolve {name} keyword from '{reference}'")]
    MissingKeyword { name: &'static str, reference: String },
    #[error("unable to load level {level} perk from '{reference}'")]
    MissingLevelPerk { level: u8, reference: String },
}

/// Everything built at load time. The access gate owns it afterwards and is
/// the only writer.
#[derive(Debug, Clone)]
pub struct DistributionContext {
    pub keywords: KeywordSet,
    pub perks: PerkTable,
    pub pools: RarityPools,
    pub potions: PotionIndex,
    pub recipes: MetadataIndex,
}

/// Totals reported after a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub benches: usize,
    pub ingredients: usize,
    pub potion_families: usize,
    pub recipes: usize,
}

/// Runs the load-time pipeline.
#[derive(Debug)]
pub struct Distributor<'s> {
    settings: &'s Settings,
}

impl<'s> Distributor<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        Self { settings }
    }

    /// Build the distribution context without registering anything.
    pub fn build(&self, host: &mut dyn Host) -> Result<(DistributionContext, LoadSummary), InitError> {
        let keywords = resolve_keywords(&*host, &self.settings.keywords)?;
        let perks = resolve_perks(&*host, &self.settings.perks)?;
        debug!(crafting = ?self.settings.crafting, "Crafting rules (informational)");

        let benches = override_benches(host, &keywords);
        let pools = classify_ingredients(host, &keywords.rarity, &self.settings.ingredients);
        let potions = index_potions(&*host, keywords.craftable, &keywords.levels);
        let recipes = synthesize_recipes(host, keywords.alchemy_bench, &pools, &potions);

        let summary = LoadSummary {
            benches,
            ingredients: pools.len(),
            potion_families: potions.len(),
            recipes: recipes.len(),
        };
        info!(total = summary.potion_families, "Total potions");
        info!(total = summary.ingredients, "Total ingredients");
        info!(total = summary.recipes, "Total recipes");

        Ok((
            DistributionContext {
                keywords,
                perks,
                pools,
                potions,
                recipes,
            },
            summary,
        ))
    }

    /// Build the context and register its access gate on `events`.
    pub fn initialize(
        &self,
        host: &mut dyn Host,
        events: &mut FurnitureEventSource,
    ) -> Result<LoadSummary, InitError> {
        let (context, summary) = self.build(host)?;
        events.add_sink(Box::new(AccessGate::new(context)));
        info!("Initialization completed");
        Ok(summary)
    }
}

/// Switch every alchemy-tagged bench to create-object mode. Returns the
/// number of benches changed.
fn override_benches(host: &mut dyn Host, keywords: &KeywordSet) -> usize {
    let mut count = 0;
    for furniture in host.furniture() {
        if !host.has_keyword(furniture.form(), keywords.alchemy_bench) {
            continue;
        }
        let name = host
            .furniture_name(furniture)
            .unwrap_or_else(|| furniture.to_string());
        info!(furniture = %name, "Overriding furniture");
        host.set_bench_type(furniture, BenchType::CreateObject);
        count += 1;
    }
    count
}
