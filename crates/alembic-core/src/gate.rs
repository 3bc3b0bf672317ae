//! The access gate: recomputes recipe visibility and output every time the
//! player sits down at, or gets up from, an alchemy bench.
//!
//! On enter, each recipe is evaluated independently:
//!
//! 1. The player must hold the perk for the recipe's minimum level.
//! 2. Output quantity is 2 with the double-items perk, 1 without.
//! 3. Quality perks raise the output level, capped by the highest level perk
//!    held. A raised level swaps in the best variant at or below it.
//! 4. The player must have discovered the recipe's effect on both
//!    ingredients.
//!
//! A recipe passing every gate becomes visible; every other recipe is hidden.
//! On exit, every recipe is hidden. Nothing is cached between events.

use crate::distributor::DistributionContext;
use crate::event::{EventControl, EventSink, FurnitureEvent, FurnitureEventKind};
use crate::host::Host;
use crate::id::*;
use crate::perk::PerkTable;
use crate::potion::{PotionIndex, PotionLevel};
use crate::recipe::{RecipeMetadata, Visibility};
use tracing::{debug, info};

/// Outcome of one enter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub evaluated: usize,
    pub visible: usize,
    /// Recipes whose output no longer resolves to a potion.
    pub skipped: usize,
}

/// Per-pass perk state, identical for every recipe in the pass.
#[derive(Debug, Clone, Copy)]
struct PassState {
    max_allowed: PotionLevel,
    doubles_output: bool,
}

/// The furniture event sink owning the distribution context.
#[derive(Debug)]
pub struct AccessGate {
    context: DistributionContext,
}

impl AccessGate {
    pub fn new(context: DistributionContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &DistributionContext {
        &self.context
    }

    /// Re-evaluate every recipe against the player's current perks and
    /// knowledge.
    pub fn on_enter(&mut self, host: &mut dyn Host) -> PassSummary {
        let perks = self.context.perks;
        let state = PassState {
            max_allowed: perks.levels.max_allowed_level(&*host),
            doubles_output: perks.quality.doubles_output(&*host),
        };
        let potions = &self.context.potions;
        let mut summary = PassSummary::default();

        for (recipe, meta) in self.context.recipes.iter_mut() {
            if !output_resolves(&*host, recipe) {
                summary.skipped += 1;
                continue;
            }
            summary.evaluated += 1;

            let visibility = evaluate(host, &perks, potions, state, recipe, meta);
            if visibility.is_visible() {
                summary.visible += 1;
            }
            meta.visibility = visibility;
            host.set_recipe_visibility(recipe, visibility);
        }

        debug!(
            evaluated = summary.evaluated,
            visible = summary.visible,
            skipped = summary.skipped,
            max_level = %state.max_allowed,
            "Enter pass complete"
        );
        summary
    }

    /// Hide every recipe.
    pub fn on_exit(&mut self, host: &mut dyn Host) {
        for (recipe, meta) in self.context.recipes.iter_mut() {
            meta.visibility = Visibility::Hidden;
            host.set_recipe_visibility(recipe, Visibility::Hidden);
        }
    }
}

impl EventSink for AccessGate {
    fn process_event(&mut self, event: &FurnitureEvent, host: &mut dyn Host) -> EventControl {
        if event.actor != host.player() {
            return EventControl::Continue;
        }
        if !host.has_keyword(event.furniture.form(), self.context.keywords.alchemy_bench) {
            return EventControl::Continue;
        }

        let bench = host
            .furniture_name(event.furniture)
            .unwrap_or_else(|| event.furniture.to_string());
        info!(%bench, kind = ?event.kind, "Accessing workbench");

        match event.kind {
            FurnitureEventKind::Enter => {
                self.on_enter(host);
            }
            FurnitureEventKind::Exit => self.on_exit(host),
        }
        EventControl::Continue
    }
}

/// Whether the recipe still produces an alchemy item with an effect.
fn output_resolves(host: &dyn Host, recipe: RecipeId) -> bool {
    host.recipe_output(recipe)
        .and_then(|output| host.alchemy_item(output))
        .is_some_and(|item| item.primary_effect().is_some())
}

fn evaluate(
    host: &mut dyn Host,
    perks: &PerkTable,
    potions: &PotionIndex,
    state: PassState,
    recipe: RecipeId,
    meta: &RecipeMetadata,
) -> Visibility {
    if !perks.levels.unlocks(&*host, meta.potion_min_level) {
        return Visibility::Hidden;
    }

    host.set_recipe_quantity(recipe, if state.doubles_output { 2 } else { 1 });

    let output = boosted_output(&*host, perks, potions, state, meta);
    if host.recipe_output(recipe) != Some(output) {
        host.set_recipe_output(recipe, output);
    }

    if !knows_effect(&*host, meta.ingr1, meta.effect) || !knows_effect(&*host, meta.ingr2, meta.effect) {
        return Visibility::Hidden;
    }

    Visibility::Visible
}

/// The variant this recipe should produce for the current quality perks.
fn boosted_output(
    host: &dyn Host,
    perks: &PerkTable,
    potions: &PotionIndex,
    state: PassState,
    meta: &RecipeMetadata,
) -> PotionId {
    // Flag of the base variant; the current output may carry a different one.
    let boost = perks.quality.level_boost(host, meta.is_poison);
    let level = meta.potion_min_level.raised(boost, state.max_allowed);
    if level <= meta.potion_min_level {
        return meta.base_potion;
    }
    potions
        .family(meta.effect)
        .and_then(|family| family.highest_at_or_below(level.get()))
        .map_or(meta.base_potion, |(_, potion)| potion)
}

fn knows_effect(host: &dyn Host, ingredient: IngredientId, effect: EffectId) -> bool {
    host.ingredient(ingredient)
        .is_some_and(|info| info.knows_effect(effect))
}
