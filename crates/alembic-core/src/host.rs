//! The host adapter boundary.
//!
//! The host engine owns every entity this crate touches. Everything the core
//! needs from it (lookup, enumeration, tag and perk tests, and the handful of
//! mutations it performs) goes through the object-safe [`Host`] trait, so the
//! whole pipeline runs unchanged against a real engine binding or against
//! [`crate::test_utils::FakeHost`].

use crate::id::*;
use crate::recipe::{ConstructibleObject, Visibility};

/// Read-only view of an ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientInfo {
    pub name: String,
    /// Effects in slot order. Slot `i` corresponds to bit `i` of `known_effects`.
    pub effects: Vec<EffectId>,
    /// Bitmask of effect slots the player has discovered by experimentation.
    pub known_effects: u32,
}

impl IngredientInfo {
    pub fn has_effect(&self, effect: EffectId) -> bool {
        self.effects.contains(&effect)
    }

    /// Whether the player has discovered `effect` on this ingredient. An
    /// ingredient that does not carry the effect at all reports `false`.
    pub fn knows_effect(&self, effect: EffectId) -> bool {
        match self.effects.iter().position(|&e| e == effect) {
            Some(slot) if slot < 32 => self.known_effects & (1 << slot) != 0,
            _ => false,
        }
    }
}

/// Read-only view of a potion or poison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlchemyItemInfo {
    pub name: String,
    pub effects: Vec<EffectId>,
    pub is_poison: bool,
}

impl AlchemyItemInfo {
    /// The effect of a single-effect item. Multi-effect and effectless items
    /// have none.
    pub fn single_effect(&self) -> Option<EffectId> {
        match self.effects.as_slice() {
            [effect] => Some(*effect),
            _ => None,
        }
    }

    /// The first listed effect, which decides the family of a produced item.
    pub fn primary_effect(&self) -> Option<EffectId> {
        self.effects.first().copied()
    }
}

/// Workbench behaviour flag on furniture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BenchType {
    None,
    /// Generic crafting: shows constructible objects tagged for the bench.
    CreateObject,
    /// The engine's built-in alchemy menu.
    Alchemy,
}

/// Everything the core consumes from, and produces for, the host engine.
///
/// Implementations must be cheap to call: the access gate queries perks and
/// ingredient knowledge once per recipe on every bench visit.
pub trait Host {
    // -- Lookup --

    /// Resolve a keyword defined in `plugin` at `local_id`.
    fn lookup_keyword(&self, plugin: &str, local_id: u32) -> Option<KeywordId>;

    /// Resolve a perk defined in `plugin` at `local_id`.
    fn lookup_perk(&self, plugin: &str, local_id: u32) -> Option<PerkId>;

    // -- Enumeration --

    fn furniture(&self) -> Vec<FurnitureId>;

    fn ingredients(&self) -> Vec<IngredientId>;

    fn alchemy_items(&self) -> Vec<PotionId>;

    // -- Entity views --

    fn ingredient(&self, id: IngredientId) -> Option<IngredientInfo>;

    fn alchemy_item(&self, id: PotionId) -> Option<AlchemyItemInfo>;

    fn furniture_name(&self, id: FurnitureId) -> Option<String>;

    /// Display name of an effect, used only for logging.
    fn effect_name(&self, _effect: EffectId) -> Option<String> {
        None
    }

    // -- Tests --

    fn has_keyword(&self, form: FormId, keyword: KeywordId) -> bool;

    fn player(&self) -> ActorId;

    fn player_has_perk(&self, perk: PerkId) -> bool;

    // -- Mutation --

    fn rename_ingredient(&mut self, id: IngredientId, name: String);

    fn set_bench_type(&mut self, id: FurnitureId, bench: BenchType);

    /// Allocate a constructible object and add it to the global recipe list.
    /// Returns `None` when the host cannot allocate one.
    fn create_constructible(&mut self, object: &ConstructibleObject) -> Option<RecipeId>;

    /// The item a recipe currently produces, if the recipe still exists and
    /// still produces an alchemy item.
    fn recipe_output(&self, recipe: RecipeId) -> Option<PotionId>;

    fn set_recipe_output(&mut self, recipe: RecipeId, potion: PotionId);

    fn set_recipe_quantity(&mut self, recipe: RecipeId, quantity: u16);

    /// Write the visibility state into the recipe's head condition.
    fn set_recipe_visibility(&mut self, recipe: RecipeId, visibility: Visibility);
}
