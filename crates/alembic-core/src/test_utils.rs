//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.
//!
//! [`FakeHost`] is an in-memory [`Host`]. [`Fixture`] wraps one that already
//! knows every keyword and perk the default [`Settings`] reference, so a test
//! only has to add effects, ingredients, potions, and benches.

use crate::host::{AlchemyItemInfo, BenchType, Host, IngredientInfo};
use crate::id::*;
use crate::potion::PotionLevel;
use crate::rarity::Rarity;
use crate::recipe::{ConstructibleObject, Visibility};
use crate::settings::{PerkSettings, Settings};
use std::collections::{HashMap, HashSet};

// ===========================================================================
// FakeHost
// ===========================================================================

/// Form id of the fake player.
pub const PLAYER: ActorId = ActorId(FormId(0x14));

/// First id handed out for recipes; keeps them apart from other forms.
const RECIPE_BASE: u32 = 0xFF00_0000;

#[derive(Debug, Default)]
pub struct FakeHost {
    next_form: u32,
    keywords: HashMap<(String, u32), KeywordId>,
    perks: HashMap<(String, u32), PerkId>,
    tags: HashMap<FormId, HashSet<KeywordId>>,

    furniture: Vec<FurnitureId>,
    furniture_names: HashMap<FurnitureId, String>,
    bench_types: HashMap<FurnitureId, BenchType>,

    ingredients: Vec<IngredientId>,
    ingredient_info: HashMap<IngredientId, IngredientInfo>,

    potions: Vec<PotionId>,
    potion_info: HashMap<PotionId, AlchemyItemInfo>,

    effect_names: HashMap<EffectId, String>,

    player_perks: HashSet<PerkId>,

    recipes: Vec<ConstructibleObject>,
    /// When set, recipe creation fails once this many exist.
    recipe_capacity: Option<usize>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            next_form: 0x1000,
            ..Default::default()
        }
    }

    fn alloc(&mut self) -> FormId {
        let id = FormId(self.next_form);
        self.next_form += 1;
        id
    }

    // -- Population --

    pub fn add_keyword(&mut self, plugin: &str, local_id: u32) -> KeywordId {
        let id = KeywordId(self.alloc());
        self.keywords.insert((plugin.to_string(), local_id), id);
        id
    }

    pub fn add_perk(&mut self, plugin: &str, local_id: u32) -> PerkId {
        let id = PerkId(self.alloc());
        self.perks.insert((plugin.to_string(), local_id), id);
        id
    }

    pub fn add_effect(&mut self, name: &str) -> EffectId {
        let id = EffectId(self.alloc());
        self.effect_names.insert(id, name.to_string());
        id
    }

    pub fn add_ingredient(&mut self, name: &str, effects: &[EffectId]) -> IngredientId {
        let id = IngredientId(self.alloc());
        self.ingredients.push(id);
        self.ingredient_info.insert(
            id,
            IngredientInfo {
                name: name.to_string(),
                effects: effects.to_vec(),
                known_effects: 0,
            },
        );
        id
    }

    pub fn add_alchemy_item(&mut self, name: &str, effects: &[EffectId], is_poison: bool) -> PotionId {
        let id = PotionId(self.alloc());
        self.potions.push(id);
        self.potion_info.insert(
            id,
            AlchemyItemInfo {
                name: name.to_string(),
                effects: effects.to_vec(),
                is_poison,
            },
        );
        id
    }

    pub fn add_furniture(&mut self, name: &str) -> FurnitureId {
        let id = FurnitureId(self.alloc());
        self.furniture.push(id);
        self.furniture_names.insert(id, name.to_string());
        self.bench_types.insert(id, BenchType::Alchemy);
        id
    }

    /// Enumerate a form id that the host cannot resolve, like a deleted form.
    pub fn add_dangling_ingredient(&mut self) -> IngredientId {
        let id = IngredientId(self.alloc());
        self.ingredients.push(id);
        id
    }

    pub fn tag(&mut self, form: impl Into<FormId>, keyword: KeywordId) {
        self.tags.entry(form.into()).or_default().insert(keyword);
    }

    // -- Player state --

    pub fn grant_perk(&mut self, perk: PerkId) {
        self.player_perks.insert(perk);
    }

    pub fn revoke_perk(&mut self, perk: PerkId) {
        self.player_perks.remove(&perk);
    }

    /// Mark `effect` as discovered on `ingredient`. No-op if the ingredient
    /// does not carry it.
    pub fn learn_effect(&mut self, ingredient: IngredientId, effect: EffectId) {
        if let Some(info) = self.ingredient_info.get_mut(&ingredient) {
            if let Some(slot) = info.effects.iter().position(|&e| e == effect) {
                info.known_effects |= 1 << slot;
            }
        }
    }

    /// Discover every effect on every ingredient.
    pub fn learn_everything(&mut self) {
        for info in self.ingredient_info.values_mut() {
            info.known_effects = (1u32 << info.effects.len().min(31)) - 1;
        }
    }

    // -- Failure injection --

    pub fn limit_recipes(&mut self, capacity: usize) {
        self.recipe_capacity = Some(capacity);
    }

    /// Make an existing recipe produce something that is not an alchemy item.
    pub fn break_recipe_output(&mut self, recipe: RecipeId) {
        let orphan = PotionId(self.alloc());
        if let Some(obj) = self.recipe_mut(recipe) {
            obj.created_item = orphan;
        }
    }

    // -- Inspection --

    pub fn recipes(&self) -> impl Iterator<Item = (RecipeId, &ConstructibleObject)> {
        self.recipes
            .iter()
            .enumerate()
            .map(|(i, obj)| (RecipeId(FormId(RECIPE_BASE + i as u32)), obj))
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&ConstructibleObject> {
        let index = id.form().0.checked_sub(RECIPE_BASE)?;
        self.recipes.get(index as usize)
    }

    fn recipe_mut(&mut self, id: RecipeId) -> Option<&mut ConstructibleObject> {
        let index = id.form().0.checked_sub(RECIPE_BASE)?;
        self.recipes.get_mut(index as usize)
    }

    pub fn visible_recipes(&self) -> Vec<RecipeId> {
        self.recipes()
            .filter(|(_, obj)| obj.visibility().is_visible())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn bench_type(&self, id: FurnitureId) -> Option<BenchType> {
        self.bench_types.get(&id).copied()
    }

    pub fn ingredient_name(&self, id: IngredientId) -> Option<&str> {
        self.ingredient_info.get(&id).map(|i| i.name.as_str())
    }
}

impl Host for FakeHost {
    fn lookup_keyword(&self, plugin: &str, local_id: u32) -> Option<KeywordId> {
        self.keywords.get(&(plugin.to_string(), local_id)).copied()
    }

    fn lookup_perk(&self, plugin: &str, local_id: u32) -> Option<PerkId> {
        self.perks.get(&(plugin.to_string(), local_id)).copied()
    }

    fn furniture(&self) -> Vec<FurnitureId> {
        self.furniture.clone()
    }

    fn ingredients(&self) -> Vec<IngredientId> {
        self.ingredients.clone()
    }

    fn alchemy_items(&self) -> Vec<PotionId> {
        self.potions.clone()
    }

    fn ingredient(&self, id: IngredientId) -> Option<IngredientInfo> {
        self.ingredient_info.get(&id).cloned()
    }

    fn alchemy_item(&self, id: PotionId) -> Option<AlchemyItemInfo> {
        self.potion_info.get(&id).cloned()
    }

    fn furniture_name(&self, id: FurnitureId) -> Option<String> {
        self.furniture_names.get(&id).cloned()
    }

    fn effect_name(&self, effect: EffectId) -> Option<String> {
        self.effect_names.get(&effect).cloned()
    }

    fn has_keyword(&self, form: FormId, keyword: KeywordId) -> bool {
        self.tags.get(&form).is_some_and(|tags| tags.contains(&keyword))
    }

    fn player(&self) -> ActorId {
        PLAYER
    }

    fn player_has_perk(&self, perk: PerkId) -> bool {
        self.player_perks.contains(&perk)
    }

    fn rename_ingredient(&mut self, id: IngredientId, name: String) {
        if let Some(info) = self.ingredient_info.get_mut(&id) {
            info.name = name;
        }
    }

    fn set_bench_type(&mut self, id: FurnitureId, bench: BenchType) {
        self.bench_types.insert(id, bench);
    }

    fn create_constructible(&mut self, object: &ConstructibleObject) -> Option<RecipeId> {
        if self.recipe_capacity.is_some_and(|cap| self.recipes.len() >= cap) {
            return None;
        }
        let id = RecipeId(FormId(RECIPE_BASE + self.recipes.len() as u32));
        self.recipes.push(object.clone());
        Some(id)
    }

    fn recipe_output(&self, recipe: RecipeId) -> Option<PotionId> {
        self.recipe(recipe).map(|obj| obj.created_item)
    }

    fn set_recipe_output(&mut self, recipe: RecipeId, potion: PotionId) {
        if let Some(obj) = self.recipe_mut(recipe) {
            obj.created_item = potion;
        }
    }

    fn set_recipe_quantity(&mut self, recipe: RecipeId, quantity: u16) {
        if let Some(obj) = self.recipe_mut(recipe) {
            obj.quantity = quantity;
        }
    }

    fn set_recipe_visibility(&mut self, recipe: RecipeId, visibility: Visibility) {
        if let Some(obj) = self.recipe_mut(recipe) {
            obj.set_visibility(visibility);
        }
    }
}

// ===========================================================================
// Fixture
// ===========================================================================

pub const PLUGIN: &str = "AlchemyReworked.esp";

/// The perks the default fixture settings point at.
#[derive(Debug, Clone, Copy)]
pub struct FixturePerks {
    pub level2: PerkId,
    pub level3: PerkId,
    pub level4: PerkId,
    pub level5: PerkId,
    pub potion_quality: PerkId,
    pub poison_quality: PerkId,
    pub all_quality: PerkId,
    pub double_items: PerkId,
}

impl FixturePerks {
    pub fn level(&self, level: u8) -> Option<PerkId> {
        match level {
            2 => Some(self.level2),
            3 => Some(self.level3),
            4 => Some(self.level4),
            5 => Some(self.level5),
            _ => None,
        }
    }
}

/// The keywords the default settings point at.
#[derive(Debug, Clone, Copy)]
pub struct FixtureKeywords {
    pub alchemy_bench: KeywordId,
    pub craftable: KeywordId,
    pub levels: [KeywordId; 5],
    pub common: KeywordId,
    pub uncommon: KeywordId,
    pub rare: KeywordId,
}

/// A [`FakeHost`] pre-seeded with every keyword and perk that
/// [`Fixture::settings`] references.
#[derive(Debug)]
pub struct Fixture {
    pub host: FakeHost,
    pub settings: Settings,
    pub keywords: FixtureKeywords,
    pub perks: FixturePerks,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    pub fn new() -> Self {
        let mut host = FakeHost::new();
        let keywords = FixtureKeywords {
            alchemy_bench: host.add_keyword("Skyrim.esm", 0x4F6E6),
            craftable: host.add_keyword(PLUGIN, 0x800),
            levels: [
                host.add_keyword(PLUGIN, 0x801),
                host.add_keyword(PLUGIN, 0x802),
                host.add_keyword(PLUGIN, 0x803),
                host.add_keyword(PLUGIN, 0x804),
                host.add_keyword(PLUGIN, 0x805),
            ],
            common: host.add_keyword(PLUGIN, 0x806),
            uncommon: host.add_keyword(PLUGIN, 0x807),
            rare: host.add_keyword(PLUGIN, 0x808),
        };
        let perks = FixturePerks {
            level2: host.add_perk(PLUGIN, 0x900),
            level3: host.add_perk(PLUGIN, 0x901),
            level4: host.add_perk(PLUGIN, 0x902),
            level5: host.add_perk(PLUGIN, 0x903),
            potion_quality: host.add_perk(PLUGIN, 0x904),
            poison_quality: host.add_perk(PLUGIN, 0x905),
            all_quality: host.add_perk(PLUGIN, 0x906),
            double_items: host.add_perk(PLUGIN, 0x907),
        };
        let settings = Settings {
            perks: PerkSettings {
                level2: format!("{PLUGIN}|900"),
                level3: format!("{PLUGIN}|901"),
                level4: format!("{PLUGIN}|902"),
                level5: format!("{PLUGIN}|903"),
                potion_quality: format!("{PLUGIN}|904"),
                poison_quality: format!("{PLUGIN}|905"),
                all_quality: format!("{PLUGIN}|906"),
                double_items: format!("{PLUGIN}|907"),
            },
            ..Settings::default()
        };
        Self {
            host,
            settings,
            keywords,
            perks,
        }
    }

    pub fn effect(&mut self, name: &str) -> EffectId {
        self.host.add_effect(name)
    }

    /// An ingredient tagged with `rarity`, or untagged when `None`.
    pub fn ingredient(&mut self, name: &str, rarity: Option<Rarity>, effects: &[EffectId]) -> IngredientId {
        let id = self.host.add_ingredient(name, effects);
        if let Some(rarity) = rarity {
            let keyword = match rarity {
                Rarity::Common => self.keywords.common,
                Rarity::Uncommon => self.keywords.uncommon,
                Rarity::Rare => self.keywords.rare,
            };
            self.host.tag(id, keyword);
        }
        id
    }

    /// A craftable single-effect variant tagged with `level`.
    pub fn potion(&mut self, name: &str, effect: EffectId, level: PotionLevel, is_poison: bool) -> PotionId {
        let id = self.host.add_alchemy_item(name, &[effect], is_poison);
        self.host.tag(id, self.keywords.craftable);
        self.host.tag(id, self.keywords.levels[level.get() as usize - 1]);
        id
    }

    /// A full family with a variant at every listed level.
    pub fn family(&mut self, name: &str, effect: EffectId, levels: &[u8], is_poison: bool) -> Vec<PotionId> {
        levels
            .iter()
            .filter_map(|&l| PotionLevel::new(l))
            .map(|level| self.potion(&format!("{name} {level}"), effect, level, is_poison))
            .collect()
    }

    pub fn bench(&mut self, name: &str) -> FurnitureId {
        let id = self.host.add_furniture(name);
        self.host.tag(id, self.keywords.alchemy_bench);
        id
    }

    pub fn grant_level_perks(&mut self, up_to: u8) {
        for level in 2..=up_to {
            if let Some(perk) = self.perks.level(level) {
                self.host.grant_perk(perk);
            }
        }
    }
}
