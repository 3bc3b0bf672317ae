//! Recipe synthesis: two-ingredient constructible objects generated from the
//! rarity lattice, plus the sidecar metadata the access gate reads.
//!
//! # Lattice
//!
//! | Pools               | Level |
//! |---------------------|-------|
//! | common + common     | 1     |
//! | common + uncommon   | 2     |
//! | common + rare       | 3     |
//! | uncommon + uncommon | 3     |
//! | uncommon + rare     | 4     |
//! | rare + rare         | 5     |
//!
//! A rule is skipped when its family has no variant at the rule's level.

use crate::host::Host;
use crate::id::*;
use crate::potion::{PotionFamily, PotionIndex, PotionLevel};
use crate::rarity::{PooledIngredient, Rarity, RarityPools};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// Whether a recipe shows up at the bench.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

impl Visibility {
    /// Comparison value of the head condition. `GetIsReference(player)`
    /// evaluates to 1.0, so 0.0 hides the recipe and 1.0 shows it.
    pub fn comparison_value(self) -> f32 {
        match self {
            Visibility::Hidden => 0.0,
            Visibility::Visible => 1.0,
        }
    }

    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// Condition functions a recipe uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFunction {
    GetIsReference(ActorId),
    GetItemCount(IngredientId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    EqualTo,
    GreaterThanOrEqualTo,
}

/// One term of a recipe's condition chain. Terms are AND-ed in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionItem {
    pub function: ConditionFunction,
    pub op: CompareOp,
    pub comparison_value: f32,
}

// ---------------------------------------------------------------------------
// Constructible object
// ---------------------------------------------------------------------------

/// An ingredient requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredItem {
    pub item: IngredientId,
    pub count: u32,
}

/// The recipe entity handed to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructibleObject {
    pub bench_keyword: KeywordId,
    pub required_items: Vec<RequiredItem>,
    pub created_item: PotionId,
    pub quantity: u16,
    /// Head term is the visibility toggle.
    pub conditions: Vec<ConditionItem>,
}

impl ConstructibleObject {
    /// A hidden recipe turning one of each ingredient into one `potion`.
    pub fn new(
        bench_keyword: KeywordId,
        player: ActorId,
        first: IngredientId,
        second: IngredientId,
        potion: PotionId,
    ) -> Self {
        let has_item = |item| ConditionItem {
            function: ConditionFunction::GetItemCount(item),
            op: CompareOp::GreaterThanOrEqualTo,
            comparison_value: 1.0,
        };
        Self {
            bench_keyword,
            required_items: vec![
                RequiredItem { item: first, count: 1 },
                RequiredItem { item: second, count: 1 },
            ],
            created_item: potion,
            quantity: 1,
            conditions: vec![
                ConditionItem {
                    function: ConditionFunction::GetIsReference(player),
                    op: CompareOp::EqualTo,
                    comparison_value: Visibility::Hidden.comparison_value(),
                },
                has_item(second),
                has_item(first),
            ],
        }
    }

    /// Visibility as encoded in the head condition.
    pub fn visibility(&self) -> Visibility {
        match self.conditions.first() {
            Some(head) if head.comparison_value != 0.0 => Visibility::Visible,
            _ => Visibility::Hidden,
        }
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        if let Some(head) = self.conditions.first_mut() {
            head.comparison_value = visibility.comparison_value();
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Sidecar data for one synthesized recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeMetadata {
    /// Level of the rarity rule that produced the recipe.
    pub target_ingredient_level: PotionLevel,
    /// Level the recipe produces before quality boosts; also the perk gate.
    pub potion_min_level: PotionLevel,
    pub ingr1: IngredientId,
    pub ingr2: IngredientId,
    pub effect: EffectId,
    pub base_potion: PotionId,
    /// Poison flag of `base_potion`; picks which quality perk applies.
    pub is_poison: bool,
    pub visibility: Visibility,
}

/// Recipe -> metadata. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    entries: BTreeMap<RecipeId, RecipeMetadata>,
}

impl MetadataIndex {
    pub fn get(&self, recipe: RecipeId) -> Option<&RecipeMetadata> {
        self.entries.get(&recipe)
    }

    pub fn get_mut(&mut self, recipe: RecipeId) -> Option<&mut RecipeMetadata> {
        self.entries.get_mut(&recipe)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecipeId, &RecipeMetadata)> {
        self.entries.iter().map(|(&id, meta)| (id, meta))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RecipeId, &mut RecipeMetadata)> {
        self.entries.iter_mut().map(|(&id, meta)| (id, meta))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, recipe: RecipeId, metadata: RecipeMetadata) {
        self.entries.insert(recipe, metadata);
    }
}

// ---------------------------------------------------------------------------
// Lattice
// ---------------------------------------------------------------------------

/// Unordered ingredient pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(IngredientId, IngredientId);

impl PairKey {
    pub fn new(a: IngredientId, b: IngredientId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// One entry of the rarity lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RarityRule {
    pub first: Rarity,
    pub second: Rarity,
    pub level: PotionLevel,
}

pub const LATTICE: [RarityRule; 6] = [
    RarityRule { first: Rarity::Common, second: Rarity::Common, level: PotionLevel::One },
    RarityRule { first: Rarity::Common, second: Rarity::Uncommon, level: PotionLevel::Two },
    RarityRule { first: Rarity::Common, second: Rarity::Rare, level: PotionLevel::Three },
    RarityRule { first: Rarity::Uncommon, second: Rarity::Uncommon, level: PotionLevel::Three },
    RarityRule { first: Rarity::Uncommon, second: Rarity::Rare, level: PotionLevel::Four },
    RarityRule { first: Rarity::Rare, second: Rarity::Rare, level: PotionLevel::Five },
];

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// Creates recipes in the host and records their metadata.
pub struct Synthesizer<'h> {
    host: &'h mut dyn Host,
    bench_keyword: KeywordId,
    player: ActorId,
    metadata: MetadataIndex,
}

impl<'h> Synthesizer<'h> {
    pub fn new(host: &'h mut dyn Host, bench_keyword: KeywordId) -> Self {
        let player = host.player();
        Self {
            host,
            bench_keyword,
            player,
            metadata: MetadataIndex::default(),
        }
    }

    /// Create one recipe per unordered pair drawn from `first` x `second`,
    /// skipping self-pairs and pairs already created by this call. Returns
    /// the number of recipes created.
    pub fn create_recipes(
        &mut self,
        first: &[&PooledIngredient],
        second: &[&PooledIngredient],
        effect: EffectId,
        potion: PotionId,
        target_level: PotionLevel,
        min_level: PotionLevel,
    ) -> usize {
        let mut seen: HashSet<PairKey> = HashSet::new();
        let effect_name = self
            .host
            .effect_name(effect)
            .unwrap_or_else(|| effect.to_string());
        let is_poison = self
            .host
            .alchemy_item(potion)
            .is_some_and(|item| item.is_poison);
        let mut created = 0;

        for ingr1 in first {
            for ingr2 in second {
                if ingr1.id == ingr2.id || !seen.insert(PairKey::new(ingr1.id, ingr2.id)) {
                    continue;
                }

                let object = ConstructibleObject::new(
                    self.bench_keyword,
                    self.player,
                    ingr1.id,
                    ingr2.id,
                    potion,
                );
                let Some(recipe) = self.host.create_constructible(&object) else {
                    warn!(ingr1 = %ingr1.name, ingr2 = %ingr2.name, "Host could not allocate recipe");
                    continue;
                };

                debug!(
                    level = %target_level,
                    effect = %effect_name,
                    ingr1 = %ingr1.name,
                    ingr2 = %ingr2.name,
                    "Recipe created"
                );
                self.metadata.insert(
                    recipe,
                    RecipeMetadata {
                        target_ingredient_level: target_level,
                        potion_min_level: min_level,
                        ingr1: ingr1.id,
                        ingr2: ingr2.id,
                        effect,
                        base_potion: potion,
                        is_poison,
                        visibility: Visibility::Hidden,
                    },
                );
                created += 1;
            }
        }

        created
    }

    /// Apply every lattice rule to one effect family.
    pub fn synthesize_family(
        &mut self,
        pools: &RarityPools,
        effect: EffectId,
        family: &PotionFamily,
    ) -> usize {
        // Indexed by `Rarity as usize`.
        let tiers = [
            pools.with_effect(Rarity::Common, effect),
            pools.with_effect(Rarity::Uncommon, effect),
            pools.with_effect(Rarity::Rare, effect),
        ];

        let mut created = 0;
        for rule in LATTICE {
            let Some(potion) = family.get(rule.level) else {
                continue;
            };
            created += self.create_recipes(
                &tiers[rule.first as usize],
                &tiers[rule.second as usize],
                effect,
                potion,
                rule.level,
                rule.level,
            );
        }
        created
    }

    pub fn finish(self) -> MetadataIndex {
        self.metadata
    }
}

/// Run the whole lattice over every family in `index`.
pub fn synthesize_recipes(
    host: &mut dyn Host,
    bench_keyword: KeywordId,
    pools: &RarityPools,
    index: &PotionIndex,
) -> MetadataIndex {
    let mut synthesizer = Synthesizer::new(host, bench_keyword);
    for (effect, family) in index.families() {
        synthesizer.synthesize_family(pools, effect, family);
    }
    synthesizer.finish()
}
