//! Rarity classification of ingredients.

use crate::host::Host;
use crate::id::*;
use crate::settings::IngredientSettings;
use std::fmt;
use tracing::debug;

/// Ingredient rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
}

impl Rarity {
    /// Tier for ingredients that carry none of the tier tags.
    pub const FALLBACK: Rarity = Rarity::Uncommon;

    pub fn suffix(self, settings: &IngredientSettings) -> &str {
        match self {
            Rarity::Common => &settings.common_suffix,
            Rarity::Uncommon => &settings.uncommon_suffix,
            Rarity::Rare => &settings.rare_suffix,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
        })
    }
}

/// The three tier tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RarityKeywords {
    pub common: KeywordId,
    pub uncommon: KeywordId,
    pub rare: KeywordId,
}

impl RarityKeywords {
    /// First matching tier in common, uncommon, rare order.
    pub fn classify(&self, host: &dyn Host, form: FormId) -> Option<Rarity> {
        [
            (Rarity::Common, self.common),
            (Rarity::Uncommon, self.uncommon),
            (Rarity::Rare, self.rare),
        ]
        .into_iter()
        .find(|&(_, keyword)| host.has_keyword(form, keyword))
        .map(|(rarity, _)| rarity)
    }
}

/// An ingredient as the synthesizer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PooledIngredient {
    pub id: IngredientId,
    pub name: String,
    pub effects: Vec<EffectId>,
}

impl PooledIngredient {
    pub fn has_effect(&self, effect: EffectId) -> bool {
        self.effects.contains(&effect)
    }
}

/// Ingredients partitioned by tier, each in host enumeration order.
#[derive(Debug, Clone, Default)]
pub struct RarityPools {
    pub common: Vec<PooledIngredient>,
    pub uncommon: Vec<PooledIngredient>,
    pub rare: Vec<PooledIngredient>,
}

impl RarityPools {
    pub fn pool(&self, rarity: Rarity) -> &[PooledIngredient] {
        match rarity {
            Rarity::Common => &self.common,
            Rarity::Uncommon => &self.uncommon,
            Rarity::Rare => &self.rare,
        }
    }

    fn pool_mut(&mut self, rarity: Rarity) -> &mut Vec<PooledIngredient> {
        match rarity {
            Rarity::Common => &mut self.common,
            Rarity::Uncommon => &mut self.uncommon,
            Rarity::Rare => &mut self.rare,
        }
    }

    /// Total ingredients across all tiers.
    pub fn len(&self) -> usize {
        self.common.len() + self.uncommon.len() + self.rare.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The tier an ingredient was placed in.
    pub fn rarity_of(&self, id: IngredientId) -> Option<Rarity> {
        [Rarity::Common, Rarity::Uncommon, Rarity::Rare]
            .into_iter()
            .find(|&rarity| self.pool(rarity).iter().any(|i| i.id == id))
    }

    /// Members of one tier that carry `effect`.
    pub fn with_effect(&self, rarity: Rarity, effect: EffectId) -> Vec<&PooledIngredient> {
        self.pool(rarity).iter().filter(|i| i.has_effect(effect)).collect()
    }
}

/// Append ` {suffix}` to `name` unless it is already there.
pub fn suffixed_name(name: &str, suffix: &str) -> Option<String> {
    if suffix.is_empty() || name.ends_with(&format!(" {suffix}")) {
        return None;
    }
    Some(format!("{name} {suffix}"))
}

/// Partition every host ingredient into a tier.
///
/// Untagged ingredients fall back to [`Rarity::FALLBACK`]. When renaming is
/// enabled the tier suffix is appended to the display name.
pub fn classify_ingredients(
    host: &mut dyn Host,
    keywords: &RarityKeywords,
    settings: &IngredientSettings,
) -> RarityPools {
    let mut pools = RarityPools::default();

    for id in host.ingredients() {
        let Some(info) = host.ingredient(id) else {
            continue;
        };
        let rarity = keywords
            .classify(&*host, id.form())
            .unwrap_or(Rarity::FALLBACK);

        let mut name = info.name;
        if settings.rename {
            if let Some(renamed) = suffixed_name(&name, rarity.suffix(settings)) {
                host.rename_ingredient(id, renamed.clone());
                name = renamed;
            }
        }

        debug!(ingredient = %name, %rarity, "Classified ingredient");
        pools.pool_mut(rarity).push(PooledIngredient {
            id,
            name,
            effects: info.effects,
        });
    }

    pools
}
