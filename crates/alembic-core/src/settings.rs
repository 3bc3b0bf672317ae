//! Resolved runtime settings consumed by [`crate::distributor::Distributor`].
//!
//! These are plain values. Reading them from a file is the job of the
//! `alembic-data` crate; the crafting and keyword sections have no lenient
//! fields and deserialize straight into the types here.

use serde::Deserialize;

/// Perk references, each in `plugin|hex-id` form. Empty means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerkSettings {
    pub level2: String,
    pub level3: String,
    pub level4: String,
    pub level5: String,
    pub potion_quality: String,
    pub poison_quality: String,
    pub all_quality: String,
    pub double_items: String,
}

/// Ingredient display-name suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientSettings {
    pub rename: bool,
    pub common_suffix: String,
    pub uncommon_suffix: String,
    pub rare_suffix: String,
}

impl Default for IngredientSettings {
    fn default() -> Self {
        Self {
            rename: true,
            common_suffix: "(Common)".to_string(),
            uncommon_suffix: "(Uncommon)".to_string(),
            rare_suffix: "(Rare)".to_string(),
        }
    }
}

/// Rarity-pair strings per recipe level. Carried through for host tooling;
/// the synthesizer's lattice is fixed and does not read them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CraftingSettings {
    pub level1: String,
    pub level2: String,
    pub level3: String,
    pub level3_alt: String,
    pub level4: String,
    pub level5: String,
}

/// Keyword references, each in `plugin|hex-id` form. Missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeywordSettings {
    pub alchemy_bench: String,
    pub craftable: String,
    pub levels: [String; 5],
    pub common: String,
    pub uncommon: String,
    pub rare: String,
}

impl Default for KeywordSettings {
    fn default() -> Self {
        let plugin = "AlchemyReworked.esp";
        Self {
            alchemy_bench: "Skyrim.esm|0004F6E6".to_string(),
            craftable: format!("{plugin}|800"),
            levels: [
                format!("{plugin}|801"),
                format!("{plugin}|802"),
                format!("{plugin}|803"),
                format!("{plugin}|804"),
                format!("{plugin}|805"),
            ],
            common: format!("{plugin}|806"),
            uncommon: format!("{plugin}|807"),
            rare: format!("{plugin}|808"),
        }
    }
}

/// Everything initialization needs besides the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub perks: PerkSettings,
    pub ingredients: IngredientSettings,
    pub crafting: CraftingSettings,
    pub keywords: KeywordSettings,
}
