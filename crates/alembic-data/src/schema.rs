//! Serde types matching the on-disk configuration document.
//!
//! Every section and every field is optional. Keys are camelCase. The schema
//! is deliberately lenient where hand-edited files tend to go wrong: perk
//! references of the wrong type read as "not configured" and the rename flag
//! accepts a bool, a number, or a string.

use alembic_core::settings::{
    CraftingSettings, IngredientSettings, KeywordSettings, PerkSettings, Settings,
};
use serde::de::{Deserializer, IgnoredAny};
use serde::Deserialize;
use tracing::warn;

// ===========================================================================
// Document
// ===========================================================================

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    pub debug: DebugConfig,
    pub perks: PerksConfig,
    pub ingredients: IngredientsConfig,
    pub crafting: CraftingSettings,
    /// Overrides for the fixed keyword references. Absent means defaults.
    pub keywords: Option<KeywordSettings>,
}

impl ConfigData {
    /// Split into the runtime settings the distributor consumes.
    pub fn into_settings(self) -> Settings {
        Settings {
            perks: self.perks.into(),
            ingredients: self.ingredients.into(),
            crafting: self.crafting,
            keywords: self.keywords.unwrap_or_default(),
        }
    }
}

// ===========================================================================
// Sections
// ===========================================================================

/// Log thresholds, as spdlog-style level names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DebugConfig {
    pub log_level: Option<String>,
    pub flush_level: Option<String>,
}

/// Perk references in `plugin|hex-id` form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerksConfig {
    #[serde(deserialize_with = "lenient_reference")]
    pub level2: String,
    #[serde(deserialize_with = "lenient_reference")]
    pub level3: String,
    #[serde(deserialize_with = "lenient_reference")]
    pub level4: String,
    #[serde(deserialize_with = "lenient_reference")]
    pub level5: String,
    #[serde(deserialize_with = "lenient_reference")]
    pub potion_quality: String,
    #[serde(deserialize_with = "lenient_reference")]
    pub poison_quality: String,
    #[serde(deserialize_with = "lenient_reference")]
    pub all_quality: String,
    #[serde(deserialize_with = "lenient_reference")]
    pub double_items: String,
}

impl From<PerksConfig> for PerkSettings {
    fn from(c: PerksConfig) -> Self {
        Self {
            level2: c.level2,
            level3: c.level3,
            level4: c.level4,
            level5: c.level5,
            potion_quality: c.potion_quality,
            poison_quality: c.poison_quality,
            all_quality: c.all_quality,
            double_items: c.double_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngredientsConfig {
    /// Older files spell this `addRarirySuffix`.
    #[serde(alias = "addRarirySuffix", deserialize_with = "lenient_flag")]
    pub add_rarity_suffix: bool,
    pub common_suffix: String,
    pub uncommon_suffix: String,
    pub rare_suffix: String,
}

impl Default for IngredientsConfig {
    fn default() -> Self {
        let d = IngredientSettings::default();
        Self {
            add_rarity_suffix: d.rename,
            common_suffix: d.common_suffix,
            uncommon_suffix: d.uncommon_suffix,
            rare_suffix: d.rare_suffix,
        }
    }
}

impl From<IngredientsConfig> for IngredientSettings {
    fn from(c: IngredientsConfig) -> Self {
        Self {
            rename: c.add_rarity_suffix,
            common_suffix: c.common_suffix,
            uncommon_suffix: c.uncommon_suffix,
            rare_suffix: c.rare_suffix,
        }
    }
}

// ===========================================================================
// Lenient fields
// ===========================================================================

/// A string, or anything else read as empty.
fn lenient_reference<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Field::deserialize(deserializer)? {
        Field::Text(s) => s,
        Field::Other(_) => {
            warn!("Ignoring perk reference that is not a string");
            String::new()
        }
    })
}

/// `true`, `1`, `"true"`, or `"1"` enable; anything else disables.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n == 1,
        Flag::Text(s) => s == "true" || s == "1",
        Flag::Other(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(text: &str) -> ConfigData {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn empty_document_uses_defaults() {
        let data = json("{}");
        assert_eq!(data, ConfigData::default());
        let settings = data.into_settings();
        assert!(settings.ingredients.rename);
        assert_eq!(settings.ingredients.rare_suffix, "(Rare)");
        assert_eq!(settings.keywords, KeywordSettings::default());
        assert!(settings.perks.level2.is_empty());
    }

    #[test]
    fn camel_case_keys() {
        let data = json(
            r#"{
                "debug": { "logLevel": "debug", "flushLevel": "warn" },
                "perks": { "level2": "Mod.esp|D61", "potionQuality": "Mod.esp|D65" },
                "crafting": { "level3Alt": "uncommon|uncommon" }
            }"#,
        );
        assert_eq!(data.debug.log_level.as_deref(), Some("debug"));
        assert_eq!(data.debug.flush_level.as_deref(), Some("warn"));
        assert_eq!(data.perks.level2, "Mod.esp|D61");
        assert_eq!(data.perks.potion_quality, "Mod.esp|D65");
        assert_eq!(data.crafting.level3_alt, "uncommon|uncommon");
    }

    #[test]
    fn wrong_type_perk_reads_as_unconfigured() {
        let data = json(r#"{ "perks": { "level2": 42, "doubleItems": ["x"], "level3": "A.esp|1" } }"#);
        assert!(data.perks.level2.is_empty());
        assert!(data.perks.double_items.is_empty());
        assert_eq!(data.perks.level3, "A.esp|1");
    }

    #[test]
    fn rename_flag_forms() {
        let cases = [
            (r#"true"#, true),
            (r#"false"#, false),
            (r#""true""#, true),
            (r#""1""#, true),
            (r#""yes""#, false),
            (r#"1"#, true),
            (r#"0"#, false),
        ];
        for (raw, expected) in cases {
            let data = json(&format!(r#"{{ "ingredients": {{ "addRaritySuffix": {raw} }} }}"#));
            assert_eq!(data.ingredients.add_rarity_suffix, expected, "input {raw}");
        }
    }

    #[test]
    fn misspelled_rename_key_is_accepted() {
        let data = json(r#"{ "ingredients": { "addRarirySuffix": "0" } }"#);
        assert!(!data.ingredients.add_rarity_suffix);
    }

    #[test]
    fn partial_keyword_override() {
        let data = json(r#"{ "keywords": { "rare": "Other.esp|10" } }"#);
        let settings = data.into_settings();
        assert_eq!(settings.keywords.rare, "Other.esp|10");
        assert_eq!(settings.keywords.common, KeywordSettings::default().common);
    }

    #[test]
    fn keyword_section_reads_into_settings_type() {
        let keywords: KeywordSettings = serde_json::from_str(
            r#"{
                "alchemyBench": "Other.esp|A1",
                "levels": ["L|1", "L|2", "L|3", "L|4", "L|5"]
            }"#,
        )
        .unwrap();
        let defaults = KeywordSettings::default();
        assert_eq!(keywords.alchemy_bench, "Other.esp|A1");
        assert_eq!(keywords.levels[4], "L|5");
        assert_eq!(keywords.craftable, defaults.craftable);
        assert_eq!(keywords.rare, defaults.rare);

        let crafting: CraftingSettings =
            toml::from_str("level1 = \"common|common\"\nlevel3Alt = \"rare|common\"").unwrap();
        assert_eq!(crafting.level1, "common|common");
        assert_eq!(crafting.level3_alt, "rare|common");
        assert!(crafting.level5.is_empty());
    }

    #[test]
    fn custom_suffixes_carry_through() {
        let data = json(r#"{ "ingredients": { "commonSuffix": "[C]" } }"#);
        let settings = data.into_settings();
        assert_eq!(settings.ingredients.common_suffix, "[C]");
        assert_eq!(settings.ingredients.uncommon_suffix, "(Uncommon)");
        assert!(settings.ingredients.rename);
    }
}
