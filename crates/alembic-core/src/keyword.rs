//! Keyword resolution.

use crate::distributor::InitError;
use crate::host::Host;
use crate::id::{FormId, KeywordId};
use crate::perk::FormRef;
use crate::rarity::RarityKeywords;
use crate::settings::KeywordSettings;
use tracing::error;

/// Every tag the pipeline tests for, resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordSet {
    pub alchemy_bench: KeywordId,
    pub craftable: KeywordId,
    /// Level tags one through five.
    pub levels: [KeywordId; 5],
    pub rarity: RarityKeywords,
}

fn resolve(host: &dyn Host, name: &'static str, reference: &str) -> Result<KeywordId, InitError> {
    FormRef::parse(reference)
        .and_then(|form| host.lookup_keyword(&form.plugin, form.local_id))
        .ok_or_else(|| {
            error!(keyword = name, reference, "Unable to resolve keyword");
            InitError::MissingKeyword {
                name,
                reference: reference.to_string(),
            }
        })
}

/// Resolve all keywords. Any unresolved keyword is fatal.
pub fn resolve_keywords(host: &dyn Host, settings: &KeywordSettings) -> Result<KeywordSet, InitError> {
    const LEVEL_NAMES: [&str; 5] = ["level1", "level2", "level3", "level4", "level5"];

    let alchemy_bench = resolve(host, "alchemy_bench", &settings.alchemy_bench)?;
    let craftable = resolve(host, "craftable", &settings.craftable)?;

    let mut levels = [KeywordId(FormId(0)); 5];
    for ((slot, name), reference) in levels.iter_mut().zip(LEVEL_NAMES).zip(&settings.levels) {
        *slot = resolve(host, name, reference)?;
    }

    Ok(KeywordSet {
        alchemy_bench,
        craftable,
        levels,
        rarity: RarityKeywords {
            common: resolve(host, "common", &settings.common)?,
            uncommon: resolve(host, "uncommon", &settings.uncommon)?,
            rare: resolve(host, "rare", &settings.rare)?,
        },
    })
}
