//! Perk resolution and the perk-driven rules of the access gate.
//!
//! Level-gating perks for levels two through five are mandatory. The quality
//! and double-items perks are optional; an absent one simply never applies.

use crate::distributor::InitError;
use crate::host::Host;
use crate::id::*;
use crate::potion::PotionLevel;
use crate::settings::PerkSettings;
use tracing::{error, info};

/// A `plugin|hex-id` reference to a form defined in a plugin file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormRef {
    pub plugin: String,
    pub local_id: u32,
}

impl FormRef {
    /// Parse `plugin|hex-id`. Returns `None` if the separator is missing,
    /// either side is empty, or the id is not hexadecimal.
    pub fn parse(reference: &str) -> Option<Self> {
        let (plugin, id) = reference.split_once('|')?;
        let (plugin, id) = (plugin.trim(), id.trim());
        if plugin.is_empty() || id.is_empty() {
            return None;
        }
        let digits = id
            .strip_prefix("0x")
            .or_else(|| id.strip_prefix("0X"))
            .unwrap_or(id);
        let local_id = u32::from_str_radix(digits, 16).ok()?;
        Some(Self {
            plugin: plugin.to_string(),
            local_id,
        })
    }
}

/// Resolve a configured perk reference against the host.
pub fn resolve_perk(host: &dyn Host, reference: &str) -> Option<PerkId> {
    info!(reference, "Loading perk");
    let form = FormRef::parse(reference)?;
    host.lookup_perk(&form.plugin, form.local_id)
}

/// The perks that unlock recipe levels two through five.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPerks {
    perks: [PerkId; 4],
}

impl LevelPerks {
    pub fn new(level2: PerkId, level3: PerkId, level4: PerkId, level5: PerkId) -> Self {
        Self {
            perks: [level2, level3, level4, level5],
        }
    }

    /// The perk gating `level`. Level one needs none.
    pub fn required_for(&self, level: PotionLevel) -> Option<PerkId> {
        match level {
            PotionLevel::One => None,
            other => Some(self.perks[other.get() as usize - 2]),
        }
    }

    /// Highest level whose gating perk the player holds, searched from five
    /// downward. Level one when the player holds none of them.
    pub fn max_allowed_level(&self, host: &dyn Host) -> PotionLevel {
        PotionLevel::ALL
            .iter()
            .rev()
            .copied()
            .find(|&level| {
                self.required_for(level)
                    .is_some_and(|perk| host.player_has_perk(perk))
            })
            .unwrap_or(PotionLevel::One)
    }

    /// Whether the player may craft recipes of `level` at all.
    pub fn unlocks(&self, host: &dyn Host, level: PotionLevel) -> bool {
        self.required_for(level)
            .is_none_or(|perk| host.player_has_perk(perk))
    }
}

/// Optional perks that raise potion quality or output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualityPerks {
    pub potion_quality: Option<PerkId>,
    pub poison_quality: Option<PerkId>,
    pub all_quality: Option<PerkId>,
    pub double_items: Option<PerkId>,
}

fn holds(host: &dyn Host, perk: Option<PerkId>) -> bool {
    perk.is_some_and(|perk| host.player_has_perk(perk))
}

impl QualityPerks {
    /// Number of levels to add to a recipe's output. The potion perk counts
    /// only for potions, the poison perk only for poisons, the all perk for
    /// both.
    pub fn level_boost(&self, host: &dyn Host, is_poison: bool) -> u8 {
        let potion = !is_poison && holds(host, self.potion_quality);
        let poison = is_poison && holds(host, self.poison_quality);
        let all = holds(host, self.all_quality);
        [potion, poison, all].into_iter().filter(|&b| b).count() as u8
    }

    pub fn doubles_output(&self, host: &dyn Host) -> bool {
        holds(host, self.double_items)
    }
}

/// Every perk handle the access gate consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerkTable {
    pub levels: LevelPerks,
    pub quality: QualityPerks,
}

fn require_level_perk(host: &dyn Host, reference: &str, level: u8) -> Result<PerkId, InitError> {
    resolve_perk(host, reference).ok_or_else(|| {
        error!(level, reference, "Unable to load level perk from config");
        InitError::MissingLevelPerk {
            level,
            reference: reference.to_string(),
        }
    })
}

fn optional_perk(host: &dyn Host, reference: &str, purpose: &str) -> Option<PerkId> {
    if reference.is_empty() {
        return None;
    }
    let perk = resolve_perk(host, reference);
    match perk {
        Some(_) => info!(purpose, "Loaded perk"),
        None => info!(purpose, reference, "Unable to load perk"),
    }
    perk
}

/// Resolve all configured perks. Fails on the first missing level perk.
pub fn resolve_perks(host: &dyn Host, settings: &PerkSettings) -> Result<PerkTable, InitError> {
    let levels = LevelPerks::new(
        require_level_perk(host, &settings.level2, 2)?,
        require_level_perk(host, &settings.level3, 3)?,
        require_level_perk(host, &settings.level4, 4)?,
        require_level_perk(host, &settings.level5, 5)?,
    );

    let quality = QualityPerks {
        potion_quality: optional_perk(host, &settings.potion_quality, "potion +1 level"),
        poison_quality: optional_perk(host, &settings.poison_quality, "poison +1 level"),
        all_quality: optional_perk(host, &settings.all_quality, "all +1 level"),
        double_items: optional_perk(host, &settings.double_items, "double potions"),
    };

    Ok(PerkTable { levels, quality })
}
