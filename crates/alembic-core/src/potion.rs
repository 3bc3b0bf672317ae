//! Potion tier index: craftable single-effect potions and poisons grouped by
//! effect, one slot per power level.

use crate::host::Host;
use crate::id::*;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

/// Discrete potency rank of a potion variant or a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PotionLevel {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl PotionLevel {
    /// All levels in ascending order.
    pub const ALL: [PotionLevel; 5] = [
        PotionLevel::One,
        PotionLevel::Two,
        PotionLevel::Three,
        PotionLevel::Four,
        PotionLevel::Five,
    ];

    pub fn new(level: u8) -> Option<Self> {
        match level {
            1 => Some(PotionLevel::One),
            2 => Some(PotionLevel::Two),
            3 => Some(PotionLevel::Three),
            4 => Some(PotionLevel::Four),
            5 => Some(PotionLevel::Five),
            _ => None,
        }
    }

    pub fn get(self) -> u8 {
        self as u8
    }

    fn index(self) -> usize {
        self as usize - 1
    }

    /// Raise by `steps`, never past `cap`. The result is never below `self`
    /// unless `cap` itself is lower.
    pub fn raised(self, steps: u8, cap: PotionLevel) -> PotionLevel {
        let raised = self.get().saturating_add(steps).min(cap.get());
        PotionLevel::new(raised).unwrap_or(cap)
    }
}

impl fmt::Display for PotionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// The variants of one effect, at most one per level. Any slot may be empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PotionFamily {
    variants: [Option<PotionId>; 5],
}

impl PotionFamily {
    pub fn get(&self, level: PotionLevel) -> Option<PotionId> {
        self.variants[level.index()]
    }

    /// Fill the slot for `level`. Returns `false` and leaves the family
    /// unchanged when the slot is already taken.
    pub fn insert(&mut self, level: PotionLevel, potion: PotionId) -> bool {
        let slot = &mut self.variants[level.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(potion);
        true
    }

    /// The variant at the highest populated level not above `target`.
    ///
    /// Levels are searched downward from `target`. Targets above five are
    /// treated as five; a target of zero finds nothing.
    pub fn highest_at_or_below(&self, target: u8) -> Option<(PotionLevel, PotionId)> {
        PotionLevel::ALL
            .iter()
            .rev()
            .filter(|level| level.get() <= target)
            .find_map(|&level| self.get(level).map(|potion| (level, potion)))
    }

    /// The variant at the lowest populated level.
    pub fn earliest(&self) -> Option<(PotionLevel, PotionId)> {
        PotionLevel::ALL
            .iter()
            .find_map(|&level| self.get(level).map(|potion| (level, potion)))
    }

    /// Populated slots in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (PotionLevel, PotionId)> + '_ {
        PotionLevel::ALL
            .iter()
            .filter_map(|&level| self.get(level).map(|potion| (level, potion)))
    }

    pub fn is_empty(&self) -> bool {
        self.variants.iter().all(Option::is_none)
    }
}

/// Effect -> family mapping built once at load.
#[derive(Debug, Clone, Default)]
pub struct PotionIndex {
    families: BTreeMap<EffectId, PotionFamily>,
}

impl PotionIndex {
    pub fn family(&self, effect: EffectId) -> Option<&PotionFamily> {
        self.families.get(&effect)
    }

    /// Families in effect-id order.
    pub fn families(&self) -> impl Iterator<Item = (EffectId, &PotionFamily)> {
        self.families.iter().map(|(&effect, family)| (effect, family))
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Record `potion` as the `level` variant of `effect`. Returns `false`
    /// when that slot was already filled.
    pub fn insert(&mut self, effect: EffectId, level: PotionLevel, potion: PotionId) -> bool {
        self.families.entry(effect).or_default().insert(level, potion)
    }
}

/// Build the potion index from every alchemy item the host knows about.
///
/// Items without the `craftable` tag and items with anything other than
/// exactly one effect are left out. An item with none of the level tags is
/// logged and left out. Level tags are tested from one to five and the first
/// match wins.
pub fn index_potions(host: &dyn Host, craftable: KeywordId, levels: &[KeywordId; 5]) -> PotionIndex {
    let mut index = PotionIndex::default();

    for id in host.alchemy_items() {
        let Some(item) = host.alchemy_item(id) else {
            continue;
        };
        if !host.has_keyword(id.form(), craftable) {
            continue;
        }
        let Some(effect) = item.single_effect() else {
            info!(potion = %item.name, effects = item.effects.len(), "Skipping multi-effect item");
            continue;
        };

        let level = PotionLevel::ALL
            .iter()
            .zip(levels)
            .find(|(_, keyword)| host.has_keyword(id.form(), **keyword))
            .map(|(&level, _)| level);

        let Some(level) = level else {
            info!(potion = %item.name, is_poison = item.is_poison, "Skipping, no alchemy level assigned");
            continue;
        };

        if index.insert(effect, level, id) {
            info!(potion = %item.name, is_poison = item.is_poison, %level, "Processing");
        } else {
            warn!(potion = %item.name, %effect, %level, "Duplicate variant for effect and level, ignored");
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potion(n: u32) -> PotionId {
        PotionId(FormId(n))
    }

    fn family_with(levels: &[u8]) -> PotionFamily {
        let mut family = PotionFamily::default();
        for &l in levels {
            family.insert(PotionLevel::new(l).unwrap(), potion(100 + l as u32));
        }
        family
    }

    #[test]
    fn lookup_walks_down_to_nearest_level() {
        let family = family_with(&[1, 3, 5]);
        assert_eq!(family.highest_at_or_below(4).map(|(l, _)| l), Some(PotionLevel::Three));
        assert_eq!(family.highest_at_or_below(2), Some((PotionLevel::One, potion(101))));
        assert_eq!(family.highest_at_or_below(5), Some((PotionLevel::Five, potion(105))));
        assert_eq!(family.highest_at_or_below(0), None);
    }

    #[test]
    fn lookup_without_level_one_is_absent_below_first_variant() {
        let family = family_with(&[2, 4]);
        assert_eq!(family.highest_at_or_below(1), None);
        assert_eq!(family.highest_at_or_below(3), Some((PotionLevel::Two, potion(102))));
    }

    #[test]
    fn lookup_above_five_clamps() {
        let family = family_with(&[5]);
        assert_eq!(family.highest_at_or_below(9), Some((PotionLevel::Five, potion(105))));
    }

    #[test]
    fn earliest_skips_empty_slots() {
        assert_eq!(family_with(&[3, 4]).earliest(), Some((PotionLevel::Three, potion(103))));
        assert_eq!(PotionFamily::default().earliest(), None);
        assert!(PotionFamily::default().is_empty());
    }

    #[test]
    fn insert_keeps_first_variant() {
        let mut family = PotionFamily::default();
        assert!(family.insert(PotionLevel::Two, potion(1)));
        assert!(!family.insert(PotionLevel::Two, potion(2)));
        assert_eq!(family.get(PotionLevel::Two), Some(potion(1)));
    }

    #[test]
    fn raised_clamps_to_cap() {
        assert_eq!(PotionLevel::Two.raised(2, PotionLevel::Three), PotionLevel::Three);
        assert_eq!(PotionLevel::Two.raised(1, PotionLevel::Five), PotionLevel::Three);
        assert_eq!(PotionLevel::Four.raised(3, PotionLevel::Five), PotionLevel::Five);
        assert_eq!(PotionLevel::Three.raised(0, PotionLevel::Five), PotionLevel::Three);
    }

    #[test]
    fn level_round_trips_through_u8() {
        for level in PotionLevel::ALL {
            assert_eq!(PotionLevel::new(level.get()), Some(level));
        }
        assert_eq!(PotionLevel::new(0), None);
        assert_eq!(PotionLevel::new(6), None);
    }
}
