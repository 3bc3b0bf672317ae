//! Load-time pipeline tests: keyword and perk resolution, bench override,
//! classification, potion indexing, and recipe synthesis against a
//! [`Fixture`] host.

use alembic_core::distributor::{Distributor, InitError};
use alembic_core::event::{FurnitureEvent, FurnitureEventSource};
use alembic_core::host::BenchType;
use alembic_core::id::*;
use alembic_core::potion::PotionLevel;
use alembic_core::rarity::Rarity;
use alembic_core::recipe::{PairKey, Visibility};
use alembic_core::test_utils::*;
use std::collections::HashSet;

// ===========================================================================
// Helpers
// ===========================================================================

struct World {
    fx: Fixture,
    effect: EffectId,
    common: Vec<IngredientId>,
    uncommon: Vec<IngredientId>,
    rare: Vec<IngredientId>,
    potions: Vec<PotionId>,
}

/// Three common, two uncommon (one untagged), two rare ingredients sharing
/// one effect, plus one common ingredient without it, and a full family.
fn world() -> World {
    let mut fx = Fixture::new();
    let effect = fx.effect("Restore Health");
    let other = fx.effect("Fortify Sneak");

    let common = vec![
        fx.ingredient("Blue Mountain Flower", Some(Rarity::Common), &[effect, other]),
        fx.ingredient("Wheat", Some(Rarity::Common), &[other, effect]),
        fx.ingredient("Imp Stool", Some(Rarity::Common), &[effect]),
    ];
    fx.ingredient("Frost Mirriam", Some(Rarity::Common), &[other]);
    let uncommon = vec![
        fx.ingredient("Troll Fat", Some(Rarity::Uncommon), &[effect]),
        fx.ingredient("Mudcrab Chitin", None, &[effect]),
    ];
    let rare = vec![
        fx.ingredient("Daedra Heart", Some(Rarity::Rare), &[effect]),
        fx.ingredient("Salt Pile", Some(Rarity::Rare), &[effect]),
    ];
    let potions = fx.family("Potion of Healing", effect, &[1, 2, 3, 4, 5], false);

    World {
        fx,
        effect,
        common,
        uncommon,
        rare,
        potions,
    }
}

// ===========================================================================
// Successful load
// ===========================================================================

#[test]
fn full_lattice_recipe_count() {
    let mut w = world();
    let settings = w.fx.settings.clone();
    let (ctx, summary) = Distributor::new(&settings).build(&mut w.fx.host).unwrap();

    // L1 3 + L2 6 + L3 6 + L3alt 1 + L4 4 + L5 1
    assert_eq!(summary.recipes, 21);
    assert_eq!(ctx.recipes.len(), 21);
    assert_eq!(w.fx.host.recipe_count(), 21);
    assert_eq!(summary.ingredients, 8);
    assert_eq!(summary.potion_families, 1);
}

#[test]
fn recipes_per_level_match_lattice() {
    let mut w = world();
    let settings = w.fx.settings.clone();
    let (ctx, _) = Distributor::new(&settings).build(&mut w.fx.host).unwrap();

    let count = |level: PotionLevel| {
        ctx.recipes
            .iter()
            .filter(|(_, m)| m.target_ingredient_level == level)
            .count()
    };
    assert_eq!(count(PotionLevel::One), 3);
    assert_eq!(count(PotionLevel::Two), 6);
    assert_eq!(count(PotionLevel::Three), 7);
    assert_eq!(count(PotionLevel::Four), 4);
    assert_eq!(count(PotionLevel::Five), 1);
}

#[test]
fn recipes_start_hidden_with_base_output() {
    let mut w = world();
    let settings = w.fx.settings.clone();
    let (ctx, _) = Distributor::new(&settings).build(&mut w.fx.host).unwrap();

    for (id, meta) in ctx.recipes.iter() {
        let obj = w.fx.host.recipe(id).unwrap();
        assert_eq!(obj.visibility(), Visibility::Hidden);
        assert_eq!(obj.quantity, 1);
        assert_eq!(obj.bench_keyword, w.fx.keywords.alchemy_bench);
        assert_eq!(obj.created_item, meta.base_potion);
        assert_eq!(
            meta.base_potion,
            w.potions[meta.potion_min_level.get() as usize - 1]
        );
        assert_eq!(meta.effect, w.effect);
        assert_eq!(meta.visibility, Visibility::Hidden);
        let required: Vec<IngredientId> = obj.required_items.iter().map(|r| r.item).collect();
        assert_eq!(required, vec![meta.ingr1, meta.ingr2]);
    }
}

#[test]
fn no_duplicate_or_self_pairs() {
    let mut w = world();
    let settings = w.fx.settings.clone();
    let (ctx, _) = Distributor::new(&settings).build(&mut w.fx.host).unwrap();

    let mut seen = HashSet::new();
    for (_, meta) in ctx.recipes.iter() {
        assert_ne!(meta.ingr1, meta.ingr2);
        assert!(
            seen.insert((meta.target_ingredient_level, PairKey::new(meta.ingr1, meta.ingr2))),
            "duplicate pair {:?}/{:?}",
            meta.ingr1,
            meta.ingr2
        );
    }
}

#[test]
fn ingredients_partitioned_and_renamed() {
    let mut w = world();
    let settings = w.fx.settings.clone();
    let (ctx, _) = Distributor::new(&settings).build(&mut w.fx.host).unwrap();

    assert_eq!(ctx.pools.common.len(), 4);
    assert_eq!(ctx.pools.uncommon.len(), 2);
    assert_eq!(ctx.pools.rare.len(), 2);
    assert_eq!(ctx.pools.rarity_of(w.uncommon[1]), Some(Rarity::Uncommon));
    assert_eq!(ctx.pools.rarity_of(w.rare[0]), Some(Rarity::Rare));

    assert_eq!(w.fx.host.ingredient_name(w.common[1]), Some("Wheat (Common)"));
    assert_eq!(
        w.fx.host.ingredient_name(w.uncommon[1]),
        Some("Mudcrab Chitin (Uncommon)")
    );
    assert_eq!(w.fx.host.ingredient_name(w.rare[0]), Some("Daedra Heart (Rare)"));
}

#[test]
fn loading_twice_does_not_double_suffix() {
    let mut w = world();
    let settings = w.fx.settings.clone();
    Distributor::new(&settings).build(&mut w.fx.host).unwrap();
    Distributor::new(&settings).build(&mut w.fx.host).unwrap();
    assert_eq!(w.fx.host.ingredient_name(w.common[0]), Some("Blue Mountain Flower (Common)"));
}

#[test]
fn rename_disabled_keeps_names() {
    let mut w = world();
    let mut settings = w.fx.settings.clone();
    settings.ingredients.rename = false;
    Distributor::new(&settings).build(&mut w.fx.host).unwrap();
    assert_eq!(w.fx.host.ingredient_name(w.common[1]), Some("Wheat"));
}

#[test]
fn alchemy_benches_become_create_object() {
    let mut w = world();
    let bench = w.fx.bench("Alchemy Lab");
    let forge = w.fx.host.add_furniture("Forge");
    let settings = w.fx.settings.clone();
    let (_, summary) = Distributor::new(&settings).build(&mut w.fx.host).unwrap();

    assert_eq!(summary.benches, 1);
    assert_eq!(w.fx.host.bench_type(bench), Some(BenchType::CreateObject));
    assert_eq!(w.fx.host.bench_type(forge), Some(BenchType::Alchemy));
}

#[test]
fn missing_rule_level_is_skipped() {
    let mut fx = Fixture::new();
    let effect = fx.effect("Damage Health");
    fx.ingredient("Deathbell", Some(Rarity::Common), &[effect]);
    fx.ingredient("Nightshade", Some(Rarity::Common), &[effect]);
    fx.ingredient("River Betty", Some(Rarity::Uncommon), &[effect]);
    // Only level 2 exists: common+common (L1) must produce nothing.
    fx.family("Poison", effect, &[2], true);
    let settings = fx.settings.clone();
    let (ctx, _) = Distributor::new(&settings).build(&mut fx.host).unwrap();

    assert_eq!(ctx.recipes.len(), 2);
    assert!(
        ctx.recipes
            .iter()
            .all(|(_, m)| m.potion_min_level == PotionLevel::Two)
    );
}

#[test]
fn ineligible_potions_are_excluded() {
    let mut fx = Fixture::new();
    let heal = fx.effect("Restore Health");
    let stamina = fx.effect("Restore Stamina");
    fx.ingredient("Wheat", Some(Rarity::Common), &[heal, stamina]);
    fx.ingredient("Imp Stool", Some(Rarity::Common), &[heal, stamina]);

    // Multi-effect, craftable, leveled.
    let multi = fx.host.add_alchemy_item("Mixed", &[heal, stamina], false);
    fx.host.tag(multi, fx.keywords.craftable);
    fx.host.tag(multi, fx.keywords.levels[0]);
    // Not craftable.
    let store = fx.host.add_alchemy_item("Store Potion", &[stamina], false);
    fx.host.tag(store, fx.keywords.levels[0]);
    // Craftable but no level.
    let unleveled = fx.host.add_alchemy_item("Unleveled", &[stamina], false);
    fx.host.tag(unleveled, fx.keywords.craftable);

    let settings = fx.settings.clone();
    let (ctx, _) = Distributor::new(&settings).build(&mut fx.host).unwrap();
    assert!(ctx.potions.is_empty());
    assert!(ctx.recipes.is_empty());
}

#[test]
fn duplicate_variant_keeps_first() {
    let mut fx = Fixture::new();
    let effect = fx.effect("Cure Disease");
    let first = fx.potion("Cure Disease A", effect, PotionLevel::One, false);
    fx.potion("Cure Disease B", effect, PotionLevel::One, false);
    let settings = fx.settings.clone();
    let (ctx, _) = Distributor::new(&settings).build(&mut fx.host).unwrap();
    assert_eq!(ctx.potions.family(effect).unwrap().get(PotionLevel::One), Some(first));
}

#[test]
fn dangling_ingredient_is_skipped() {
    let mut w = world();
    w.fx.host.add_dangling_ingredient();
    let settings = w.fx.settings.clone();
    let (_, summary) = Distributor::new(&settings).build(&mut w.fx.host).unwrap();
    assert_eq!(summary.ingredients, 8);
}

#[test]
fn host_allocation_failure_skips_recipe() {
    let mut w = world();
    w.fx.host.limit_recipes(5);
    let settings = w.fx.settings.clone();
    let (ctx, _) = Distributor::new(&settings).build(&mut w.fx.host).unwrap();
    assert_eq!(ctx.recipes.len(), 5);
    assert_eq!(w.fx.host.recipe_count(), 5);
}

// ===========================================================================
// Optional and mandatory perks
// ===========================================================================

#[test]
fn optional_perks_may_be_absent() {
    let mut w = world();
    let mut settings = w.fx.settings.clone();
    settings.perks.potion_quality = String::new();
    settings.perks.double_items = "Missing.esp|123".to_string();
    settings.perks.all_quality = "garbage".to_string();
    let (ctx, _) = Distributor::new(&settings).build(&mut w.fx.host).unwrap();

    assert_eq!(ctx.perks.quality.potion_quality, None);
    assert_eq!(ctx.perks.quality.double_items, None);
    assert_eq!(ctx.perks.quality.all_quality, None);
    assert_eq!(ctx.perks.quality.poison_quality, Some(w.fx.perks.poison_quality));
    assert_eq!(ctx.recipes.len(), 21);
}

#[test]
fn missing_level3_perk_aborts_everything() {
    let mut w = world();
    let bench = w.fx.bench("Alchemy Lab");
    let mut settings = w.fx.settings.clone();
    settings.perks.level3 = "AlchemyReworked.esp|DEAD".to_string();

    let mut events = FurnitureEventSource::new();
    let result = Distributor::new(&settings).initialize(&mut w.fx.host, &mut events);

    assert!(matches!(
        result,
        Err(InitError::MissingLevelPerk { level: 3, .. })
    ));
    assert_eq!(w.fx.host.recipe_count(), 0);
    assert_eq!(events.sink_count(), 0);
    assert_eq!(w.fx.host.bench_type(bench), Some(BenchType::Alchemy));
    assert_eq!(w.fx.host.ingredient_name(w.common[1]), Some("Wheat"));

    // Events go nowhere.
    events.dispatch(&FurnitureEvent::enter(PLAYER, bench), &mut w.fx.host);
    assert!(w.fx.host.visible_recipes().is_empty());
}

#[test]
fn malformed_level_perk_is_fatal() {
    let mut w = world();
    let mut settings = w.fx.settings.clone();
    settings.perks.level5 = "no separator".to_string();
    let result = Distributor::new(&settings).build(&mut w.fx.host);
    assert!(matches!(
        result,
        Err(InitError::MissingLevelPerk { level: 5, .. })
    ));
}

#[test]
fn missing_keyword_is_fatal() {
    let mut w = world();
    let mut settings = w.fx.settings.clone();
    settings.keywords.rare = "AlchemyReworked.esp|999".to_string();
    let mut events = FurnitureEventSource::new();
    let result = Distributor::new(&settings).initialize(&mut w.fx.host, &mut events);

    match result {
        Err(InitError::MissingKeyword { name, reference }) => {
            assert_eq!(name, "rare");
            assert_eq!(reference, "AlchemyReworked.esp|999");
        }
        other => panic!("expected MissingKeyword, got: {other:?}"),
    }
    assert_eq!(w.fx.host.recipe_count(), 0);
    assert_eq!(events.sink_count(), 0);
}

#[test]
fn initialize_registers_one_sink() {
    let mut w = world();
    let settings = w.fx.settings.clone();
    let mut events = FurnitureEventSource::new();
    let summary = Distributor::new(&settings)
        .initialize(&mut w.fx.host, &mut events)
        .unwrap();
    assert_eq!(summary.recipes, 21);
    assert_eq!(events.sink_count(), 1);
}

#[test]
fn init_error_messages() {
    let err = InitError::MissingLevelPerk {
        level: 4,
        reference: "X.esp|1".to_string(),
    };
    assert_eq!(err.to_string(), "unable to load level 4 perk from 'X.esp|1'");
}
