//! Shared fixtures for unit, integration, and property tests.
//!
//! Behind the `test-utils` feature (and always on for this crate's own
//! tests) so integration tests and downstream crates can build the same
//! small content catalog without duplicating it.

use crate::amount::{Amount, parse_amount};
use crate::catalog::{
    AchievementDef, AchievementEffect, Archetype, Catalog, CatalogBuilder, GeneratorDef, HeroDef,
    PrestigeEffect, PrestigeTuning, PrestigeUpgradeDef, UpgradeDef, UpgradeEffect,
};
use crate::state::{GameState, PartySlot};

/// Parse a decimal literal, panicking on typos. Test-only convenience.
pub fn amt(s: &str) -> Amount {
    parse_amount(s).unwrap()
}

/// A small but complete catalog touching every content table.
pub fn sample_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    b.register_generator(
        "vat",
        GeneratorDef {
            name: "Curd Vat".into(),
            base_output: amt("1"),
            base_cost: amt("10"),
            cost_growth: amt("1.15"),
        },
    );
    b.register_generator(
        "press",
        GeneratorDef {
            name: "Cheese Press".into(),
            base_output: amt("8"),
            base_cost: amt("100"),
            cost_growth: amt("1.15"),
        },
    );
    b.register_generator(
        "cellar",
        GeneratorDef {
            name: "Aging Cellar".into(),
            base_output: amt("47"),
            base_cost: amt("1100"),
            cost_growth: amt("1.2"),
        },
    );

    b.register_upgrade(
        "sharper-curd-knife",
        UpgradeDef {
            name: "Sharper Curd Knife".into(),
            cost: amt("100"),
            effect: UpgradeEffect::Generator { target: "vat".into(), multiplier: amt("2") },
        },
    );
    b.register_upgrade(
        "copper-vat",
        UpgradeDef {
            name: "Copper Vat".into(),
            cost: amt("500"),
            effect: UpgradeEffect::Global { multiplier: amt("1.5") },
        },
    );
    b.register_upgrade(
        "calcium-brine",
        UpgradeDef {
            name: "Calcium Brine".into(),
            cost: amt("250"),
            effect: UpgradeEffect::Click { multiplier: amt("2") },
        },
    );

    b.register_achievement(
        "first-curd",
        AchievementDef {
            name: "First Curd".into(),
            effect: Some(AchievementEffect::Global { multiplier: amt("1.5") }),
            grant: None,
        },
    );
    b.register_achievement(
        "thousand-clicks",
        AchievementDef {
            name: "A Thousand Clicks".into(),
            effect: Some(AchievementEffect::Click { multiplier: amt("1.25") }),
            grant: Some(amt("50")),
        },
    );
    b.register_achievement(
        "plain-trophy",
        AchievementDef { name: "Plain Trophy".into(), effect: None, grant: None },
    );

    b.register_hero(
        "brie",
        HeroDef {
            name: "Brie".into(),
            archetype: Archetype::Cheesemaker,
            recruit_cost: amt("1000"),
            base_cps_bonus: amt("0.1"),
            per_level_bonus: amt("0.05"),
        },
    );
    b.register_hero(
        "gouda",
        HeroDef {
            name: "Gouda".into(),
            archetype: Archetype::Guardian,
            recruit_cost: amt("1500"),
            base_cps_bonus: amt("0.15"),
            per_level_bonus: amt("0.05"),
        },
    );
    b.register_hero(
        "roquefort",
        HeroDef {
            name: "Roquefort".into(),
            archetype: Archetype::Alchemist,
            recruit_cost: amt("2500"),
            base_cps_bonus: amt("0.2"),
            per_level_bonus: amt("0.1"),
        },
    );

    b.register_formation(
        [Some(Archetype::Cheesemaker), Some(Archetype::Guardian), None, None],
        amt("1.25"),
    );
    b.register_formation(
        [
            Some(Archetype::Cheesemaker),
            Some(Archetype::Guardian),
            Some(Archetype::Alchemist),
            None,
        ],
        amt("1.5"),
    );

    b.register_prestige_upgrade(
        "oak-shelving",
        PrestigeUpgradeDef {
            name: "Oak Shelving".into(),
            cost: amt("100"),
            effect: PrestigeEffect::Production { multiplier: amt("2") },
        },
    );
    b.register_prestige_upgrade(
        "humid-cave",
        PrestigeUpgradeDef {
            name: "Humid Cave".into(),
            cost: amt("250"),
            effect: PrestigeEffect::Click { multiplier: amt("2") },
        },
    );

    b.prestige_tuning(PrestigeTuning::default());
    b.finalize()
}

/// A mid-game state exercising every persisted substructure: generators,
/// upgrades, achievements, recruited heroes with one assigned, equipment,
/// zone progress, and crafting data.
pub fn playing_state(catalog: &Catalog) -> GameState {
    let mut state = GameState::new(1_700_000_000_000);
    state.curds = amt("100000");
    state.total_curds_earned = amt("100000");
    state.last_milestone = 5;
    state.eh_count = 5;
    state.total_clicks = 321;
    state.whey = amt("12.5");

    state.purchase_generator("vat", catalog).unwrap();
    state.purchase_generator("vat", catalog).unwrap();
    state.purchase_generator("press", catalog).unwrap();
    state.purchase_upgrade("sharper-curd-knife", catalog).unwrap();
    state.purchase_upgrade("calcium-brine", catalog).unwrap();
    state.unlock_achievement("first-curd", catalog).unwrap();
    state.recruit_hero("brie", catalog).unwrap();
    state.recruit_hero("gouda", catalog).unwrap();
    state.assign_party_slot(PartySlot::FrontLeft, "brie", catalog).unwrap();

    state.equipment_inventory.push("silver-ladle".to_string());
    state.zone_progress.current_zone = 3;
    state.zone_progress.highest_cleared = 2;
    state.zone_progress.encounters_won = 14;
    state.crafting.known_recipes.insert("smoked-gouda".to_string());
    state.crafting.crafted.insert("smoked-gouda".to_string(), 2);
    state.active_events.push("double-curds-weekend".to_string());

    state.recompute_rates(catalog).unwrap();
    state
}
