//! End-to-end scenarios across the aggregator, engine, offline credit,
//! and save codec.

use creamery_core::amount::{Amount, parse_amount};
use creamery_core::catalog::{
    AchievementDef, AchievementEffect, CatalogBuilder, GeneratorDef, UpgradeDef, UpgradeEffect,
};
use creamery_core::event::{EventBus, GameEvent};
use creamery_core::offline::{DEFAULT_CAP_SECS, offline_progress};
use creamery_core::save;
use creamery_core::state::GameState;
use creamery_core::test_utils::{amt, playing_state, sample_catalog};

/// 10 generators of base output 1/s, one upgrade doubling them, one
/// achievement contributing a 1.5x global: 10 * 1 * 2 * 1.5 = 30/s.
#[test]
fn worked_production_example() {
    let mut b = CatalogBuilder::new();
    b.register_generator(
        "churn",
        GeneratorDef {
            name: "Churn".into(),
            base_output: amt("1"),
            base_cost: amt("1"),
            cost_growth: amt("1"),
        },
    );
    b.register_upgrade(
        "fast-churn",
        UpgradeDef {
            name: "Fast Churn".into(),
            cost: amt("1"),
            effect: UpgradeEffect::Generator { target: "churn".into(), multiplier: amt("2") },
        },
    );
    b.register_achievement(
        "churner",
        AchievementDef {
            name: "Churner".into(),
            effect: Some(AchievementEffect::Global { multiplier: amt("1.5") }),
            grant: None,
        },
    );
    let catalog = b.finalize();

    let mut state = GameState::new(0);
    state.curds = amt("100");
    for _ in 0..10 {
        state.purchase_generator("churn", &catalog).unwrap();
    }
    state.purchase_upgrade("fast-churn", &catalog).unwrap();
    state.unlock_achievement("churner", &catalog).unwrap();

    assert_eq!(state.rates.curd_per_second, amt("30"));
}

#[test]
fn offline_credit_flows_into_state() {
    let catalog = sample_catalog();
    let mut state = playing_state(&catalog);
    let rate = state.rates.curd_per_second.clone();
    let lifetime_before = state.total_curds_earned.clone();

    // 20 hours away, capped to 8.
    let now = state.last_saved + 20 * 3_600_000;
    let progress = offline_progress(&rate, state.last_saved, now, DEFAULT_CAP_SECS);
    assert_eq!(progress.seconds_away, 28_800);
    let expected: Amount = &rate * Amount::from(28_800u64);
    assert_eq!(progress.earned, expected);

    let events = state.apply_offline(&progress);
    assert!(events.iter().any(|e| matches!(e, GameEvent::OfflineApplied { .. })));
    assert_eq!(state.total_curds_earned, &lifetime_before + &expected);

    // A 30-second absence credits nothing, whatever the rate.
    let progress = offline_progress(&rate, now, now + 30_000, DEFAULT_CAP_SECS);
    assert_eq!(progress.earned, parse_amount("0").unwrap());
    assert_eq!(progress.seconds_away, 0);
    assert!(state.apply_offline(&progress).is_empty());
}

#[test]
fn lifetime_total_is_monotone_across_a_session() {
    let catalog = sample_catalog();
    let mut state = GameState::new(0);
    state.recompute_rates(&catalog).unwrap();

    let mut previous = state.total_curds_earned.clone();
    let mut check = |state: &GameState, previous: &mut Amount| {
        assert!(state.total_curds_earned >= *previous);
        *previous = state.total_curds_earned.clone();
    };

    for _ in 0..30 {
        state.click();
        check(&state, &mut previous);
    }
    state.curds = amt("10000");
    state.purchase_generator("vat", &catalog).unwrap();
    check(&state, &mut previous);
    state.accrue(120);
    check(&state, &mut previous);
    state.purchase_upgrade("copper-vat", &catalog).unwrap();
    check(&state, &mut previous);
    state.accrue(600);
    check(&state, &mut previous);
    state.unlock_achievement("thousand-clicks", &catalog).unwrap();
    check(&state, &mut previous);
}

#[test]
fn click_value_reflects_every_click_source() {
    let catalog = sample_catalog();
    let mut state = GameState::new(0);
    state.recompute_rates(&catalog).unwrap();
    assert_eq!(state.rates.curd_per_click, amt("1"));

    state.curds = amt("1000");
    state.purchase_upgrade("calcium-brine", &catalog).unwrap(); // click x2
    assert_eq!(state.rates.curd_per_click, amt("2"));

    state.unlock_achievement("thousand-clicks", &catalog).unwrap(); // click x1.25
    assert_eq!(state.rates.curd_per_click, amt("2.5"));

    let before = state.curds.clone();
    state.click();
    assert_eq!(state.curds, &before + &amt("2.5"));
}

#[test]
fn events_reach_bus_subscribers() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let catalog = sample_catalog();
    let mut state = GameState::new(0);
    state.curds = amt("1000");
    state.recompute_rates(&catalog).unwrap();

    let seen: Rc<RefCell<Vec<GameEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut bus = EventBus::new();
    bus.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    let events = state.purchase_generator("vat", &catalog).unwrap();
    bus.publish(&events);
    let events = state.unlock_achievement("first-curd", &catalog).unwrap();
    bus.publish(&events);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(matches!(seen[0], GameEvent::GeneratorPurchased { .. }));
    assert!(matches!(seen[1], GameEvent::AchievementUnlocked { .. }));
}

#[test]
fn save_load_age_save_load() {
    let catalog = sample_catalog();
    let mut state = playing_state(&catalog);
    state.curds = amt("5000000");
    state.total_curds_earned = amt("5000000");

    let restored = save::deserialize(&save::serialize(&state).unwrap(), &catalog).unwrap();
    let mut state = restored;
    state.age(&catalog).unwrap();
    assert_eq!(state.prestige.rennet, amt("5"));
    assert!(state.generators.is_empty());

    let restored = save::deserialize(&save::serialize(&state).unwrap(), &catalog).unwrap();
    assert_eq!(restored, state);
    // Prestige multiplier survives the round trip inside the rates.
    assert!(restored.rates.curd_per_click > amt("1"));
}
