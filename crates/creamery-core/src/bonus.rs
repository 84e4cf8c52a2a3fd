//! Bonus aggregation.
//!
//! Pure, deterministic reductions from owned-content sets to scalar
//! multipliers. Every function here obeys the same two rules:
//!
//! - **Identity on absence.** No applicable bonus means exactly 1, never 0.
//! - **Unknown ids are no-ops.** An id the catalog does not know contributes
//!   nothing and never errors, so content can be added or removed between
//!   saves without breaking old states.
//!
//! Because amounts are exact decimals, the product of any set of
//! multipliers is independent of the order they are applied in.

use crate::amount::{Amount, one, zero};
use crate::catalog::{AchievementEffect, Catalog, FormationPattern, PrestigeEffect, UpgradeEffect};
use crate::state::{HeroState, Party, PrestigeState};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Per-generator output multipliers from owned upgrades.
///
/// Every generator the catalog knows starts at 1; each owned upgrade that
/// targets a generator multiplies that entry.
pub fn generator_multipliers(
    owned_upgrades: &BTreeSet<String>,
    catalog: &Catalog,
) -> HashMap<String, Amount> {
    let mut mults: HashMap<String, Amount> =
        catalog.generators().map(|(key, _)| (key.clone(), one())).collect();
    for id in owned_upgrades {
        let Some(def) = catalog.upgrade(id) else { continue };
        if let UpgradeEffect::Generator { target, multiplier } = &def.effect {
            let entry = mults.entry(target.clone()).or_insert_with(one);
            *entry = &*entry * multiplier;
        }
    }
    mults
}

/// Product of all owned global-production upgrade effects.
pub fn global_multiplier(owned_upgrades: &BTreeSet<String>, catalog: &Catalog) -> Amount {
    let mut total = one();
    for id in owned_upgrades {
        let Some(def) = catalog.upgrade(id) else { continue };
        if let UpgradeEffect::Global { multiplier } = &def.effect {
            total = &total * multiplier;
        }
    }
    total
}

/// Product of all owned click upgrade effects.
pub fn click_multiplier(owned_upgrades: &BTreeSet<String>, catalog: &Catalog) -> Amount {
    let mut total = one();
    for id in owned_upgrades {
        let Some(def) = catalog.upgrade(id) else { continue };
        if let UpgradeEffect::Click { multiplier } = &def.effect {
            total = &total * multiplier;
        }
    }
    total
}

/// Product of all unlocked achievements' global effects.
pub fn achievement_global_multiplier(
    unlocked: &BTreeSet<String>,
    catalog: &Catalog,
) -> Amount {
    let mut total = one();
    for id in unlocked {
        let Some(def) = catalog.achievement(id) else { continue };
        if let Some(AchievementEffect::Global { multiplier }) = &def.effect {
            total = &total * multiplier;
        }
    }
    total
}

/// Product of all unlocked achievements' click effects.
pub fn achievement_click_multiplier(
    unlocked: &BTreeSet<String>,
    catalog: &Catalog,
) -> Amount {
    let mut total = one();
    for id in unlocked {
        let Some(def) = catalog.achievement(id) else { continue };
        if let Some(AchievementEffect::Click { multiplier }) = &def.effect {
            total = &total * multiplier;
        }
    }
    total
}

/// Production multiplier from party-assigned heroes.
///
/// Each hero in a party slot adds `base + per_level * (level - 1)` on top
/// of the identity; recruited-but-benched heroes contribute nothing (they
/// never multiply production down).
pub fn hero_cps_bonus(
    heroes: &BTreeMap<String, HeroState>,
    party: &Party,
    catalog: &Catalog,
) -> Amount {
    let mut total = zero();
    for id in party.assigned() {
        let Some(hero) = heroes.get(id) else { continue };
        let Some(def) = catalog.hero(id) else { continue };
        let levels_past_first = Amount::from(hero.level.saturating_sub(1));
        let contribution = &def.base_cps_bonus + &def.per_level_bonus * levels_past_first;
        total = &total + &contribution;
    }
    one() + total
}

/// Structural bonus from the party arrangement.
///
/// The pattern is the slot-ordered list of assigned archetypes; the bonus
/// is a strict catalog lookup on that pattern. A hero id with no catalog
/// entry leaves its slot empty for pattern purposes; an arrangement with
/// no table entry is the identity.
pub fn formation_bonus(party: &Party, catalog: &Catalog) -> Amount {
    let pattern: FormationPattern = [
        party.front_left.as_deref(),
        party.front_right.as_deref(),
        party.back_left.as_deref(),
        party.back_right.as_deref(),
    ]
    .map(|slot| slot.and_then(|id| catalog.hero(id)).map(|def| def.archetype));
    catalog.formation_bonus(&pattern).cloned().unwrap_or_else(one)
}

/// Persistent production multiplier from prestige progress.
///
/// Scales with total rennet ever earned (which never decreases, so the
/// multiplier is monotone) times the product of owned prestige upgrades'
/// production effects. Clamped to never fall below 1.
pub fn prestige_production_multiplier(prestige: &PrestigeState, catalog: &Catalog) -> Amount {
    let mut total =
        one() + &prestige.total_rennet_earned * &catalog.prestige().production_bonus_per_rennet;
    for id in &prestige.owned_upgrades {
        let Some(def) = catalog.prestige_upgrade(id) else { continue };
        if let PrestigeEffect::Production { multiplier } = &def.effect {
            total = &total * multiplier;
        }
    }
    if total < one() { one() } else { total }
}

/// Persistent click multiplier from prestige progress.
pub fn prestige_click_multiplier(prestige: &PrestigeState, catalog: &Catalog) -> Amount {
    let mut total =
        one() + &prestige.total_rennet_earned * &catalog.prestige().click_bonus_per_rennet;
    for id in &prestige.owned_upgrades {
        let Some(def) = catalog.prestige_upgrade(id) else { continue };
        if let PrestigeEffect::Click { multiplier } = &def.effect {
            total = &total * multiplier;
        }
    }
    if total < one() { one() } else { total }
}
