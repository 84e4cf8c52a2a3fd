//! Immutable content catalog.
//!
//! The engine never owns gameplay content. Generator outputs, upgrade and
//! achievement effects, hero stats, formation bonuses, and prestige tuning
//! all arrive as a read-only [`Catalog`] supplied at call time, built once
//! through a [`CatalogBuilder`] (register everything, then finalize).
//!
//! Every lookup returns `Option`: an id absent from the catalog is never
//! an error, it simply contributes nothing. This keeps old saves loadable
//! after content is removed and new saves loadable on old builds.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A purchasable passive-income unit.
#[derive(Debug, Clone)]
pub struct GeneratorDef {
    pub name: String,
    /// Curds per second produced by a single unit before multipliers.
    pub base_output: Amount,
    /// Cost of the first unit.
    pub base_cost: Amount,
    /// Cost multiplier applied once per unit already owned.
    pub cost_growth: Amount,
}

/// What an upgrade does once owned.
#[derive(Debug, Clone, PartialEq)]
pub enum UpgradeEffect {
    /// Multiplies a single generator's output.
    Generator { target: String, multiplier: Amount },
    /// Multiplies all production.
    Global { multiplier: Amount },
    /// Multiplies the value of a click.
    Click { multiplier: Amount },
}

#[derive(Debug, Clone)]
pub struct UpgradeDef {
    pub name: String,
    pub cost: Amount,
    pub effect: UpgradeEffect,
}

/// What an achievement contributes while unlocked.
#[derive(Debug, Clone, PartialEq)]
pub enum AchievementEffect {
    Global { multiplier: Amount },
    Click { multiplier: Amount },
}

#[derive(Debug, Clone)]
pub struct AchievementDef {
    pub name: String,
    /// Passive effect, if any. Some achievements are trophies only.
    pub effect: Option<AchievementEffect>,
    /// One-time curd grant paid out at unlock.
    pub grant: Option<Amount>,
}

/// Hero combat/production archetype. Formation bonuses key off these,
/// never off individual hero ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Cheesemaker,
    Guardian,
    Alchemist,
    Scout,
}

#[derive(Debug, Clone)]
pub struct HeroDef {
    pub name: String,
    pub archetype: Archetype,
    pub recruit_cost: Amount,
    /// Additive cps bonus contributed at level 1 while in the party.
    pub base_cps_bonus: Amount,
    /// Additional additive bonus per level past the first.
    pub per_level_bonus: Amount,
}

/// The four party slots in canonical order: front-left, front-right,
/// back-left, back-right. `None` means the slot is empty.
pub type FormationPattern = [Option<Archetype>; 4];

/// What a prestige upgrade does once owned.
#[derive(Debug, Clone, PartialEq)]
pub enum PrestigeEffect {
    Production { multiplier: Amount },
    Click { multiplier: Amount },
}

#[derive(Debug, Clone)]
pub struct PrestigeUpgradeDef {
    pub name: String,
    /// Rennet cost.
    pub cost: Amount,
    pub effect: PrestigeEffect,
}

/// Prestige ("aging") tuning knobs.
#[derive(Debug, Clone)]
pub struct PrestigeTuning {
    /// Lifetime curds required per rennet point.
    pub rennet_threshold: Amount,
    /// Additive production bonus per rennet point ever earned.
    pub production_bonus_per_rennet: Amount,
    /// Additive click bonus per rennet point ever earned.
    pub click_bonus_per_rennet: Amount,
}

impl Default for PrestigeTuning {
    fn default() -> Self {
        Self {
            rennet_threshold: Amount::from(1_000_000u32),
            production_bonus_per_rennet: Amount::from(5u32) / Amount::from(100u32),
            click_bonus_per_rennet: Amount::from(2u32) / Amount::from(100u32),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Frozen content tables. Built once via [`CatalogBuilder`], then only read.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    generators: HashMap<String, GeneratorDef>,
    upgrades: HashMap<String, UpgradeDef>,
    achievements: HashMap<String, AchievementDef>,
    heroes: HashMap<String, HeroDef>,
    formations: HashMap<FormationPattern, Amount>,
    prestige_upgrades: HashMap<String, PrestigeUpgradeDef>,
    prestige: PrestigeTuning,
}

impl Catalog {
    pub fn generator(&self, key: &str) -> Option<&GeneratorDef> {
        self.generators.get(key)
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.get(id)
    }

    pub fn achievement(&self, id: &str) -> Option<&AchievementDef> {
        self.achievements.get(id)
    }

    pub fn hero(&self, id: &str) -> Option<&HeroDef> {
        self.heroes.get(id)
    }

    pub fn formation_bonus(&self, pattern: &FormationPattern) -> Option<&Amount> {
        self.formations.get(pattern)
    }

    pub fn prestige_upgrade(&self, id: &str) -> Option<&PrestigeUpgradeDef> {
        self.prestige_upgrades.get(id)
    }

    pub fn prestige(&self) -> &PrestigeTuning {
        &self.prestige
    }

    pub fn generators(&self) -> impl Iterator<Item = (&String, &GeneratorDef)> {
        self.generators.iter()
    }

    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }
}

/// Builder for a [`Catalog`]. Register everything, then [`finalize`].
///
/// Registration is last-write-wins on duplicate keys; strict duplicate
/// detection belongs to the data-loading layer, which sees file context.
///
/// [`finalize`]: CatalogBuilder::finalize
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_generator(&mut self, key: &str, def: GeneratorDef) -> &mut Self {
        self.catalog.generators.insert(key.to_string(), def);
        self
    }

    pub fn register_upgrade(&mut self, id: &str, def: UpgradeDef) -> &mut Self {
        self.catalog.upgrades.insert(id.to_string(), def);
        self
    }

    pub fn register_achievement(&mut self, id: &str, def: AchievementDef) -> &mut Self {
        self.catalog.achievements.insert(id.to_string(), def);
        self
    }

    pub fn register_hero(&mut self, id: &str, def: HeroDef) -> &mut Self {
        self.catalog.heroes.insert(id.to_string(), def);
        self
    }

    pub fn register_formation(&mut self, pattern: FormationPattern, bonus: Amount) -> &mut Self {
        self.catalog.formations.insert(pattern, bonus);
        self
    }

    pub fn register_prestige_upgrade(&mut self, id: &str, def: PrestigeUpgradeDef) -> &mut Self {
        self.catalog.prestige_upgrades.insert(id.to_string(), def);
        self
    }

    pub fn prestige_tuning(&mut self, tuning: PrestigeTuning) -> &mut Self {
        self.catalog.prestige = tuning;
        self
    }

    pub fn finalize(self) -> Catalog {
        self.catalog
    }
}
