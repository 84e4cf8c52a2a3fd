//! Raw file-format structs for the content catalog.
//!
//! These mirror what content authors write. Decimal quantities are
//! strings in the files and are parsed into exact [`Amount`]s by the
//! loader; effect kinds are tagged enums so a typo'd kind fails parsing
//! instead of silently becoming a different effect.
//!
//! [`Amount`]: creamery_core::amount::Amount

use creamery_core::catalog::Archetype;
use serde::Deserialize;

/// One entry in `generators.{ron,toml,json}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorEntry {
    pub key: String,
    pub name: String,
    pub base_output: String,
    pub base_cost: String,
    pub cost_growth: String,
}

/// Effect payload for an upgrade entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpgradeEffectEntry {
    Generator { target: String, multiplier: String },
    Global { multiplier: String },
    Click { multiplier: String },
}

/// One entry in `upgrades.{ron,toml,json}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeEntry {
    pub id: String,
    pub name: String,
    pub cost: String,
    pub effect: UpgradeEffectEntry,
}

/// Effect payload for an achievement entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementEffectEntry {
    Global { multiplier: String },
    Click { multiplier: String },
}

/// One entry in `achievements.{ron,toml,json}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AchievementEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub effect: Option<AchievementEffectEntry>,
    /// One-time curd grant at unlock.
    #[serde(default)]
    pub grant: Option<String>,
}

/// One entry in `heroes.{ron,toml,json}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HeroEntry {
    pub id: String,
    pub name: String,
    pub archetype: Archetype,
    pub recruit_cost: String,
    pub base_cps_bonus: String,
    pub per_level_bonus: String,
}

/// One entry in `formations.{ron,toml,json}`: the four slots in order
/// front-left, front-right, back-left, back-right.
#[derive(Debug, Clone, Deserialize)]
pub struct FormationEntry {
    pub slots: [Option<Archetype>; 4],
    pub bonus: String,
}

/// Effect payload for a prestige upgrade entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrestigeEffectEntry {
    Production { multiplier: String },
    Click { multiplier: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrestigeUpgradeEntry {
    pub id: String,
    pub name: String,
    pub cost: String,
    pub effect: PrestigeEffectEntry,
}

/// `prestige.{ron,toml,json}`: tuning plus the prestige upgrade list.
#[derive(Debug, Clone, Deserialize)]
pub struct PrestigeFile {
    pub rennet_threshold: String,
    pub production_bonus_per_rennet: String,
    pub click_bonus_per_rennet: String,
    #[serde(default)]
    pub upgrades: Vec<PrestigeUpgradeEntry>,
}
