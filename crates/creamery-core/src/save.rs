//! Versioned save codec.
//!
//! Serializes a [`GameState`] to a plain JSON record tagged with the save
//! format version, and restores records of any shipped version back into
//! the current in-memory shape. Decimal fields cross the text boundary as
//! exact base-10 strings, never as native floats.
//!
//! Two hard rules, both enforced here:
//!
//! - **Derived values are never trusted.** The record carries no rates;
//!   after restoring raw fields the loader re-derives `curd_per_second`
//!   and `curd_per_click` through the production engine, so saves survive
//!   balance changes made after they were written.
//! - **Transient state is never persisted.** An in-progress encounter is
//!   dropped on save and restored to the idle default on load.
//!
//! Malformed input fails loudly with a [`LoadError`]; falling back to a
//! fresh game is the caller's policy, not the codec's.

use crate::catalog::Catalog;
use crate::migration::{MigrationError, migrations};
use crate::amount::{Amount, Millis, zero};
use crate::production::{self, InvariantViolation};
use crate::state::{
    CraftingState, GameState, HeroState, Party, PartySlot, PrestigeState, ZoneProgress,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Current save format version: the highest migration step implemented.
pub const SAVE_VERSION: u32 = 5;

/// Errors that can occur while encoding a save.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur while restoring a save. An old version tag is
/// *not* one of these; that path migrates instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("save record is not valid JSON: {0}")]
    Parse(String),
    #[error("save record missing mandatory field '{0}'")]
    MissingField(&'static str),
    #[error("save from future version {0} (this build supports up to {SAVE_VERSION})")]
    FutureVersion(u64),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("save state decode failed: {0}")]
    Decode(String),
    #[error("save field '{0}' must not be negative")]
    NegativeAmount(&'static str),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

// ---------------------------------------------------------------------------
// Record shape
// ---------------------------------------------------------------------------

/// The persisted state payload at the current version. Field names match
/// the wire format; decimal-valued fields serialize as exact strings via
/// the [`Amount`] serde impl. Owned-id collections are plain lists on the
/// wire and deduplicated back into sets on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub curds: Amount,
    pub whey: Amount,
    pub total_curds_earned: Amount,
    pub total_clicks: u64,
    pub generators: BTreeMap<String, u64>,
    pub upgrades: Vec<String>,
    pub achievements: Vec<String>,
    pub eh_count: u64,
    pub last_milestone: u32,
    pub last_saved: Millis,
    pub game_started: Millis,
    pub heroes: BTreeMap<String, HeroState>,
    pub party: Party,
    pub equipment_inventory: Vec<String>,
    pub zone_progress: ZoneProgress,
    pub prestige: PrestigeState,
    pub crafting: CraftingState,
    pub active_events: Vec<String>,
}

/// The versioned envelope around a [`SavedState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub version: u32,
    pub state: SavedState,
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

fn to_saved(state: &GameState) -> SavedState {
    SavedState {
        curds: state.curds.clone(),
        whey: state.whey.clone(),
        total_curds_earned: state.total_curds_earned.clone(),
        total_clicks: state.total_clicks,
        generators: state.generators.clone(),
        upgrades: state.upgrades.iter().cloned().collect(),
        achievements: state.achievements.iter().cloned().collect(),
        eh_count: state.eh_count,
        last_milestone: state.last_milestone,
        last_saved: state.last_saved,
        game_started: state.game_started,
        heroes: state.heroes.clone(),
        party: state.party.clone(),
        equipment_inventory: state.equipment_inventory.clone(),
        zone_progress: state.zone_progress.clone(),
        prestige: state.prestige.clone(),
        crafting: state.crafting.clone(),
        active_events: state.active_events.clone(),
    }
}

/// Encode a state as a current-version JSON record. The transient
/// encounter and the derived rates are deliberately absent.
pub fn serialize(state: &GameState) -> Result<String, SaveError> {
    let record = SaveRecord { version: SAVE_VERSION, state: to_saved(state) };
    serde_json::to_string(&record).map_err(|e| SaveError::Encode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Restore a state from a save record of any shipped version.
///
/// Older versions are migrated additively before decoding; a version tag
/// newer than this build is refused. Hand-edited records are held to the
/// structural invariants the engine maintains: owned-id lists are
/// deduplicated, a hero repeated across party slots keeps only its
/// front-most slot, and negative currency fields are refused. Rates are
/// re-derived from the restored bonus sources; the encounter comes back
/// idle.
pub fn deserialize(text: &str, catalog: &Catalog) -> Result<GameState, LoadError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))?;
    let Value::Object(mut root) = value else {
        return Err(LoadError::Parse("root is not an object".to_string()));
    };
    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(LoadError::MissingField("version"))?;
    // Compare before narrowing; a tag past u32::MAX must not wrap into
    // a version we would happily "migrate".
    if version > u64::from(SAVE_VERSION) {
        return Err(LoadError::FutureVersion(version));
    }
    let version = version as u32;
    let state_value = root.remove("state").ok_or(LoadError::MissingField("state"))?;

    let migrated = migrations().migrate(state_value, version, SAVE_VERSION)?;
    let saved: SavedState =
        serde_json::from_value(migrated).map_err(|e| LoadError::Decode(e.to_string()))?;
    restore(saved, catalog)
}

fn restore(saved: SavedState, catalog: &Catalog) -> Result<GameState, LoadError> {
    for (field, value) in [
        ("curds", &saved.curds),
        ("whey", &saved.whey),
        ("totalCurdsEarned", &saved.total_curds_earned),
        ("rennet", &saved.prestige.rennet),
        ("totalRennetEarned", &saved.prestige.total_rennet_earned),
    ] {
        if *value < zero() {
            return Err(LoadError::NegativeAmount(field));
        }
    }

    let upgrades: BTreeSet<String> = saved.upgrades.into_iter().collect();
    let achievements: BTreeSet<String> = saved.achievements.into_iter().collect();

    // A hero id occupies at most one slot; a record that repeats one
    // keeps the front-most occurrence and benches the rest.
    let mut party = saved.party;
    let mut assigned: BTreeSet<String> = BTreeSet::new();
    for slot in PartySlot::ALL {
        if let Some(id) = party.slot(slot).clone() {
            if !assigned.insert(id) {
                *party.slot_mut(slot) = None;
            }
        }
    }

    let mut state = GameState {
        curds: saved.curds,
        whey: saved.whey,
        total_curds_earned: saved.total_curds_earned,
        total_clicks: saved.total_clicks,
        generators: saved.generators,
        upgrades,
        achievements,
        eh_count: saved.eh_count,
        last_milestone: saved.last_milestone,
        heroes: saved.heroes,
        party,
        equipment_inventory: saved.equipment_inventory,
        zone_progress: saved.zone_progress,
        prestige: saved.prestige,
        crafting: saved.crafting,
        active_events: saved.active_events,
        game_started: saved.game_started,
        last_saved: saved.last_saved,
        rates: Default::default(),
        encounter: None,
    };
    state.rates = production::recompute(&state.bonus_sources(), catalog)?;
    Ok(state)
}

// ===========================================================================
// Tests
// ===========================================================================
