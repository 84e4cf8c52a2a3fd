//! Save-format version migration.
//!
//! A registry of migration functions transforms a persisted state record
//! from one format version to the next, so arbitrarily old saves load on
//! the current build. Each step is additive-only: it synthesizes the
//! fields its version introduced, with their documented defaults, and
//! never rewrites fields that already exist in the source record. That
//! makes every step idempotent and independently testable.
//!
//! Version history:
//!
//! - **v1** -- base record: currencies, clicks, generators, upgrades,
//!   achievements, eh/milestone counters, timestamps.
//! - **v2** -- adds `heroes` (empty map) and `party` (four empty slots).
//! - **v3** -- adds `equipmentInventory` (empty list) and `zoneProgress`
//!   (zone 1, nothing cleared).
//! - **v4** -- adds `prestige` (no rennet, nothing owned).
//! - **v5** -- adds `crafting` (nothing known) and `activeEvents` (none).

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Errors that can occur during migration.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("no migration path from version {from} to version {to}")]
    NoMigrationPath { from: u32, to: u32 },
    #[error("migration from version {from} to version {to} failed: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// A function that upgrades a state record from one version to the next.
pub type MigrationFn = fn(Value) -> Result<Value, MigrationError>;

/// Registry of migration functions keyed by source version.
///
/// Each registered function migrates a record from `version N` to
/// `version N+1`; the registry chains these steps across versions.
pub struct MigrationRegistry {
    migrations: BTreeMap<u32, MigrationFn>,
}

impl MigrationRegistry {
    /// Create an empty migration registry.
    pub fn new() -> Self {
        Self { migrations: BTreeMap::new() }
    }

    /// Register a migration function from `from_version` to `from_version + 1`.
    pub fn register(&mut self, from_version: u32, migrate: MigrationFn) {
        self.migrations.insert(from_version, migrate);
    }

    /// Check whether a complete migration path exists from `from` to `to`.
    pub fn can_migrate(&self, from: u32, to: u32) -> bool {
        if from >= to {
            return from == to;
        }
        (from..to).all(|v| self.migrations.contains_key(&v))
    }

    /// Migrate a state record from version `from` to version `to`,
    /// chaining registered steps. Returns the record unchanged if
    /// `from == to`.
    pub fn migrate(&self, record: Value, from: u32, to: u32) -> Result<Value, MigrationError> {
        if from == to {
            return Ok(record);
        }
        if from > to {
            return Err(MigrationError::NoMigrationPath { from, to });
        }

        let mut current = record;
        for version in from..to {
            let migrate_fn = self
                .migrations
                .get(&version)
                .ok_or(MigrationError::NoMigrationPath { from, to })?;
            current = migrate_fn(current)?;
        }
        Ok(current)
    }

    /// Number of registered migration steps.
    pub fn step_count(&self) -> usize {
        self.migrations.len()
    }
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The registry holding every step up to the current save version.
pub fn migrations() -> MigrationRegistry {
    let mut registry = MigrationRegistry::new();
    registry.register(1, v1_to_v2);
    registry.register(2, v2_to_v3);
    registry.register(3, v3_to_v4);
    registry.register(4, v4_to_v5);
    registry
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

fn into_object(
    record: Value,
    from: u32,
    to: u32,
) -> Result<Map<String, Value>, MigrationError> {
    match record {
        Value::Object(map) => Ok(map),
        other => Err(MigrationError::MigrationFailed {
            from,
            to,
            reason: format!("state record is not an object (found {other})"),
        }),
    }
}

fn backfill(map: &mut Map<String, Value>, field: &str, default: Value) {
    map.entry(field.to_string()).or_insert(default);
}

fn v1_to_v2(record: Value) -> Result<Value, MigrationError> {
    let mut map = into_object(record, 1, 2)?;
    backfill(&mut map, "heroes", json!({}));
    backfill(
        &mut map,
        "party",
        json!({ "frontLeft": null, "frontRight": null, "backLeft": null, "backRight": null }),
    );
    Ok(Value::Object(map))
}

fn v2_to_v3(record: Value) -> Result<Value, MigrationError> {
    let mut map = into_object(record, 2, 3)?;
    backfill(&mut map, "equipmentInventory", json!([]));
    backfill(
        &mut map,
        "zoneProgress",
        json!({ "currentZone": 1, "highestCleared": 0, "encountersWon": 0 }),
    );
    Ok(Value::Object(map))
}

fn v3_to_v4(record: Value) -> Result<Value, MigrationError> {
    let mut map = into_object(record, 3, 4)?;
    backfill(
        &mut map,
        "prestige",
        json!({
            "rennet": "0",
            "totalRennetEarned": "0",
            "timesAged": 0,
            "ownedUpgrades": []
        }),
    );
    Ok(Value::Object(map))
}

fn v4_to_v5(record: Value) -> Result<Value, MigrationError> {
    let mut map = into_object(record, 4, 5)?;
    backfill(&mut map, "crafting", json!({ "knownRecipes": [], "crafted": {} }));
    backfill(&mut map, "activeEvents", json!([]));
    Ok(Value::Object(map))
}

// ===========================================================================
// Tests
// ===========================================================================
