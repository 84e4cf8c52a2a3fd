//! Resolution pipeline: reads content files, validates references,
//! builds the immutable catalog.
//!
//! Provides format detection (RON/TOML/JSON), file discovery, and the
//! [`load_catalog`] entry point. Loading is strict where the engine is
//! lenient: the engine tolerates unknown ids at runtime, but an upgrade
//! *authored* against a generator that does not exist is a content bug
//! and fails the load.

use creamery_core::amount::{Amount, parse_amount};
use creamery_core::catalog::{
    AchievementDef, AchievementEffect, Catalog, CatalogBuilder, GeneratorDef, HeroDef,
    PrestigeEffect, PrestigeTuning, PrestigeUpgradeDef, UpgradeDef, UpgradeEffect,
};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::schema::*;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading content.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A decimal field failed to parse exactly.
    #[error("bad decimal in {file}: field '{field}' of '{entry}'")]
    BadDecimal { file: PathBuf, entry: String, field: &'static str },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef { file: PathBuf, name: String, expected_kind: &'static str },

    /// A duplicate id was found.
    #[error("duplicate id '{id}' in {file}")]
    DuplicateId { file: PathBuf, id: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat { file: path.to_path_buf() }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name.
///
/// Looks for `{base}.ron`, `{base}.toml`, and `{base}.json`. Returns
/// `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

fn require_data_file(
    dir: &Path,
    base_name: &'static str,
) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name,
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its detected format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Toml => toml::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Json => serde_json::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
    }
}

/// TOML requires a table at the root, so list files are wrapped in an
/// `entries` key; RON and JSON use the same shape for uniformity.
#[derive(Debug, serde::Deserialize)]
struct EntryList<T> {
    entries: Vec<T>,
}

fn load_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataLoadError> {
    Ok(deserialize_file::<EntryList<T>>(path)?.entries)
}

fn decimal(
    raw: &str,
    file: &Path,
    entry: &str,
    field: &'static str,
) -> Result<Amount, DataLoadError> {
    parse_amount(raw).map_err(|_| DataLoadError::BadDecimal {
        file: file.to_path_buf(),
        entry: entry.to_string(),
        field,
    })
}

fn check_unique(
    seen: &mut HashSet<String>,
    id: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if !seen.insert(id.to_string()) {
        return Err(DataLoadError::DuplicateId {
            file: file.to_path_buf(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// ===========================================================================
// Loading pipeline
// ===========================================================================

/// Load every content file from `dir` and build the catalog.
///
/// `generators`, `upgrades`, and `achievements` are required; `heroes`,
/// `formations`, and `prestige` are optional (a game without the hero
/// feature simply ships no heroes file).
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let mut builder = CatalogBuilder::new();

    // Generators first; upgrade targets resolve against them.
    let gen_path = require_data_file(dir, "generators")?;
    let generator_entries: Vec<GeneratorEntry> = load_entries(&gen_path)?;
    let mut generator_keys = HashSet::new();
    for entry in &generator_entries {
        check_unique(&mut generator_keys, &entry.key, &gen_path)?;
        builder.register_generator(
            &entry.key,
            GeneratorDef {
                name: entry.name.clone(),
                base_output: decimal(&entry.base_output, &gen_path, &entry.key, "base_output")?,
                base_cost: decimal(&entry.base_cost, &gen_path, &entry.key, "base_cost")?,
                cost_growth: decimal(&entry.cost_growth, &gen_path, &entry.key, "cost_growth")?,
            },
        );
    }

    let upg_path = require_data_file(dir, "upgrades")?;
    let upgrade_entries: Vec<UpgradeEntry> = load_entries(&upg_path)?;
    let mut upgrade_ids = HashSet::new();
    for entry in &upgrade_entries {
        check_unique(&mut upgrade_ids, &entry.id, &upg_path)?;
        let effect = match &entry.effect {
            UpgradeEffectEntry::Generator { target, multiplier } => {
                if !generator_keys.contains(target) {
                    return Err(DataLoadError::UnresolvedRef {
                        file: upg_path.clone(),
                        name: target.clone(),
                        expected_kind: "generator",
                    });
                }
                UpgradeEffect::Generator {
                    target: target.clone(),
                    multiplier: decimal(multiplier, &upg_path, &entry.id, "multiplier")?,
                }
            }
            UpgradeEffectEntry::Global { multiplier } => UpgradeEffect::Global {
                multiplier: decimal(multiplier, &upg_path, &entry.id, "multiplier")?,
            },
            UpgradeEffectEntry::Click { multiplier } => UpgradeEffect::Click {
                multiplier: decimal(multiplier, &upg_path, &entry.id, "multiplier")?,
            },
        };
        builder.register_upgrade(
            &entry.id,
            UpgradeDef {
                name: entry.name.clone(),
                cost: decimal(&entry.cost, &upg_path, &entry.id, "cost")?,
                effect,
            },
        );
    }

    let ach_path = require_data_file(dir, "achievements")?;
    let achievement_entries: Vec<AchievementEntry> = load_entries(&ach_path)?;
    let mut achievement_ids = HashSet::new();
    for entry in &achievement_entries {
        check_unique(&mut achievement_ids, &entry.id, &ach_path)?;
        let effect = match &entry.effect {
            Some(AchievementEffectEntry::Global { multiplier }) => {
                Some(AchievementEffect::Global {
                    multiplier: decimal(multiplier, &ach_path, &entry.id, "multiplier")?,
                })
            }
            Some(AchievementEffectEntry::Click { multiplier }) => {
                Some(AchievementEffect::Click {
                    multiplier: decimal(multiplier, &ach_path, &entry.id, "multiplier")?,
                })
            }
            None => None,
        };
        let grant = match &entry.grant {
            Some(raw) => Some(decimal(raw, &ach_path, &entry.id, "grant")?),
            None => None,
        };
        builder.register_achievement(
            &entry.id,
            AchievementDef { name: entry.name.clone(), effect, grant },
        );
    }

    let mut hero_ids = HashSet::new();
    if let Some(hero_path) = find_data_file(dir, "heroes")? {
        let hero_entries: Vec<HeroEntry> = load_entries(&hero_path)?;
        for entry in &hero_entries {
            check_unique(&mut hero_ids, &entry.id, &hero_path)?;
            builder.register_hero(
                &entry.id,
                HeroDef {
                    name: entry.name.clone(),
                    archetype: entry.archetype,
                    recruit_cost: decimal(&entry.recruit_cost, &hero_path, &entry.id, "recruit_cost")?,
                    base_cps_bonus: decimal(
                        &entry.base_cps_bonus,
                        &hero_path,
                        &entry.id,
                        "base_cps_bonus",
                    )?,
                    per_level_bonus: decimal(
                        &entry.per_level_bonus,
                        &hero_path,
                        &entry.id,
                        "per_level_bonus",
                    )?,
                },
            );
        }
    }

    if let Some(form_path) = find_data_file(dir, "formations")? {
        let formation_entries: Vec<FormationEntry> = load_entries(&form_path)?;
        for (index, entry) in formation_entries.iter().enumerate() {
            let bonus = decimal(&entry.bonus, &form_path, &format!("formation #{index}"), "bonus")?;
            builder.register_formation(entry.slots, bonus);
        }
    }

    if let Some(prestige_path) = find_data_file(dir, "prestige")? {
        let file: PrestigeFile = deserialize_file(&prestige_path)?;
        builder.prestige_tuning(PrestigeTuning {
            rennet_threshold: decimal(&file.rennet_threshold, &prestige_path, "tuning", "rennet_threshold")?,
            production_bonus_per_rennet: decimal(
                &file.production_bonus_per_rennet,
                &prestige_path,
                "tuning",
                "production_bonus_per_rennet",
            )?,
            click_bonus_per_rennet: decimal(
                &file.click_bonus_per_rennet,
                &prestige_path,
                "tuning",
                "click_bonus_per_rennet",
            )?,
        });
        let mut prestige_ids = HashSet::new();
        for entry in &file.upgrades {
            check_unique(&mut prestige_ids, &entry.id, &prestige_path)?;
            let effect = match &entry.effect {
                PrestigeEffectEntry::Production { multiplier } => PrestigeEffect::Production {
                    multiplier: decimal(multiplier, &prestige_path, &entry.id, "multiplier")?,
                },
                PrestigeEffectEntry::Click { multiplier } => PrestigeEffect::Click {
                    multiplier: decimal(multiplier, &prestige_path, &entry.id, "multiplier")?,
                },
            };
            builder.register_prestige_upgrade(
                &entry.id,
                PrestigeUpgradeDef {
                    name: entry.name.clone(),
                    cost: decimal(&entry.cost, &prestige_path, &entry.id, "cost")?,
                    effect,
                },
            );
        }
    }

    Ok(builder.finalize())
}

// ===========================================================================
// Tests
// ===========================================================================
