//! Production engine.
//!
//! Combines per-generator output, per-generator multipliers, and the
//! product of every global multiplier source into the two derived rates
//! the whole game hangs off: curds per second and curds per click.
//!
//! There is no cached rate anywhere in this module. Callers recompute
//! eagerly through [`recompute`] whenever any contributing input changes;
//! a rate that cannot go stale is a rate that cannot desynchronize from
//! the bonus definitions that produced it.

use crate::amount::{Amount, one, zero};
use crate::bonus;
use crate::catalog::Catalog;
use crate::state::{HeroState, Party, PrestigeState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A caller handed the engine a state that violates a structural
/// invariant. Propagated, never clamped, so calling-code bugs surface
/// in tests instead of corrupting the economy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("generator key must not be empty")]
    EmptyGeneratorKey,
}

/// Borrowed view of every bonus-contributing field of a game state.
///
/// Derived rates are a pure function of exactly these fields: two states
/// that agree on a `BonusSources` view agree on their rates.
#[derive(Debug, Clone, Copy)]
pub struct BonusSources<'a> {
    pub generators: &'a BTreeMap<String, u64>,
    pub upgrades: &'a BTreeSet<String>,
    pub achievements: &'a BTreeSet<String>,
    pub heroes: &'a BTreeMap<String, HeroState>,
    pub party: &'a Party,
    pub prestige: &'a PrestigeState,
}

/// The independent global multiplier sources, kept separate for display.
/// [`total`](GlobalMultipliers::total) is their product; the order they
/// are multiplied in never matters because amounts are exact.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalMultipliers {
    pub upgrade: Amount,
    pub achievement: Amount,
    pub hero: Amount,
    pub formation: Amount,
    pub prestige: Amount,
}

impl GlobalMultipliers {
    pub fn total(&self) -> Amount {
        &(&(&(&self.upgrade * &self.achievement) * &self.hero) * &self.formation) * &self.prestige
    }
}

/// The independent click multiplier sources.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickMultipliers {
    pub upgrade: Amount,
    pub achievement: Amount,
    pub prestige: Amount,
}

impl ClickMultipliers {
    pub fn total(&self) -> Amount {
        &(&self.upgrade * &self.achievement) * &self.prestige
    }
}

/// The two derived rates. Always recomputed from bonus sources, never
/// persisted as ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub curd_per_second: Amount,
    pub curd_per_click: Amount,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            curd_per_second: zero(),
            curd_per_click: base_click_value(),
        }
    }
}

/// Base value of a single click before multipliers.
///
/// Kept as a named accessor rather than an inline literal so a future
/// non-unit base only touches one place.
pub fn base_click_value() -> Amount {
    one()
}

/// Every global multiplier source for the given state view.
pub fn global_multipliers(sources: &BonusSources<'_>, catalog: &Catalog) -> GlobalMultipliers {
    GlobalMultipliers {
        upgrade: bonus::global_multiplier(sources.upgrades, catalog),
        achievement: bonus::achievement_global_multiplier(sources.achievements, catalog),
        hero: bonus::hero_cps_bonus(sources.heroes, sources.party, catalog),
        formation: bonus::formation_bonus(sources.party, catalog),
        prestige: bonus::prestige_production_multiplier(sources.prestige, catalog),
    }
}

/// Every click multiplier source for the given state view.
pub fn click_multipliers(sources: &BonusSources<'_>, catalog: &Catalog) -> ClickMultipliers {
    ClickMultipliers {
        upgrade: bonus::click_multiplier(sources.upgrades, catalog),
        achievement: bonus::achievement_click_multiplier(sources.achievements, catalog),
        prestige: bonus::prestige_click_multiplier(sources.prestige, catalog),
    }
}

/// Total curds per second.
///
/// Sums `count * base_output * generator_multiplier` over every owned
/// generator, then scales the sum by the global multiplier product.
/// Generators the catalog does not know contribute nothing; an empty
/// generator key is a caller bug and is propagated.
pub fn production_rate(
    generators: &BTreeMap<String, u64>,
    catalog: &Catalog,
    generator_multipliers: &HashMap<String, Amount>,
    total_global_multiplier: &Amount,
) -> Result<Amount, InvariantViolation> {
    let mut sum = zero();
    for (key, count) in generators {
        if key.is_empty() {
            return Err(InvariantViolation::EmptyGeneratorKey);
        }
        let Some(def) = catalog.generator(key) else { continue };
        let mult = generator_multipliers.get(key).cloned().unwrap_or_else(one);
        sum = &sum + &(&(Amount::from(*count) * &def.base_output) * &mult);
    }
    Ok(&sum * total_global_multiplier)
}

/// Curds per click: the base click value scaled by the click multiplier
/// product.
pub fn click_value(total_click_multiplier: &Amount) -> Amount {
    &base_click_value() * total_click_multiplier
}

/// The single derivation path for both rates. Mutating operations and
/// the save loader both come through here.
pub fn recompute(sources: &BonusSources<'_>, catalog: &Catalog) -> Result<Rates, InvariantViolation> {
    let gen_mults = bonus::generator_multipliers(sources.upgrades, catalog);
    let global = global_multipliers(sources, catalog).total();
    let click = click_multipliers(sources, catalog).total();
    Ok(Rates {
        curd_per_second: production_rate(sources.generators, catalog, &gen_mults, &global)?,
        curd_per_click: click_value(&click),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::parse_amount;
    use crate::test_utils::sample_catalog;

    fn amt(s: &str) -> Amount {
        parse_amount(s).unwrap()
    }

    fn counts(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries.iter().map(|(k, c)| (k.to_string(), *c)).collect()
    }

    #[test]
    fn raw_sum_with_identity_multipliers() {
        let catalog = sample_catalog();
        let generators = counts(&[("vat", 10)]);
        let mults = bonus::generator_multipliers(&BTreeSet::new(), &catalog);
        // vat base output is 1/s.
        let rate = production_rate(&generators, &catalog, &mults, &one()).unwrap();
        assert_eq!(rate, amt("10"));
    }

    #[test]
    fn unknown_generator_contributes_nothing() {
        let catalog = sample_catalog();
        let generators = counts(&[("vat", 10), ("moon-dairy", 99)]);
        let mults = HashMap::new();
        let rate = production_rate(&generators, &catalog, &mults, &one()).unwrap();
        assert_eq!(rate, amt("10"));
    }

    #[test]
    fn empty_key_is_an_invariant_violation() {
        let catalog = sample_catalog();
        let generators = counts(&[("", 1)]);
        let err = production_rate(&generators, &catalog, &HashMap::new(), &one()).unwrap_err();
        assert_eq!(err, InvariantViolation::EmptyGeneratorKey);
    }

    #[test]
    fn global_multiplier_scales_the_sum() {
        let catalog = sample_catalog();
        let generators = counts(&[("vat", 4)]);
        let mults = bonus::generator_multipliers(&BTreeSet::new(), &catalog);
        let rate = production_rate(&generators, &catalog, &mults, &amt("1.5")).unwrap();
        assert_eq!(rate, amt("6"));
    }

    #[test]
    fn click_value_scales_base() {
        assert_eq!(click_value(&one()), base_click_value());
        assert_eq!(click_value(&amt("4")), amt("4"));
    }

    #[test]
    fn default_rates_match_fresh_recompute() {
        let catalog = sample_catalog();
        let generators = BTreeMap::new();
        let upgrades = BTreeSet::new();
        let achievements = BTreeSet::new();
        let heroes = BTreeMap::new();
        let party = Party::default();
        let prestige = PrestigeState::default();
        let sources = BonusSources {
            generators: &generators,
            upgrades: &upgrades,
            achievements: &achievements,
            heroes: &heroes,
            party: &party,
            prestige: &prestige,
        };
        assert_eq!(recompute(&sources, &catalog).unwrap(), Rates::default());
    }
}
