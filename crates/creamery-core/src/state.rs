//! The game-state aggregate and its mutating operations.
//!
//! [`GameState`] is the single root of persistent player progress. Every
//! mutation (purchase, click, accrual, party change, aging) leaves the
//! structural invariants intact and ends by re-deriving both rates
//! through the production engine, so there is no cached rate to go
//! stale. Mutations return the [`GameEvent`]s they caused; delivering
//! them is the coordinating layer's job.
//!
//! The aggregate is owned by exactly one coordinating layer at a time.
//! Nothing here locks; callers serialize mutations.

use crate::amount::{Amount, Millis, Seconds, floor_div, pow, zero};
use crate::catalog::Catalog;
use crate::event::GameEvent;
use crate::offline::OfflineProgress;
use crate::production::{self, BonusSources, InvariantViolation, Rates};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A gameplay operation could not be applied. Unlike bonus aggregation
/// (where unknown ids are silently inert), purchases validate their
/// target: spending currency on an id the catalog lacks is a caller bug.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error("not enough curds: need {needed}, have {have}")]
    InsufficientCurds { needed: Amount, have: Amount },
    #[error("not enough rennet: need {needed}, have {have}")]
    InsufficientRennet { needed: Amount, have: Amount },
    #[error("unknown generator '{0}'")]
    UnknownGenerator(String),
    #[error("unknown upgrade '{0}'")]
    UnknownUpgrade(String),
    #[error("unknown hero '{0}'")]
    UnknownHero(String),
    #[error("unknown prestige upgrade '{0}'")]
    UnknownPrestigeUpgrade(String),
    #[error("'{0}' is already owned")]
    AlreadyOwned(String),
    #[error("hero '{0}' is already recruited")]
    AlreadyRecruited(String),
    #[error("hero '{0}' is not recruited")]
    NotRecruited(String),
    #[error("not enough lifetime curds to age (threshold {threshold} per rennet)")]
    NothingToAge { threshold: Amount },
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

// ---------------------------------------------------------------------------
// Substructures
// ---------------------------------------------------------------------------

/// Per-hero persistent progress. Recruited heroes start at level 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroState {
    pub level: u32,
}

/// One of the four fixed party positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartySlot {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl PartySlot {
    pub const ALL: [PartySlot; 4] = [
        PartySlot::FrontLeft,
        PartySlot::FrontRight,
        PartySlot::BackLeft,
        PartySlot::BackRight,
    ];
}

/// The party formation: exactly four named slots, each holding at most
/// one hero id. A hero id occupies at most one slot; [`GameState::assign_party_slot`]
/// displaces rather than duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub front_left: Option<String>,
    pub front_right: Option<String>,
    pub back_left: Option<String>,
    pub back_right: Option<String>,
}

impl Party {
    pub fn slot(&self, slot: PartySlot) -> &Option<String> {
        match slot {
            PartySlot::FrontLeft => &self.front_left,
            PartySlot::FrontRight => &self.front_right,
            PartySlot::BackLeft => &self.back_left,
            PartySlot::BackRight => &self.back_right,
        }
    }

    pub fn slot_mut(&mut self, slot: PartySlot) -> &mut Option<String> {
        match slot {
            PartySlot::FrontLeft => &mut self.front_left,
            PartySlot::FrontRight => &mut self.front_right,
            PartySlot::BackLeft => &mut self.back_left,
            PartySlot::BackRight => &mut self.back_right,
        }
    }

    /// The slot a hero currently occupies, if any.
    pub fn position_of(&self, hero_id: &str) -> Option<PartySlot> {
        PartySlot::ALL
            .into_iter()
            .find(|&s| self.slot(s).as_deref() == Some(hero_id))
    }

    /// Hero ids currently assigned, in slot order.
    pub fn assigned(&self) -> impl Iterator<Item = &String> {
        PartySlot::ALL.into_iter().filter_map(|s| self.slot(s).as_ref())
    }
}

/// Prestige ("aging") progress. Survives everything except a full reset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrestigeState {
    /// Spendable rennet.
    pub rennet: Amount,
    /// Rennet ever earned. Never decreases; drives the prestige
    /// multipliers so spending rennet cannot lower production.
    pub total_rennet_earned: Amount,
    pub times_aged: u32,
    pub owned_upgrades: BTreeSet<String>,
}

/// Zone/exploration progress. The engine persists it and feeds it to the
/// combat feature; the feature logic itself lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneProgress {
    pub current_zone: u32,
    pub highest_cleared: u32,
    pub encounters_won: u64,
}

impl Default for ZoneProgress {
    fn default() -> Self {
        Self { current_zone: 1, highest_cleared: 0, encounters_won: 0 }
    }
}

/// Crafting progress. Persisted opaquely; recipes and their effects are
/// the crafting feature's concern.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftingState {
    pub known_recipes: BTreeSet<String>,
    pub crafted: BTreeMap<String, u64>,
}

/// A timed encounter in progress. Transient: deliberately never
/// persisted; loading always restores the idle default (`None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEncounter {
    pub zone: u32,
    pub started: Millis,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Root aggregate of player progress.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub curds: Amount,
    pub whey: Amount,
    /// Lifetime curds. Monotone: only a full [`reset`](Self::reset) may
    /// lower it, and spending never moves it.
    pub total_curds_earned: Amount,
    pub total_clicks: u64,
    pub generators: BTreeMap<String, u64>,
    pub upgrades: BTreeSet<String>,
    pub achievements: BTreeSet<String>,
    /// "Eh!" flourishes fired, one per milestone crossing.
    pub eh_count: u64,
    /// Highest power-of-ten lifetime milestone reached.
    pub last_milestone: u32,
    pub heroes: BTreeMap<String, HeroState>,
    pub party: Party,
    pub equipment_inventory: Vec<String>,
    pub zone_progress: ZoneProgress,
    pub prestige: PrestigeState,
    pub crafting: CraftingState,
    pub active_events: Vec<String>,
    /// Set at creation, immutable thereafter.
    pub game_started: Millis,
    /// Updated by the caller on every successful persist.
    pub last_saved: Millis,
    /// Derived rates. Pure function of the bonus-contributing fields
    /// above; recomputed on every mutation, never loaded from a save.
    pub rates: Rates,
    /// Transient, never persisted.
    pub encounter: Option<ActiveEncounter>,
}

impl GameState {
    /// Fresh all-defaults state. With nothing owned, every multiplier is
    /// the identity, so the default rates need no catalog to derive.
    pub fn new(now: Millis) -> Self {
        Self {
            curds: zero(),
            whey: zero(),
            total_curds_earned: zero(),
            total_clicks: 0,
            generators: BTreeMap::new(),
            upgrades: BTreeSet::new(),
            achievements: BTreeSet::new(),
            eh_count: 0,
            last_milestone: 0,
            heroes: BTreeMap::new(),
            party: Party::default(),
            equipment_inventory: Vec::new(),
            zone_progress: ZoneProgress::default(),
            prestige: PrestigeState::default(),
            crafting: CraftingState::default(),
            active_events: Vec::new(),
            game_started: now,
            last_saved: now,
            rates: Rates::default(),
            encounter: None,
        }
    }

    /// The bonus-contributing fields as one borrowed view.
    pub fn bonus_sources(&self) -> BonusSources<'_> {
        BonusSources {
            generators: &self.generators,
            upgrades: &self.upgrades,
            achievements: &self.achievements,
            heroes: &self.heroes,
            party: &self.party,
            prestige: &self.prestige,
        }
    }

    /// Re-derive both rates from the current bonus sources.
    pub fn recompute_rates(&mut self, catalog: &Catalog) -> Result<(), InvariantViolation> {
        self.rates = production::recompute(&self.bonus_sources(), catalog)?;
        Ok(())
    }

    // -- earning ------------------------------------------------------------

    /// Add earned curds to both the spendable and lifetime totals, firing
    /// milestone events for every power of ten the lifetime total crosses.
    fn earn(&mut self, amount: &Amount, events: &mut Vec<GameEvent>) {
        if amount <= &zero() {
            return;
        }
        self.curds = &self.curds + amount;
        self.total_curds_earned = &self.total_curds_earned + amount;
        let ten = Amount::from(10u32);
        while self.total_curds_earned >= pow(&ten, u64::from(self.last_milestone) + 1) {
            self.last_milestone += 1;
            self.eh_count += 1;
            events.push(GameEvent::MilestoneReached { milestone: self.last_milestone });
        }
    }

    fn spend_curds(&mut self, cost: &Amount) -> Result<(), StateError> {
        if self.curds < *cost {
            return Err(StateError::InsufficientCurds {
                needed: cost.clone(),
                have: self.curds.clone(),
            });
        }
        self.curds = &self.curds - cost;
        Ok(())
    }

    /// One click: credit the current per-click value.
    pub fn click(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let value = self.rates.curd_per_click.clone();
        self.earn(&value, &mut events);
        self.total_clicks += 1;
        events
    }

    /// Credit `seconds` of production at the current rate. Used by the
    /// coordinating layer's periodic tick while the game is open; shares
    /// its rate derivation with offline reconciliation.
    pub fn accrue(&mut self, seconds: Seconds) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let gain = &self.rates.curd_per_second * Amount::from(seconds);
        self.earn(&gain, &mut events);
        events
    }

    /// Apply an already-computed (and player-acknowledged) offline award.
    /// The caller updates `last_saved` on the next successful persist.
    pub fn apply_offline(&mut self, progress: &OfflineProgress) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if progress.seconds_away == 0 {
            return events;
        }
        self.earn(&progress.earned, &mut events);
        events.push(GameEvent::OfflineApplied {
            earned: progress.earned.clone(),
            seconds_away: progress.seconds_away,
        });
        events
    }

    // -- purchases ----------------------------------------------------------

    /// Buy one unit of a generator at its current escalating cost.
    pub fn purchase_generator(
        &mut self,
        key: &str,
        catalog: &Catalog,
    ) -> Result<Vec<GameEvent>, StateError> {
        let def = catalog
            .generator(key)
            .ok_or_else(|| StateError::UnknownGenerator(key.to_string()))?;
        let owned = self.generators.get(key).copied().unwrap_or(0);
        let cost = &def.base_cost * pow(&def.cost_growth, owned);
        self.spend_curds(&cost)?;
        let count = self.generators.entry(key.to_string()).or_insert(0);
        *count += 1;
        let count = *count;
        self.recompute_rates(catalog)?;
        Ok(vec![GameEvent::GeneratorPurchased { key: key.to_string(), count }])
    }

    /// Buy an upgrade. Owned-upgrade ids are a set: buying twice is an
    /// error, not a second charge.
    pub fn purchase_upgrade(
        &mut self,
        id: &str,
        catalog: &Catalog,
    ) -> Result<Vec<GameEvent>, StateError> {
        let def = catalog
            .upgrade(id)
            .ok_or_else(|| StateError::UnknownUpgrade(id.to_string()))?;
        if self.upgrades.contains(id) {
            return Err(StateError::AlreadyOwned(id.to_string()));
        }
        let cost = def.cost.clone();
        self.spend_curds(&cost)?;
        self.upgrades.insert(id.to_string());
        self.recompute_rates(catalog)?;
        Ok(vec![GameEvent::UpgradePurchased { id: id.to_string() }])
    }

    /// Unlock an achievement. Idempotent: re-unlocking is a silent no-op.
    /// Ids the catalog does not know are recorded anyway (forward
    /// compatibility with content removed or not yet shipped).
    pub fn unlock_achievement(
        &mut self,
        id: &str,
        catalog: &Catalog,
    ) -> Result<Vec<GameEvent>, StateError> {
        if !self.achievements.insert(id.to_string()) {
            return Ok(Vec::new());
        }
        let mut events = Vec::new();
        if let Some(grant) = catalog.achievement(id).and_then(|def| def.grant.clone()) {
            self.earn(&grant, &mut events);
        }
        self.recompute_rates(catalog)?;
        events.push(GameEvent::AchievementUnlocked { id: id.to_string() });
        Ok(events)
    }

    // -- heroes and party ---------------------------------------------------

    /// Recruit a hero at level 1 for their catalog cost.
    pub fn recruit_hero(
        &mut self,
        id: &str,
        catalog: &Catalog,
    ) -> Result<Vec<GameEvent>, StateError> {
        let def = catalog
            .hero(id)
            .ok_or_else(|| StateError::UnknownHero(id.to_string()))?;
        if self.heroes.contains_key(id) {
            return Err(StateError::AlreadyRecruited(id.to_string()));
        }
        let cost = def.recruit_cost.clone();
        self.spend_curds(&cost)?;
        self.heroes.insert(id.to_string(), HeroState { level: 1 });
        // A fresh recruit is benched; rates are unchanged until assigned.
        Ok(vec![GameEvent::HeroRecruited { id: id.to_string() }])
    }

    /// Raise a recruited hero one level. Costs scale with current level.
    pub fn train_hero(
        &mut self,
        id: &str,
        catalog: &Catalog,
    ) -> Result<Vec<GameEvent>, StateError> {
        let def = catalog
            .hero(id)
            .ok_or_else(|| StateError::UnknownHero(id.to_string()))?;
        let level = self
            .heroes
            .get(id)
            .ok_or_else(|| StateError::NotRecruited(id.to_string()))?
            .level;
        let cost = &def.recruit_cost * Amount::from(level);
        self.spend_curds(&cost)?;
        let Some(hero) = self.heroes.get_mut(id) else {
            return Err(StateError::NotRecruited(id.to_string()));
        };
        hero.level += 1;
        let level = hero.level;
        self.recompute_rates(catalog)?;
        Ok(vec![GameEvent::HeroTrained { id: id.to_string(), level }])
    }

    /// Put a recruited hero into a slot. If the hero already stands in
    /// another slot they are moved, never duplicated; a previous occupant
    /// of the target slot is benched.
    pub fn assign_party_slot(
        &mut self,
        slot: PartySlot,
        hero_id: &str,
        catalog: &Catalog,
    ) -> Result<Vec<GameEvent>, StateError> {
        if !self.heroes.contains_key(hero_id) {
            return Err(StateError::NotRecruited(hero_id.to_string()));
        }
        if let Some(previous) = self.party.position_of(hero_id) {
            *self.party.slot_mut(previous) = None;
        }
        *self.party.slot_mut(slot) = Some(hero_id.to_string());
        self.recompute_rates(catalog)?;
        Ok(vec![GameEvent::PartyChanged])
    }

    /// Bench whichever hero stands in the slot.
    pub fn clear_party_slot(
        &mut self,
        slot: PartySlot,
        catalog: &Catalog,
    ) -> Result<Vec<GameEvent>, StateError> {
        if self.party.slot(slot).is_none() {
            return Ok(Vec::new());
        }
        *self.party.slot_mut(slot) = None;
        self.recompute_rates(catalog)?;
        Ok(vec![GameEvent::PartyChanged])
    }

    // -- prestige -----------------------------------------------------------

    /// Spend rennet on a prestige upgrade.
    pub fn purchase_prestige_upgrade(
        &mut self,
        id: &str,
        catalog: &Catalog,
    ) -> Result<Vec<GameEvent>, StateError> {
        let def = catalog
            .prestige_upgrade(id)
            .ok_or_else(|| StateError::UnknownPrestigeUpgrade(id.to_string()))?;
        if self.prestige.owned_upgrades.contains(id) {
            return Err(StateError::AlreadyOwned(id.to_string()));
        }
        if self.prestige.rennet < def.cost {
            return Err(StateError::InsufficientRennet {
                needed: def.cost.clone(),
                have: self.prestige.rennet.clone(),
            });
        }
        self.prestige.rennet = &self.prestige.rennet - &def.cost;
        self.prestige.owned_upgrades.insert(id.to_string());
        self.recompute_rates(catalog)?;
        Ok(vec![GameEvent::PrestigeUpgradePurchased { id: id.to_string() }])
    }

    /// Age the cheese: convert lifetime curds past the threshold into
    /// rennet and wipe the run economy (curds, generators, upgrades,
    /// active transient effects). Lifetime totals, achievements, heroes,
    /// party, equipment, zones, crafting, and whey all survive.
    pub fn age(&mut self, catalog: &Catalog) -> Result<Vec<GameEvent>, StateError> {
        let threshold = &catalog.prestige().rennet_threshold;
        let entitled = floor_div(&self.total_curds_earned, threshold);
        let gained = &entitled - &self.prestige.total_rennet_earned;
        if gained <= zero() {
            return Err(StateError::NothingToAge { threshold: threshold.clone() });
        }
        self.prestige.rennet = &self.prestige.rennet + &gained;
        self.prestige.total_rennet_earned = entitled;
        self.prestige.times_aged += 1;

        self.curds = zero();
        self.generators.clear();
        self.upgrades.clear();
        self.active_events.clear();
        self.encounter = None;

        self.recompute_rates(catalog)?;
        Ok(vec![GameEvent::Aged { rennet_gained: gained }])
    }

    /// Full player-initiated wipe. The only operation allowed to lower
    /// lifetime totals.
    pub fn reset(&mut self, now: Millis) {
        *self = GameState::new(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::{one, parse_amount};
    use crate::test_utils::{amt, sample_catalog};

    fn rich_state(catalog: &Catalog) -> GameState {
        let mut state = GameState::new(0);
        state.curds = parse_amount("1000000000").unwrap();
        state.total_curds_earned = state.curds.clone();
        state.last_milestone = 9;
        state.recompute_rates(catalog).unwrap();
        state
    }

    #[test]
    fn fresh_state_has_identity_rates() {
        let state = GameState::new(42);
        assert_eq!(state.rates.curd_per_second, zero());
        assert_eq!(state.rates.curd_per_click, one());
        assert_eq!(state.game_started, 42);
        assert_eq!(state.last_saved, 42);
    }

    #[test]
    fn click_credits_click_value_and_counts() {
        let catalog = sample_catalog();
        let mut state = GameState::new(0);
        state.recompute_rates(&catalog).unwrap();
        state.click();
        state.click();
        assert_eq!(state.curds, amt("2"));
        assert_eq!(state.total_curds_earned, amt("2"));
        assert_eq!(state.total_clicks, 2);
    }

    #[test]
    fn purchase_updates_count_cost_and_rate() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog);
        let before = state.curds.clone();

        let events = state.purchase_generator("vat", &catalog).unwrap();
        assert_eq!(events, vec![GameEvent::GeneratorPurchased { key: "vat".into(), count: 1 }]);
        assert_eq!(state.generators["vat"], 1);
        // vat: base output 1/s, base cost 10.
        assert_eq!(state.curds, &before - &amt("10"));
        assert_eq!(state.rates.curd_per_second, amt("1"));

        // Second unit costs base * growth.
        state.purchase_generator("vat", &catalog).unwrap();
        assert_eq!(state.curds, &before - &amt("10") - &amt("11.5"));
        assert_eq!(state.rates.curd_per_second, amt("2"));
    }

    #[test]
    fn spending_never_moves_lifetime_total() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog);
        let lifetime = state.total_curds_earned.clone();
        state.purchase_generator("vat", &catalog).unwrap();
        state.purchase_upgrade("sharper-curd-knife", &catalog).unwrap();
        state.recruit_hero("brie", &catalog).unwrap();
        state.train_hero("brie", &catalog).unwrap();
        assert_eq!(state.total_curds_earned, lifetime);
    }

    #[test]
    fn insufficient_funds_is_an_error_and_a_no_op() {
        let catalog = sample_catalog();
        let mut state = GameState::new(0);
        state.recompute_rates(&catalog).unwrap();
        let err = state.purchase_generator("vat", &catalog).unwrap_err();
        assert!(matches!(err, StateError::InsufficientCurds { .. }));
        assert_eq!(state.generators.get("vat"), None);
        assert_eq!(state.curds, zero());
    }

    #[test]
    fn unknown_purchase_targets_are_rejected() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog);
        assert!(matches!(
            state.purchase_generator("moon-dairy", &catalog),
            Err(StateError::UnknownGenerator(_))
        ));
        assert!(matches!(
            state.purchase_upgrade("no-such", &catalog),
            Err(StateError::UnknownUpgrade(_))
        ));
        assert!(matches!(
            state.recruit_hero("no-such", &catalog),
            Err(StateError::UnknownHero(_))
        ));
    }

    #[test]
    fn double_upgrade_purchase_is_rejected() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog);
        state.purchase_upgrade("copper-vat", &catalog).unwrap();
        let before = state.curds.clone();
        assert!(matches!(
            state.purchase_upgrade("copper-vat", &catalog),
            Err(StateError::AlreadyOwned(_))
        ));
        assert_eq!(state.curds, before);
    }

    #[test]
    fn achievement_unlock_is_idempotent() {
        let catalog = sample_catalog();
        let mut state = GameState::new(0);
        state.recompute_rates(&catalog).unwrap();
        let events = state.unlock_achievement("first-curd", &catalog).unwrap();
        assert!(events.iter().any(|e| matches!(e, GameEvent::AchievementUnlocked { .. })));
        let again = state.unlock_achievement("first-curd", &catalog).unwrap();
        assert!(again.is_empty());
        assert_eq!(state.achievements.len(), 1);
    }

    #[test]
    fn hero_occupies_at_most_one_slot() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog);
        state.recruit_hero("brie", &catalog).unwrap();
        state.assign_party_slot(PartySlot::FrontLeft, "brie", &catalog).unwrap();
        state.assign_party_slot(PartySlot::BackRight, "brie", &catalog).unwrap();
        assert_eq!(state.party.front_left, None);
        assert_eq!(state.party.back_right.as_deref(), Some("brie"));
        assert_eq!(state.party.assigned().count(), 1);
    }

    #[test]
    fn party_changes_recompute_rates() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog);
        state.purchase_generator("vat", &catalog).unwrap();
        let solo = state.rates.curd_per_second.clone();

        state.recruit_hero("brie", &catalog).unwrap();
        assert_eq!(state.rates.curd_per_second, solo); // benched

        state.assign_party_slot(PartySlot::FrontLeft, "brie", &catalog).unwrap();
        assert!(state.rates.curd_per_second > solo);

        state.clear_party_slot(PartySlot::FrontLeft, &catalog).unwrap();
        assert_eq!(state.rates.curd_per_second, solo);
    }

    #[test]
    fn milestones_fire_once_per_power_of_ten() {
        let catalog = sample_catalog();
        let mut state = GameState::new(0);
        state.recompute_rates(&catalog).unwrap();
        let mut events = Vec::new();
        state.earn(&amt("150"), &mut events);
        // Crossed 10 and 100.
        assert_eq!(
            events,
            vec![
                GameEvent::MilestoneReached { milestone: 1 },
                GameEvent::MilestoneReached { milestone: 2 },
            ]
        );
        assert_eq!(state.eh_count, 2);
        assert_eq!(state.last_milestone, 2);

        let mut more = Vec::new();
        state.earn(&amt("1"), &mut more);
        assert!(more.is_empty());
    }

    #[test]
    fn aging_converts_lifetime_and_wipes_the_run() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog); // lifetime 1e9, threshold 1e6
        state.purchase_generator("vat", &catalog).unwrap();
        state.purchase_upgrade("copper-vat", &catalog).unwrap();
        state.unlock_achievement("first-curd", &catalog).unwrap();
        state.encounter = Some(ActiveEncounter { zone: 2, started: 5 });
        let lifetime = state.total_curds_earned.clone();

        let events = state.age(&catalog).unwrap();
        assert_eq!(events.len(), 1);
        let GameEvent::Aged { rennet_gained } = &events[0] else {
            panic!("expected Aged event");
        };
        assert_eq!(rennet_gained, &amt("1000"));
        assert_eq!(state.prestige.rennet, amt("1000"));
        assert_eq!(state.prestige.times_aged, 1);

        assert_eq!(state.curds, zero());
        assert!(state.generators.is_empty());
        assert!(state.upgrades.is_empty());
        assert_eq!(state.encounter, None);
        // Survivors.
        assert_eq!(state.total_curds_earned, lifetime);
        assert_eq!(state.achievements.len(), 1);

        // Aging again with no new lifetime progress yields nothing.
        assert!(matches!(state.age(&catalog), Err(StateError::NothingToAge { .. })));
    }

    #[test]
    fn aging_raises_the_production_multiplier() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog);
        state.purchase_generator("vat", &catalog).unwrap();
        let before = state.rates.curd_per_second.clone();
        state.age(&catalog).unwrap();
        state.curds = amt("1000");
        state.purchase_generator("vat", &catalog).unwrap();
        // One vat again, but now under 1000 rennet * 0.05 bonus.
        assert!(state.rates.curd_per_second > before);
    }

    #[test]
    fn prestige_upgrade_spends_rennet_only() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog);
        state.age(&catalog).unwrap();
        let lifetime = state.total_curds_earned.clone();
        state.purchase_prestige_upgrade("oak-shelving", &catalog).unwrap();
        assert!(state.prestige.owned_upgrades.contains("oak-shelving"));
        assert!(state.prestige.rennet < amt("1000"));
        assert_eq!(state.total_curds_earned, lifetime);

        assert!(matches!(
            state.purchase_prestige_upgrade("oak-shelving", &catalog),
            Err(StateError::AlreadyOwned(_))
        ));
    }

    #[test]
    fn reset_is_a_fresh_start() {
        let catalog = sample_catalog();
        let mut state = rich_state(&catalog);
        state.purchase_generator("vat", &catalog).unwrap();
        state.reset(777);
        assert_eq!(state, GameState::new(777));
    }
}
