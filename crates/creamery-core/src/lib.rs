//! Creamery Core -- the economy and state engine for an incremental
//! cheese-making game.
//!
//! The hard problems here are arithmetic and bookkeeping, not rendering:
//! combining many stacking multiplicative bonus sources into one exact
//! production rate, crediting wall-clock time spent away, and carrying a
//! player's save across format versions without losing data or applying
//! a bonus twice.
//!
//! # Derivation Pipeline
//!
//! Rates are always derived fresh, never cached across mutations:
//!
//! 1. **Aggregate** -- [`bonus`] reduces owned upgrades, unlocked
//!    achievements, the hero party, and prestige progress to scalar
//!    multipliers (identity on absence, unknown ids inert).
//! 2. **Combine** -- [`production`] sums generator output under the
//!    per-generator multipliers and scales by the global product.
//! 3. **Apply** -- [`state`] mutations credit or spend curds, then
//!    re-derive both rates through the same pipeline.
//!
//! # Key Types
//!
//! - [`amount::Amount`] -- exact arbitrary-precision decimal; every
//!   quantity, cost, rate, and multiplier.
//! - [`catalog::Catalog`] -- frozen content tables supplied at call time.
//! - [`state::GameState`] -- the root aggregate of player progress.
//! - [`production::Rates`] -- curds per second and per click, always a
//!   pure function of the bonus-contributing fields.
//! - [`offline::offline_progress`] -- capped, threshold-gated credit for
//!   time spent away.
//! - [`save`] -- versioned JSON codec; [`migration`] -- additive-only
//!   version backfill chain.
//! - [`event::EventBus`] -- publish/subscribe delivery for the events
//!   mutations return.
//!
//! The engine is single-threaded by contract: every function is a pure
//! computation or a plain `&mut` mutation, and the coordinating layer
//! serializes all calls on one `GameState` at a time.

pub mod amount;
pub mod bonus;
pub mod catalog;
pub mod event;
pub mod migration;
pub mod offline;
pub mod production;
pub mod save;
pub mod settings;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
