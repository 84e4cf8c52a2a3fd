//! Offline-progress reconciliation.
//!
//! Converts wall-clock time spent away into earned curds under a hard
//! cap and a minimum-threshold gate. The function is pure and idempotent:
//! it never touches `last_saved` itself. The caller updates persisted
//! state only after the earned amount has been applied and acknowledged,
//! and must use one agreed "now" per invocation so the same interval is
//! never credited twice.

use crate::amount::{Amount, Millis, Seconds, zero};

/// Default away-time cap: 8 hours.
pub const DEFAULT_CAP_SECS: Seconds = 28_800;

/// Minimum away time that earns anything. Anything shorter reports zero,
/// which keeps rapid reload cycles from spamming meaningless modals.
pub const MIN_AWAY_SECS: Seconds = 60;

/// What the player earned while away.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineProgress {
    /// Exact curds earned: `rate * seconds_away`, unrounded.
    pub earned: Amount,
    /// Capped elapsed seconds actually credited.
    pub seconds_away: Seconds,
}

impl OfflineProgress {
    fn nothing() -> Self {
        Self { earned: zero(), seconds_away: 0 }
    }
}

/// Compute offline earnings for the interval between `last_saved` and
/// `now` (both epoch-ms), at the given production rate.
///
/// Elapsed time beyond `cap_secs` is discarded, not accrued. Elapsed
/// time under [`MIN_AWAY_SECS`] reports zero. A `now` before
/// `last_saved` (clock skew) behaves as zero elapsed.
pub fn offline_progress(
    rate: &Amount,
    last_saved: Millis,
    now: Millis,
    cap_secs: Seconds,
) -> OfflineProgress {
    let elapsed_ms = now.saturating_sub(last_saved).max(0) as u64;
    let elapsed = (elapsed_ms / 1000).min(cap_secs);
    if elapsed < MIN_AWAY_SECS {
        return OfflineProgress::nothing();
    }
    OfflineProgress {
        earned: rate * Amount::from(elapsed),
        seconds_away: elapsed,
    }
}
