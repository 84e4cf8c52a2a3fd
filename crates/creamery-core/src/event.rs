//! Cross-cutting game notifications.
//!
//! Mutating state operations *return* the events they caused; they never
//! hold callback registries themselves. The coordinating layer owns an
//! [`EventBus`] and publishes those events to whoever registered --
//! toasts, audio, dialogue triggers, analytics. This keeps the engine's
//! pure-function contract intact while still giving the UI a single
//! subscription point.

use crate::amount::{Amount, Seconds};

/// Something noteworthy that happened during a state mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    GeneratorPurchased { key: String, count: u64 },
    UpgradePurchased { id: String },
    AchievementUnlocked { id: String },
    /// Lifetime curds crossed another power-of-ten milestone.
    MilestoneReached { milestone: u32 },
    HeroRecruited { id: String },
    HeroTrained { id: String, level: u32 },
    PartyChanged,
    PrestigeUpgradePurchased { id: String },
    Aged { rennet_gained: Amount },
    OfflineApplied { earned: Amount, seconds_away: Seconds },
}

/// Handle for unregistering a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Minimal publish/subscribe channel. Listeners are passive: they observe
/// events, they cannot mutate game state through the bus.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriberId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; returns a handle for [`unsubscribe`].
    ///
    /// [`unsubscribe`]: EventBus::unsubscribe
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Unknown handles are a no-op.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.listeners.retain(|(sid, _)| *sid != id);
    }

    /// Deliver a batch of events, in order, to every listener.
    pub fn publish(&mut self, events: &[GameEvent]) {
        for event in events {
            for (_, listener) in &mut self.listeners {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_receive_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut bus = EventBus::new();
        bus.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let events = vec![
            GameEvent::PartyChanged,
            GameEvent::AchievementUnlocked { id: "first-curd".into() },
        ];
        bus.publish(&events);
        assert_eq!(*seen.borrow(), events);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&count);
        let mut bus = EventBus::new();
        let id = bus.subscribe(move |_| *sink.borrow_mut() += 1);

        bus.publish(&[GameEvent::PartyChanged]);
        bus.unsubscribe(id);
        bus.publish(&[GameEvent::PartyChanged]);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }
}
