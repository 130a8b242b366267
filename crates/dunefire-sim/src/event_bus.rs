//! Topic-keyed publish/subscribe for domain events.
//!
//! Publishing only queues. The orchestrator calls `dispatch` once per tick,
//! after all systems have run, so subscribers always see a complete and
//! consistent frame. Delivery is in publish order; within one event,
//! subscribers are called in subscription order.

use std::collections::BTreeMap;

use dunefire_core::events::{EventTopic, GameEvent};

/// Receives events for the topics it was subscribed to.
pub trait Subscriber {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> Subscriber for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Returned by `subscribe`; hand it back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    subscribers: BTreeMap<EventTopic, Vec<(SubscriptionId, Box<dyn Subscriber>)>>,
    queue: Vec<GameEvent>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, topic: EventTopic, subscriber: Box<dyn Subscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers
            .entry(topic)
            .or_default()
            .push((id, subscriber));
        id
    }

    /// Remove a subscription and give the subscriber back.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<Box<dyn Subscriber>> {
        for list in self.subscribers.values_mut() {
            if let Some(index) = list.iter().position(|(sid, _)| *sid == id) {
                return Some(list.remove(index).1);
            }
        }
        None
    }

    pub fn publish(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    /// Deliver everything queued and hand the drained events back.
    pub fn dispatch(&mut self) -> Vec<GameEvent> {
        let events = std::mem::take(&mut self.queue);
        for event in &events {
            if let Some(list) = self.subscribers.get_mut(&event.topic()) {
                for (_, subscriber) in list.iter_mut() {
                    subscriber.on_event(event);
                }
            }
        }
        events
    }

    /// Drop queued events. Subscriptions stay.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn subscriber_count(&self, topic: EventTopic) -> usize {
        self.subscribers.get(&topic).map_or(0, Vec::len)
    }
}
