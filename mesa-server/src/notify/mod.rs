//! Realtime fan-out
//!
//! Per-topic broadcast lanes in a `DashMap` registry. Publication is
//! synchronous: a mutation returns only after its events are on the
//! lanes, so one order's events always appear in commit order. Lanes are
//! bounded; a lagging subscriber is dropped by the channel and re-reads
//! current state when it comes back.

use dashmap::DashMap;
use shared::{StreamEvent, Topic};
use tokio::sync::broadcast;
use tracing::debug;

/// The kitchen board lane is never pruned; dashboards come and go.
const KITCHEN_KEY: &str = "kitchen:all";

pub struct TopicNotifier {
    channels: DashMap<String, broadcast::Sender<StreamEvent>>,
    capacity: usize,
}

impl TopicNotifier {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
        }
    }

    /// Subscribe to one topic. The lane is created on first use; events
    /// published before that are gone (subscribers re-read state first).
    pub fn subscribe(&self, topic: &Topic) -> broadcast::Receiver<StreamEvent> {
        self.channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publish to the event's own topic; order and table events are
    /// mirrored to `kitchen:all` with the same timestamp.
    pub fn publish(&self, event: StreamEvent) {
        let mirror = (!matches!(event.topic, Topic::KitchenAll))
            .then(|| event.retopic(Topic::KitchenAll));
        self.send(event);
        if let Some(copy) = mirror {
            self.send(copy);
        }
    }

    fn send(&self, event: StreamEvent) {
        let key = event.topic.to_string();
        let Some(sender) = self.channels.get(&key) else {
            return;
        };
        match sender.send(event) {
            Ok(count) => debug!(topic = %key, subscribers = count, "Event published"),
            Err(_) => {
                // 没有订阅者, 回收通道 (kitchen:all 除外)
                drop(sender);
                if key != KITCHEN_KEY {
                    self.channels.remove_if(&key, |_, s| s.receiver_count() == 0);
                }
            }
        }
    }

    /// Number of live topic lanes
    pub fn topic_count(&self) -> usize {
        self.channels.len()
    }
}
