//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shadow_core::GameEvent;
use strum::{AsRefStr, Display, EnumCount, EnumIter};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Curse transitions
    Debt,
    /// Hits and defeats
    Combat,
    /// Quest activation and objective progress
    Quest,
    /// Hints and HUD redraw requests
    Hud,
    /// Scene exits
    World,
}

impl Topic {
    pub fn of(event: &GameEvent) -> Self {
        match event {
            GameEvent::CurseApplied { .. } | GameEvent::CurseCleared { .. } => Topic::Debt,
            GameEvent::EnemyDefeated { .. }
            | GameEvent::PlayerDamaged { .. }
            | GameEvent::ShadowDamaged { .. } => Topic::Combat,
            GameEvent::QuestProgressChanged { .. } => Topic::Quest,
            GameEvent::Hint(_) | GameEvent::HudRefresh => Topic::Hud,
            GameEvent::ExitReached { .. } => Topic::World,
        }
    }
}

/// Simulation event stamped with the frame that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub frame: u64,
    pub payload: GameEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        Topic::of(&self.payload)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; slow subscribers lag and
/// lose the oldest events.
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; Topic::COUNT]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(std::array::from_fn(|_| broadcast::channel(capacity).0)),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        &self.channels[topic as usize]
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {}", topic);
        }
    }

    /// Publish every event of one frame in order.
    pub fn publish_all(&self, frame: u64, events: impl IntoIterator<Item = GameEvent>) {
        for payload in events {
            self.publish(Event { frame, payload });
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
