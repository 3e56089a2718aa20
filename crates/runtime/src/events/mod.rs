//! Topic-based event bus for simulation events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they render.

mod bus;

pub use bus::{Event, EventBus, Topic};
