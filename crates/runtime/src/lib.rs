//! Runtime orchestration for the light/shadow simulation.
//!
//! This crate wires the deterministic [`shadow_core::Simulation`] to a
//! persistence medium, a topic-based event bus and logging. Consumers embed a
//! [`Session`], feed it one [`shadow_core::InputSnapshot`] per frame and
//! subscribe to the topics they render.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session and its builder
//! - [`events`] provides the topic-based event bus
//! - [`repository`] provides durable key-value storage for saves
//! - [`logging`] installs the tracing subscriber
pub mod error;
pub mod events;
pub mod logging;
pub mod repository;
pub mod session;

pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use repository::{FileStorage, MemoryStorage, RepositoryError};
pub use session::{RuntimeConfig, Session, SessionBuilder};
