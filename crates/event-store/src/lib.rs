//! Event store collaborator for the case progression engine.
//!
//! Exposes the three things the domain needs from persistence: append a
//! batch to a named stream under an optimistic-concurrency expectation,
//! load a stream in order, and stream every event for projections.

pub mod error;
pub mod event;
pub mod memory;
pub mod store;

pub use common::{AggregateId, EventId};
pub use error::{EventStoreError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventMetadata, ExpectedVersion, Version};
pub use memory::InMemoryEventStore;
pub use store::{EventStore, EventStoreExt, EventStream};
