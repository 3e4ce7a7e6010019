//! Aggregate and domain event traits, plus the replay engine.

use common::AggregateId;
use event_store::{EventEnvelope, Version};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::DomainError;

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Every event type name this enum can decode.
    ///
    /// Stored events with any other type name are skipped during replay.
    const EVENT_TYPES: &'static [&'static str];

    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns true if envelopes of `event_type` decode into this enum.
    fn recognises(event_type: &str) -> bool {
        Self::EVENT_TYPES.contains(&event_type)
    }
}

/// Trait for aggregates in an event-sourced system.
///
/// In event sourcing, aggregates:
/// - Are rebuilt from an empty state by replaying their stream
/// - Decide which events a command produces without mutating themselves
/// - Apply events to update state (pure, deterministic, infallible)
pub trait Aggregate: Default + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// The type of errors this aggregate's commands can produce.
    type Error: std::error::Error + Send + Sync;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the stream this aggregate was created on.
    ///
    /// Returns None until the aggregate's creation event has been applied.
    fn id(&self) -> Option<AggregateId>;

    /// Returns the version of the last replayed event.
    fn version(&self) -> Version;

    /// Sets the aggregate version.
    fn set_version(&mut self, version: Version);

    /// Applies an event to the aggregate, updating its state.
    ///
    /// Given the same state and event this must always produce the same new
    /// state, must not have side effects, and must not fail.
    fn apply(&mut self, event: Self::Event);

    /// Consumes the state and returns the state after `event`.
    fn applied(mut self, event: Self::Event) -> Self {
        self.apply(event);
        self
    }

    /// Applies multiple events in sequence.
    fn apply_events(&mut self, events: impl IntoIterator<Item = Self::Event>) {
        for event in events {
            self.apply(event);
        }
    }
}

/// Folds a sequence of typed events over the empty state.
///
/// The version advances by one per event, so the result matches what
/// [`replay`] would produce for the same events stored from version 1.
pub fn reconstitute<A: Aggregate>(events: impl IntoIterator<Item = A::Event>) -> A {
    events.into_iter().fold(A::default(), |state, event| {
        let next_version = state.version().next();
        let mut state = state.applied(event);
        state.set_version(next_version);
        state
    })
}

/// Rebuilds an aggregate from stored envelopes in stream order.
///
/// Envelopes whose type the aggregate does not recognise are skipped, but
/// still advance the version: they occupy positions in the stream and the
/// next append must expect them.
pub fn replay<A: Aggregate>(
    envelopes: impl IntoIterator<Item = EventEnvelope>,
) -> Result<A, DomainError> {
    let mut aggregate = A::default();

    for envelope in envelopes {
        if A::Event::recognises(&envelope.event_type) {
            let event: A::Event = serde_json::from_value(envelope.payload)?;
            aggregate.apply(event);
        } else {
            tracing::debug!(
                aggregate_type = A::aggregate_type(),
                event_type = %envelope.event_type,
                version = %envelope.version,
                "skipping unrecognised event"
            );
        }
        aggregate.set_version(envelope.version);
    }

    Ok(aggregate)
}
