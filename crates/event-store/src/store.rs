use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::{AggregateId, EventEnvelope, EventStoreError, ExpectedVersion, Result, Version};

/// A stream of events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<EventEnvelope>> + Send>>;

/// The event-store collaborator.
///
/// Streams are totally ordered by version; nothing is promised about the
/// relative order of events in different streams. Implementations report
/// concurrency conflicts and never retry on the caller's behalf.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends a batch of events to one stream.
    ///
    /// The batch is atomic. When `expected` does not match the stream's
    /// current version the call fails with `ConcurrencyConflict` and nothing
    /// is written. Returns the stream version after the append.
    async fn append(&self, events: Vec<EventEnvelope>, expected: ExpectedVersion)
    -> Result<Version>;

    /// Loads every event of a stream in version order.
    async fn load_stream(&self, stream_id: AggregateId) -> Result<Vec<EventEnvelope>>;

    /// Loads the events of a stream with version greater than or equal to `from`.
    async fn load_stream_from(
        &self,
        stream_id: AggregateId,
        from: Version,
    ) -> Result<Vec<EventEnvelope>>;

    /// Returns the current version of a stream, `Version::initial()` when empty.
    async fn stream_version(&self, stream_id: AggregateId) -> Result<Version>;

    /// Retrieves every event with the given type name, across streams.
    async fn events_by_type(&self, event_type: &str) -> Result<Vec<EventEnvelope>>;

    /// Streams all events in the order they were appended.
    async fn stream_all(&self) -> Result<EventStream>;
}

/// Extension trait providing convenience methods for event stores.
#[async_trait]
pub trait EventStoreExt: EventStore {
    /// Appends a single event.
    async fn append_event(
        &self,
        event: EventEnvelope,
        expected: ExpectedVersion,
    ) -> Result<Version> {
        self.append(vec![event], expected).await
    }

    /// Checks if a stream has any events.
    async fn stream_exists(&self, stream_id: AggregateId) -> Result<bool> {
        Ok(self.stream_version(stream_id).await? > Version::initial())
    }
}

impl<T: EventStore + ?Sized> EventStoreExt for T {}

/// Checks that an append batch is non-empty, targets a single stream and
/// carries consecutive versions.
pub fn validate_batch(events: &[EventEnvelope]) -> Result<()> {
    let Some(first) = events.first() else {
        return Err(EventStoreError::InvalidAppend(
            "cannot append an empty batch".to_string(),
        ));
    };

    let mut expected_version = first.version;
    for event in events.iter().skip(1) {
        if event.stream_id != first.stream_id {
            return Err(EventStoreError::InvalidAppend(
                "all events in a batch must target the same stream".to_string(),
            ));
        }
        expected_version = expected_version.next();
        if event.version != expected_version {
            return Err(EventStoreError::InvalidAppend(format!(
                "versions must be consecutive: expected {}, got {}",
                expected_version, event.version
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(stream_id: AggregateId, version: i64) -> EventEnvelope {
        EventEnvelope::builder()
            .stream_id(stream_id)
            .aggregate_type("Test")
            .event_type("Tested")
            .version(Version::new(version))
            .payload_raw(serde_json::json!({}))
            .build()
            .unwrap()
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(
            validate_batch(&[]),
            Err(EventStoreError::InvalidAppend(_))
        ));
    }

    #[test]
    fn mixed_streams_are_rejected() {
        let batch = [envelope(AggregateId::new(), 1), envelope(AggregateId::new(), 2)];
        assert!(validate_batch(&batch).is_err());
    }

    #[test]
    fn gapped_versions_are_rejected() {
        let id = AggregateId::new();
        let batch = [envelope(id, 1), envelope(id, 3)];
        assert!(validate_batch(&batch).is_err());
    }

    #[test]
    fn consecutive_batch_is_accepted() {
        let id = AggregateId::new();
        let batch = [envelope(id, 4), envelope(id, 5), envelope(id, 6)];
        assert!(validate_batch(&batch).is_ok());
    }
}
