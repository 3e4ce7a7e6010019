use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    AggregateId, EventEnvelope, EventStoreError, ExpectedVersion, Result, Version,
    store::{EventStore, EventStream, validate_batch},
};

#[derive(Default)]
struct Log {
    /// Every event in append order.
    events: Vec<EventEnvelope>,
    /// Indexes into `events`, per stream, in version order.
    streams: HashMap<AggregateId, Vec<usize>>,
}

impl Log {
    fn version_of(&self, stream_id: AggregateId) -> Version {
        self.streams
            .get(&stream_id)
            .and_then(|indexes| indexes.last())
            .map(|&index| self.events[index].version)
            .unwrap_or_else(Version::initial)
    }
}

/// In-memory event store.
///
/// Cloning shares the underlying log, so a store handed to a command handler
/// and to a projection processor observes the same events.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    log: Arc<RwLock<Log>>,
}

impl InMemoryEventStore {
    /// Creates a new empty in-memory event store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored.
    pub async fn event_count(&self) -> usize {
        self.log.read().await.events.len()
    }

    /// Appends raw envelopes without any checks.
    ///
    /// Used to seed histories that contain events this build does not
    /// recognise, or to simulate redelivery.
    pub async fn seed(&self, events: Vec<EventEnvelope>) {
        let mut log = self.log.write().await;
        for event in events {
            let index = log.events.len();
            log.streams.entry(event.stream_id).or_default().push(index);
            log.events.push(event);
        }
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(
        &self,
        events: Vec<EventEnvelope>,
        expected: ExpectedVersion,
    ) -> Result<Version> {
        validate_batch(&events)?;

        let stream_id = events[0].stream_id;
        let mut log = self.log.write().await;
        let current = log.version_of(stream_id);

        if !expected.matches(current) || events[0].version != current.next() {
            metrics::counter!("event_store_append_conflicts").increment(1);
            tracing::debug!(%stream_id, %expected, %current, "append rejected");
            return Err(EventStoreError::ConcurrencyConflict {
                stream_id,
                expected,
                actual: current,
            });
        }

        let last_version = events
            .last()
            .map(|e| e.version)
            .unwrap_or_else(Version::initial);
        let count = events.len();

        for event in events {
            let index = log.events.len();
            log.streams.entry(stream_id).or_default().push(index);
            log.events.push(event);
        }

        metrics::counter!("event_store_events_appended").increment(count as u64);
        Ok(last_version)
    }

    async fn load_stream(&self, stream_id: AggregateId) -> Result<Vec<EventEnvelope>> {
        self.load_stream_from(stream_id, Version::initial()).await
    }

    async fn load_stream_from(
        &self,
        stream_id: AggregateId,
        from: Version,
    ) -> Result<Vec<EventEnvelope>> {
        let log = self.log.read().await;
        let mut events: Vec<_> = log
            .streams
            .get(&stream_id)
            .map(|indexes| {
                indexes
                    .iter()
                    .map(|&index| &log.events[index])
                    .filter(|e| e.version >= from)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        events.sort_by_key(|e| e.version);
        Ok(events)
    }

    async fn stream_version(&self, stream_id: AggregateId) -> Result<Version> {
        Ok(self.log.read().await.version_of(stream_id))
    }

    async fn events_by_type(&self, event_type: &str) -> Result<Vec<EventEnvelope>> {
        let log = self.log.read().await;
        Ok(log
            .events
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect())
    }

    async fn stream_all(&self) -> Result<EventStream> {
        use futures_util::stream;

        let events = self.log.read().await.events.clone();
        Ok(Box::pin(stream::iter(events.into_iter().map(Ok))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventStoreExt;

    fn create_test_event(stream_id: AggregateId, version: i64, event_type: &str) -> EventEnvelope {
        EventEnvelope::builder()
            .stream_id(stream_id)
            .aggregate_type("ProsecutionCase")
            .event_type(event_type)
            .version(Version::new(version))
            .payload_raw(serde_json::json!({"test": true}))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn append_to_new_stream() {
        let store = InMemoryEventStore::new();
        let stream_id = AggregateId::new();

        let version = store
            .append(
                vec![create_test_event(stream_id, 1, "ProsecutionCaseCreated")],
                ExpectedVersion::NoStream,
            )
            .await
            .unwrap();

        assert_eq!(version, Version::first());
        assert_eq!(store.load_stream(stream_id).await.unwrap().len(), 1);
        assert!(store.stream_exists(stream_id).await.unwrap());
    }

    #[tokio::test]
    async fn append_batch_returns_last_version() {
        let store = InMemoryEventStore::new();
        let stream_id = AggregateId::new();

        let events = vec![
            create_test_event(stream_id, 1, "Event1"),
            create_test_event(stream_id, 2, "Event2"),
            create_test_event(stream_id, 3, "Event3"),
        ];

        let version = store.append(events, ExpectedVersion::NoStream).await.unwrap();
        assert_eq!(version, Version::new(3));
        assert_eq!(
            store.stream_version(stream_id).await.unwrap(),
            Version::new(3)
        );
    }

    #[tokio::test]
    async fn stale_writer_gets_conflict() {
        let store = InMemoryEventStore::new();
        let stream_id = AggregateId::new();

        store
            .append(
                vec![create_test_event(stream_id, 1, "Event1")],
                ExpectedVersion::NoStream,
            )
            .await
            .unwrap();

        let result = store
            .append(
                vec![create_test_event(stream_id, 1, "Event1")],
                ExpectedVersion::NoStream,
            )
            .await;

        match result {
            Err(EventStoreError::ConcurrencyConflict { actual, .. }) => {
                assert_eq!(actual, Version::first());
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(store.event_count().await, 1);
    }

    #[tokio::test]
    async fn version_gap_is_a_conflict_even_without_expectation() {
        let store = InMemoryEventStore::new();
        let stream_id = AggregateId::new();

        let result = store
            .append(
                vec![create_test_event(stream_id, 5, "Event5")],
                ExpectedVersion::Any,
            )
            .await;

        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn load_stream_from_version() {
        let store = InMemoryEventStore::new();
        let stream_id = AggregateId::new();

        let events = vec![
            create_test_event(stream_id, 1, "Event1"),
            create_test_event(stream_id, 2, "Event2"),
            create_test_event(stream_id, 3, "Event3"),
        ];
        store.append(events, ExpectedVersion::Any).await.unwrap();

        let from_v2 = store
            .load_stream_from(stream_id, Version::new(2))
            .await
            .unwrap();
        assert_eq!(from_v2.len(), 2);
        assert_eq!(from_v2[0].version, Version::new(2));
        assert_eq!(from_v2[1].version, Version::new(3));
    }

    #[tokio::test]
    async fn streams_are_isolated() {
        let store = InMemoryEventStore::new();
        let first = AggregateId::new();
        let second = AggregateId::new();

        store
            .append(
                vec![create_test_event(first, 1, "HearingInitiated")],
                ExpectedVersion::NoStream,
            )
            .await
            .unwrap();
        store
            .append(
                vec![create_test_event(second, 1, "HearingInitiated")],
                ExpectedVersion::NoStream,
            )
            .await
            .unwrap();

        assert_eq!(store.load_stream(first).await.unwrap().len(), 1);
        assert_eq!(
            store.events_by_type("HearingInitiated").await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn stream_all_preserves_append_order() {
        use futures_util::StreamExt;

        let store = InMemoryEventStore::new();
        let first = AggregateId::new();
        let second = AggregateId::new();

        store
            .append(
                vec![create_test_event(first, 1, "A")],
                ExpectedVersion::Any,
            )
            .await
            .unwrap();
        store
            .append(
                vec![create_test_event(second, 1, "B")],
                ExpectedVersion::Any,
            )
            .await
            .unwrap();

        let stream = store.stream_all().await.unwrap();
        let types: Vec<String> = stream
            .map(|e| e.unwrap().event_type)
            .collect()
            .await;
        assert_eq!(types, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn seed_bypasses_checks() {
        let store = InMemoryEventStore::new();
        let stream_id = AggregateId::new();

        store
            .seed(vec![
                create_test_event(stream_id, 1, "Event1"),
                create_test_event(stream_id, 1, "Event1"),
            ])
            .await;

        assert_eq!(store.load_stream(stream_id).await.unwrap().len(), 2);
    }
}
