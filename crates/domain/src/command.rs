//! Command handling infrastructure.

use std::marker::PhantomData;

use common::{AggregateId, EngineConfig};
use event_store::{EventEnvelope, EventMetadata, EventStore, ExpectedVersion, Version};

use crate::aggregate::{self, Aggregate, DomainEvent};
use crate::error::DomainError;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult<A: Aggregate> {
    /// The aggregate after applying the new events.
    pub aggregate: A,

    /// The events that were generated and persisted.
    pub events: Vec<A::Event>,

    /// The new version of the aggregate after the command.
    pub new_version: Version,
}

impl<A: Aggregate> CommandResult<A> {
    /// Returns the type names of the emitted events, in order.
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.iter().map(DomainEvent::event_type).collect()
    }
}

/// Trait for commands that can be executed against an aggregate.
///
/// Handling is a pure function of the current state: it may be called more
/// than once when the append loses a concurrency race, so it must not have
/// side effects.
pub trait Command: Send + Sync {
    /// The type of aggregate this command targets.
    type Aggregate: Aggregate;

    /// Returns the ID of the aggregate this command targets.
    fn aggregate_id(&self) -> AggregateId;

    /// Decides which events the command produces against `aggregate`.
    ///
    /// An empty list means there is nothing to do.
    fn handle(
        &self,
        aggregate: &Self::Aggregate,
    ) -> Result<Vec<<Self::Aggregate as Aggregate>::Event>, <Self::Aggregate as Aggregate>::Error>;
}

/// Handler for executing commands against aggregates.
///
/// The handler is responsible for:
/// 1. Replaying the aggregate's stream
/// 2. Running the command to produce events
/// 3. Appending the events under the version it read
/// 4. Re-reading and re-running the command when the append conflicts
pub struct CommandHandler<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    store: S,
    conflict_retries: u32,
    _phantom: PhantomData<A>,
}

impl<S, A> CommandHandler<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    /// Creates a new command handler with the default retry budget.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &EngineConfig::default())
    }

    /// Creates a new command handler configured from `config`.
    pub fn with_config(store: S, config: &EngineConfig) -> Self {
        Self {
            store,
            conflict_retries: config.conflict_retries,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying event store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads an aggregate from the event store.
    ///
    /// If the stream is empty, returns a default instance.
    pub async fn load(&self, aggregate_id: AggregateId) -> Result<A, DomainError> {
        let events = self.store.load_stream(aggregate_id).await?;
        aggregate::replay(events)
    }

    /// Loads an aggregate, returning None if it hasn't been created.
    pub async fn load_existing(&self, aggregate_id: AggregateId) -> Result<Option<A>, DomainError> {
        let aggregate = self.load(aggregate_id).await?;
        if aggregate.id().is_some() {
            Ok(Some(aggregate))
        } else {
            Ok(None)
        }
    }

    /// Handles a command and persists the resulting events.
    pub async fn dispatch<C>(&self, command: &C) -> Result<CommandResult<A>, DomainError>
    where
        C: Command<Aggregate = A>,
        DomainError: From<A::Error>,
    {
        self.execute(command.aggregate_id(), |aggregate| command.handle(aggregate))
            .await
    }

    /// Handles a command, stamping every stored event with `metadata`.
    pub async fn dispatch_with_metadata<C>(
        &self,
        command: &C,
        metadata: EventMetadata,
    ) -> Result<CommandResult<A>, DomainError>
    where
        C: Command<Aggregate = A>,
        DomainError: From<A::Error>,
    {
        self.execute_with_metadata(command.aggregate_id(), metadata, |aggregate| {
            command.handle(aggregate)
        })
        .await
    }

    /// Executes a command and persists the resulting events.
    ///
    /// The command function receives the current aggregate state and returns
    /// either a list of events to apply, or an error.
    pub async fn execute<F>(
        &self,
        aggregate_id: AggregateId,
        command_fn: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        F: Fn(&A) -> Result<Vec<A::Event>, A::Error>,
        DomainError: From<A::Error>,
    {
        self.execute_with_metadata(aggregate_id, EventMetadata::default(), command_fn)
            .await
    }

    /// Executes a command, retrying from a fresh read on concurrency
    /// conflicts until the configured budget is spent.
    pub async fn execute_with_metadata<F>(
        &self,
        aggregate_id: AggregateId,
        metadata: EventMetadata,
        command_fn: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        F: Fn(&A) -> Result<Vec<A::Event>, A::Error>,
        DomainError: From<A::Error>,
    {
        let mut attempt = 0;

        loop {
            let mut aggregate = self.load(aggregate_id).await?;
            let current_version = aggregate.version();

            let events = command_fn(&aggregate)?;

            if events.is_empty() {
                tracing::debug!(
                    aggregate_type = A::aggregate_type(),
                    %aggregate_id,
                    "command produced no events"
                );
                return Ok(CommandResult {
                    aggregate,
                    events: vec![],
                    new_version: current_version,
                });
            }

            let envelopes =
                self.build_envelopes(aggregate_id, current_version, &events, &metadata)?;

            match self
                .store
                .append(envelopes, ExpectedVersion::after_reading(current_version))
                .await
            {
                Ok(new_version) => {
                    for event in &events {
                        aggregate.apply(event.clone());
                    }
                    aggregate.set_version(new_version);

                    metrics::counter!("commands_executed", "aggregate" => A::aggregate_type())
                        .increment(1);
                    metrics::counter!("events_appended", "aggregate" => A::aggregate_type())
                        .increment(events.len() as u64);

                    return Ok(CommandResult {
                        aggregate,
                        events,
                        new_version,
                    });
                }
                Err(e) if e.is_conflict() && attempt < self.conflict_retries => {
                    attempt += 1;
                    metrics::counter!("append_conflicts", "aggregate" => A::aggregate_type())
                        .increment(1);
                    tracing::warn!(
                        aggregate_type = A::aggregate_type(),
                        %aggregate_id,
                        attempt,
                        "append conflicted, re-reading stream"
                    );
                }
                Err(e) => {
                    if e.is_conflict() {
                        metrics::counter!("append_conflicts", "aggregate" => A::aggregate_type())
                            .increment(1);
                        tracing::warn!(
                            aggregate_type = A::aggregate_type(),
                            %aggregate_id,
                            retries = self.conflict_retries,
                            "giving up after repeated conflicts"
                        );
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Builds event envelopes from domain events.
    fn build_envelopes(
        &self,
        aggregate_id: AggregateId,
        current_version: Version,
        events: &[A::Event],
        metadata: &EventMetadata,
    ) -> Result<Vec<EventEnvelope>, DomainError> {
        let mut envelopes = Vec::with_capacity(events.len());
        let mut version = current_version;

        for event in events {
            version = version.next();
            let envelope = EventEnvelope::builder()
                .stream_id(aggregate_id)
                .aggregate_type(A::aggregate_type())
                .event_type(event.event_type())
                .version(version)
                .metadata(metadata.clone())
                .payload(event)?
                .build()?;
            envelopes.push(envelope);
        }

        Ok(envelopes)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use event_store::{EventStoreExt, EventStream, InMemoryEventStore};
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(tag = "type", content = "data")]
    enum TestEvent {
        TestCreated { id: AggregateId, name: String },
        TestUpdated { value: i32 },
    }

    impl DomainEvent for TestEvent {
        const EVENT_TYPES: &'static [&'static str] = &["TestCreated", "TestUpdated"];

        fn event_type(&self) -> &'static str {
            match self {
                TestEvent::TestCreated { .. } => "TestCreated",
                TestEvent::TestUpdated { .. } => "TestUpdated",
            }
        }
    }

    #[derive(Debug, Default, Clone)]
    struct TestAggregate {
        id: Option<AggregateId>,
        name: String,
        value: i32,
        version: Version,
    }

    impl Aggregate for TestAggregate {
        type Event = TestEvent;
        type Error = Infallible;

        fn aggregate_type() -> &'static str {
            "TestAggregate"
        }

        fn id(&self) -> Option<AggregateId> {
            self.id
        }

        fn version(&self) -> Version {
            self.version
        }

        fn set_version(&mut self, version: Version) {
            self.version = version;
        }

        fn apply(&mut self, event: Self::Event) {
            match event {
                TestEvent::TestCreated { id, name } => {
                    self.id = Some(id);
                    self.name = name;
                }
                TestEvent::TestUpdated { value } => {
                    self.value = value;
                }
            }
        }
    }

    impl From<Infallible> for DomainError {
        fn from(e: Infallible) -> Self {
            match e {}
        }
    }

    struct Rename {
        id: AggregateId,
        name: &'static str,
    }

    impl Command for Rename {
        type Aggregate = TestAggregate;

        fn aggregate_id(&self) -> AggregateId {
            self.id
        }

        fn handle(&self, aggregate: &TestAggregate) -> Result<Vec<TestEvent>, Infallible> {
            if aggregate.name == self.name {
                return Ok(vec![]);
            }
            Ok(vec![TestEvent::TestCreated {
                id: self.id,
                name: self.name.to_string(),
            }])
        }
    }

    /// Writes a foreign event into the target stream before each of the
    /// first `interferences` appends, so those appends lose the race.
    #[derive(Clone)]
    struct RacingStore {
        inner: InMemoryEventStore,
        interferences: Arc<AtomicUsize>,
    }

    impl RacingStore {
        fn new(interferences: usize) -> Self {
            Self {
                inner: InMemoryEventStore::new(),
                interferences: Arc::new(AtomicUsize::new(interferences)),
            }
        }
    }

    #[async_trait]
    impl EventStore for RacingStore {
        async fn append(
            &self,
            events: Vec<EventEnvelope>,
            expected: ExpectedVersion,
        ) -> event_store::Result<Version> {
            let remaining = self.interferences.load(Ordering::SeqCst);
            if remaining > 0 {
                self.interferences.store(remaining - 1, Ordering::SeqCst);
                let stream_id = events[0].stream_id;
                let version = self.inner.stream_version(stream_id).await?.next();
                let interloper = EventEnvelope::builder()
                    .stream_id(stream_id)
                    .aggregate_type("Other")
                    .event_type("SomethingElseHappened")
                    .version(version)
                    .payload_raw(serde_json::json!({}))
                    .build()?;
                self.inner.seed(vec![interloper]).await;
            }
            self.inner.append(events, expected).await
        }

        async fn load_stream(&self, stream_id: AggregateId) -> event_store::Result<Vec<EventEnvelope>> {
            self.inner.load_stream(stream_id).await
        }

        async fn load_stream_from(
            &self,
            stream_id: AggregateId,
            from: Version,
        ) -> event_store::Result<Vec<EventEnvelope>> {
            self.inner.load_stream_from(stream_id, from).await
        }

        async fn stream_version(&self, stream_id: AggregateId) -> event_store::Result<Version> {
            self.inner.stream_version(stream_id).await
        }

        async fn events_by_type(&self, event_type: &str) -> event_store::Result<Vec<EventEnvelope>> {
            self.inner.events_by_type(event_type).await
        }

        async fn stream_all(&self) -> event_store::Result<EventStream> {
            self.inner.stream_all().await
        }
    }

    #[tokio::test]
    async fn test_execute_creates_aggregate() {
        let store = InMemoryEventStore::new();
        let handler: CommandHandler<_, TestAggregate> = CommandHandler::new(store);
        let aggregate_id = AggregateId::new();

        let result = handler
            .execute(aggregate_id, |_agg| {
                Ok(vec![TestEvent::TestCreated {
                    id: aggregate_id,
                    name: "Test".to_string(),
                }])
            })
            .await
            .unwrap();

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.new_version, Version::first());
        assert_eq!(result.aggregate.id(), Some(aggregate_id));
        assert_eq!(result.aggregate.name, "Test");
        assert_eq!(result.event_types(), vec!["TestCreated"]);
    }

    #[tokio::test]
    async fn test_execute_updates_aggregate() {
        let store = InMemoryEventStore::new();
        let handler: CommandHandler<_, TestAggregate> = CommandHandler::new(store);
        let aggregate_id = AggregateId::new();

        handler
            .dispatch(&Rename {
                id: aggregate_id,
                name: "Test",
            })
            .await
            .unwrap();

        let result = handler
            .execute(aggregate_id, |_| Ok(vec![TestEvent::TestUpdated { value: 42 }]))
            .await
            .unwrap();

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.new_version, Version::new(2));
        assert_eq!(result.aggregate.value, 42);
    }

    #[tokio::test]
    async fn test_load_existing_returns_none_for_new() {
        let store = InMemoryEventStore::new();
        let handler: CommandHandler<_, TestAggregate> = CommandHandler::new(store);

        let result = handler.load_existing(AggregateId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_empty_events_returns_without_persisting() {
        let store = InMemoryEventStore::new();
        let handler: CommandHandler<_, TestAggregate> = CommandHandler::new(store.clone());
        let aggregate_id = AggregateId::new();

        let rename = Rename {
            id: aggregate_id,
            name: "Same",
        };
        handler.dispatch(&rename).await.unwrap();
        let result = handler.dispatch(&rename).await.unwrap();

        assert!(result.events.is_empty());
        assert_eq!(result.new_version, Version::first());
        assert_eq!(store.event_count().await, 1);
    }

    #[tokio::test]
    async fn test_metadata_is_stamped_on_every_event() {
        let store = InMemoryEventStore::new();
        let handler: CommandHandler<_, TestAggregate> = CommandHandler::new(store.clone());
        let aggregate_id = AggregateId::new();

        let metadata = EventMetadata {
            user_id: Some("listing-officer".to_string()),
            ..Default::default()
        };
        handler
            .dispatch_with_metadata(
                &Rename {
                    id: aggregate_id,
                    name: "Test",
                },
                metadata.clone(),
            )
            .await
            .unwrap();

        let stored = store.load_stream(aggregate_id).await.unwrap();
        assert_eq!(stored[0].metadata, metadata);
    }

    #[tokio::test]
    async fn test_conflict_is_retried_against_fresh_state() {
        let store = RacingStore::new(1);
        let handler: CommandHandler<_, TestAggregate> = CommandHandler::new(store.clone());
        let aggregate_id = AggregateId::new();

        let result = handler
            .dispatch(&Rename {
                id: aggregate_id,
                name: "Test",
            })
            .await
            .unwrap();

        assert_eq!(result.new_version, Version::new(2));
        assert_eq!(store.inner.event_count().await, 2);
    }

    #[tokio::test]
    async fn test_conflict_surfaces_once_retries_are_spent() {
        let store = RacingStore::new(10);
        let config = EngineConfig::default().with_conflict_retries(2);
        let handler: CommandHandler<_, TestAggregate> =
            CommandHandler::with_config(store.clone(), &config);

        let result = handler
            .dispatch(&Rename {
                id: AggregateId::new(),
                name: "Test",
            })
            .await;

        assert!(result.unwrap_err().is_conflict());
        // One initial attempt plus two retries, each beaten by an interloper.
        assert_eq!(store.inner.event_count().await, 3);
    }
}
