use common::EngineConfig;
use event_store::EventStore;

use crate::command::{CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{ExtendHearing, HearingAggregate, HearingError, InitiateHearing};

impl From<HearingError> for DomainError {
    fn from(e: HearingError) -> Self {
        DomainError::Hearing(e)
    }
}

/// Service for managing hearings.
pub struct HearingService<S: EventStore> {
    handler: CommandHandler<S, HearingAggregate>,
}

impl<S: EventStore> HearingService<S> {
    pub fn new(store: S) -> Self {
        Self {
            handler: CommandHandler::new(store),
        }
    }

    pub fn with_config(store: S, config: &EngineConfig) -> Self {
        Self {
            handler: CommandHandler::with_config(store, config),
        }
    }

    pub fn handler(&self) -> &CommandHandler<S, HearingAggregate> {
        &self.handler
    }

    #[tracing::instrument(skip(self, cmd), fields(hearing_id = %cmd.hearing.id))]
    pub async fn initiate(
        &self,
        cmd: InitiateHearing,
    ) -> Result<CommandResult<HearingAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self, cmd), fields(hearing_id = %cmd.hearing_id))]
    pub async fn extend(
        &self,
        cmd: ExtendHearing,
    ) -> Result<CommandResult<HearingAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }
}
