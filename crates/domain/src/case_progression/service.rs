use common::EngineConfig;
use event_store::EventStore;

use crate::command::{CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{
    AddCaseToCrownCourt, AddDefendant, CaseProgressionAggregate, CaseProgressionError,
    CompleteSendingSheet, RemoveDefendant,
};

impl From<CaseProgressionError> for DomainError {
    fn from(e: CaseProgressionError) -> Self {
        DomainError::CaseProgression(e)
    }
}

/// Service for progressing cases to the Crown Court.
pub struct CaseProgressionService<S: EventStore> {
    handler: CommandHandler<S, CaseProgressionAggregate>,
}

impl<S: EventStore> CaseProgressionService<S> {
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

    pub fn handler(&self) -> &CommandHandler<S, CaseProgressionAggregate> {
        &self.handler
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_case_to_crown_court(
        &self,
        cmd: AddCaseToCrownCourt,
    ) -> Result<CommandResult<CaseProgressionAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_defendant(
        &self,
        cmd: AddDefendant,
    ) -> Result<CommandResult<CaseProgressionAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_defendant(
        &self,
        cmd: RemoveDefendant,
    ) -> Result<CommandResult<CaseProgressionAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self, cmd), fields(case_id = %cmd.sending_sheet.case_id))]
    pub async fn complete_sending_sheet(
        &self,
        cmd: CompleteSendingSheet,
    ) -> Result<CommandResult<CaseProgressionAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }
}
