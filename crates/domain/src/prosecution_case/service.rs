//! Prosecution case service.

use common::EngineConfig;
use event_store::EventStore;

use crate::command::{CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{
    AssociateDefenceOrganisation, CaseAggregate, CreateProsecutionCase,
    DisassociateDefenceOrganisation, EjectCase, ProsecutionCaseError, RecordLaaReferenceForOffence,
};

impl From<ProsecutionCaseError> for DomainError {
    fn from(e: ProsecutionCaseError) -> Self {
        DomainError::ProsecutionCase(e)
    }
}

/// Service for managing prosecution cases.
pub struct ProsecutionCaseService<S: EventStore> {
    handler: CommandHandler<S, CaseAggregate>,
}

impl<S: EventStore> ProsecutionCaseService<S> {
    /// Creates a new service with the default configuration.
    pub fn new(store: S) -> Self {
        Self {
            handler: CommandHandler::new(store),
        }
    }

    /// Creates a new service configured from `config`.
    pub fn with_config(store: S, config: &EngineConfig) -> Self {
        Self {
            handler: CommandHandler::with_config(store, config),
        }
    }

    /// Returns a reference to the underlying command handler.
    pub fn handler(&self) -> &CommandHandler<S, CaseAggregate> {
        &self.handler
    }

    #[tracing::instrument(skip(self, cmd), fields(case_id = %cmd.prosecution_case.id))]
    pub async fn create_case(
        &self,
        cmd: CreateProsecutionCase,
    ) -> Result<CommandResult<CaseAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    /// Records an LAA decision, cascading to the defendant's representation.
    #[tracing::instrument(skip(self, cmd), fields(case_id = %cmd.case_id, offence_id = %cmd.offence_id))]
    pub async fn record_laa_reference(
        &self,
        cmd: RecordLaaReferenceForOffence,
    ) -> Result<CommandResult<CaseAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn associate_defence_organisation(
        &self,
        cmd: AssociateDefenceOrganisation,
    ) -> Result<CommandResult<CaseAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn disassociate_defence_organisation(
        &self,
        cmd: DisassociateDefenceOrganisation,
    ) -> Result<CommandResult<CaseAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn eject_case(
        &self,
        cmd: EjectCase,
    ) -> Result<CommandResult<CaseAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }
}
