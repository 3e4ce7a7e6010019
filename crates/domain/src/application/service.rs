use common::EngineConfig;
use event_store::EventStore;

use crate::command::{CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{
    ApplicationAggregate, ApplicationError, ChangeApplicationStatus,
    InitiateCourtApplicationProceedings,
};

impl From<ApplicationError> for DomainError {
    fn from(e: ApplicationError) -> Self {
        DomainError::Application(e)
    }
}

/// Service for managing court applications.
pub struct ApplicationService<S: EventStore> {
    handler: CommandHandler<S, ApplicationAggregate>,
}

impl<S: EventStore> ApplicationService<S> {
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

    pub fn handler(&self) -> &CommandHandler<S, ApplicationAggregate> {
        &self.handler
    }

    /// Initiates proceedings; repeats are recorded as ignored.
    #[tracing::instrument(skip(self, cmd), fields(application_id = %cmd.request.court_application.id))]
    pub async fn initiate_proceedings(
        &self,
        cmd: InitiateCourtApplicationProceedings,
    ) -> Result<CommandResult<ApplicationAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn change_status(
        &self,
        cmd: ChangeApplicationStatus,
    ) -> Result<CommandResult<ApplicationAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }
}
