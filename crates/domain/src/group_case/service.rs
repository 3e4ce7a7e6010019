use common::EngineConfig;
use event_store::EventStore;

use crate::command::{CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{
    AddCaseToGroup, GroupCaseAggregate, GroupCaseError, RegisterGroupCases, RemoveCaseFromGroup,
};

impl From<GroupCaseError> for DomainError {
    fn from(e: GroupCaseError) -> Self {
        DomainError::GroupCase(e)
    }
}

/// Service for managing group cases.
pub struct GroupCaseService<S: EventStore> {
    handler: CommandHandler<S, GroupCaseAggregate>,
}

impl<S: EventStore> GroupCaseService<S> {
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

    pub fn handler(&self) -> &CommandHandler<S, GroupCaseAggregate> {
        &self.handler
    }

    #[tracing::instrument(skip(self))]
    pub async fn register(
        &self,
        cmd: RegisterGroupCases,
    ) -> Result<CommandResult<GroupCaseAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_case(
        &self,
        cmd: AddCaseToGroup,
    ) -> Result<CommandResult<GroupCaseAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_case(
        &self,
        cmd: RemoveCaseFromGroup,
    ) -> Result<CommandResult<GroupCaseAggregate>, DomainError> {
        self.handler.dispatch(&cmd).await
    }
}
