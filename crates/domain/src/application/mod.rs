//! Court application aggregate: idempotent initiation of proceedings.

mod aggregate;
mod commands;
mod events;
mod service;

pub use aggregate::ApplicationAggregate;
pub use commands::*;
pub use events::{
    ApplicationEvent, CourtApplicationProceedingsInitiateIgnoredData,
    CourtApplicationProceedingsInitiatedData, CourtApplicationStatusChangedData,
};
pub use service::ApplicationService;

use common::ApplicationId;
use thiserror::Error;

/// Errors that can occur during court application operations.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Application reference is required")]
    ReferenceRequired,

    #[error("Application {application_id} is finalised")]
    AlreadyFinalised { application_id: ApplicationId },
}
