//! Domain error types.

use event_store::EventStoreError;
use thiserror::Error;

use crate::application::ApplicationError;
use crate::case_progression::CaseProgressionError;
use crate::group_case::GroupCaseError;
use crate::hearing::HearingError;
use crate::prosecution_case::ProsecutionCaseError;

/// Errors that can occur during domain operations.
///
/// Commands that find nothing to do are not errors: they succeed with an
/// empty event list.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the event store.
    ///
    /// A `ConcurrencyConflict` here means the handler ran out of retries.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// A prosecution case command was rejected.
    #[error("Prosecution case error: {0}")]
    ProsecutionCase(ProsecutionCaseError),

    /// A group case command was rejected.
    #[error("Group case error: {0}")]
    GroupCase(GroupCaseError),

    /// A hearing command was rejected.
    #[error("Hearing error: {0}")]
    Hearing(HearingError),

    /// A case progression command was rejected.
    #[error("Case progression error: {0}")]
    CaseProgression(CaseProgressionError),

    /// A court application command was rejected.
    #[error("Court application error: {0}")]
    Application(ApplicationError),

    /// A stored payload of a recognised type could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Returns true if the command lost an optimistic concurrency race on
    /// every attempt.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::EventStore(e) if e.is_conflict())
    }
}
