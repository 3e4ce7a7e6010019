//! Projection error types.

use common::{CaseId, DefendantId, HearingId};
use thiserror::Error;

/// Errors that can occur during projection processing.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] event_store::EventStoreError),

    /// Failed to deserialize an event payload.
    #[error("Event deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// No link row exists for the case, defendant and hearing.
    #[error("No link between case {case_id}, defendant {defendant_id} and hearing {hearing_id}")]
    LinkNotFound {
        case_id: CaseId,
        defendant_id: DefendantId,
        hearing_id: HearingId,
    },
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
