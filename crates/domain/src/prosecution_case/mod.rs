//! Prosecution case aggregate: legal aid decisions and defence representation.

mod aggregate;
mod commands;
mod events;
mod service;

pub use aggregate::CaseAggregate;
pub use commands::*;
pub use events::{
    CaseEjectedData, CaseEjectionIgnoredData, DefendantDefenceOrganisationAssociatedData,
    DefendantDefenceOrganisationChangedData, DefendantDefenceOrganisationDisassociatedData,
    DefendantLaaAssociationChangedData, DefendantLegalAidStatusUpdatedData,
    OffencesForDefendantChangedData, ProsecutionCaseCreatedData, ProsecutionCaseEvent,
    ProsecutionCaseOffencesUpdatedData,
};
pub use service::ProsecutionCaseService;

use common::{DefendantId, OrganisationId};
use thiserror::Error;

/// Errors that can occur during prosecution case operations.
#[derive(Debug, Error)]
pub enum ProsecutionCaseError {
    /// Case is already created.
    #[error("Prosecution case already created")]
    AlreadyCreated,

    /// A case needs a unique reference number.
    #[error("Prosecution case URN is required")]
    UrnRequired,

    /// The association came through a representation order.
    #[error(
        "Defence organisation {organisation_id} is locked to defendant {defendant_id} by a representation order"
    )]
    AssociationLocked {
        defendant_id: DefendantId,
        organisation_id: OrganisationId,
    },
}
