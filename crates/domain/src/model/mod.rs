//! Value types shared between aggregates and projections.

mod application;
mod case;
mod legal_aid;

pub use application::{ApplicationStatus, CourtApplication};
pub use case::{
    CaseStatus, DefenceOrganisation, Defendant, Offence, ProsecutionCase, ReportingRestriction,
};
pub use legal_aid::{LaaReference, LegalAidStatus};
