//! Domain layer for the case progression engine.
//!
//! This crate provides the core domain abstractions including:
//! - Aggregate trait, pure reconstitution and replay of stored streams
//! - DomainEvent trait for domain events
//! - Command trait and CommandHandler with optimistic-concurrency retries
//! - The prosecution case, group case, hearing, case progression and court
//!   application aggregates

pub mod aggregate;
pub mod application;
pub mod case_progression;
pub mod command;
pub mod error;
pub mod group_case;
pub mod hearing;
pub mod model;
pub mod prosecution_case;

pub use aggregate::{Aggregate, DomainEvent, reconstitute, replay};
pub use application::{
    ApplicationAggregate, ApplicationError, ApplicationEvent, ApplicationService,
    ChangeApplicationStatus, InitiateCourtApplicationProceedings, ProceedingsRequest,
};
pub use case_progression::{
    AddCaseToCrownCourt, AddDefendant, CaseProgressionAggregate, CaseProgressionError,
    CaseProgressionEvent, CaseProgressionService, CompleteSendingSheet, InvalidationReason,
    RemoveDefendant, SendingSheet,
};
pub use command::{Command, CommandHandler, CommandResult};
pub use error::DomainError;
pub use group_case::{
    AddCaseToGroup, GroupCaseAggregate, GroupCaseError, GroupCaseEvent, GroupCaseService,
    GroupMember, RegisterGroupCases, RemoveCaseFromGroup,
};
pub use hearing::{
    ExtendHearing, Hearing, HearingAggregate, HearingDay, HearingError, HearingEvent,
    HearingExtension, HearingService, InitiateHearing,
};
pub use model::{
    ApplicationStatus, CaseStatus, CourtApplication, DefenceOrganisation, Defendant,
    LaaReference, LegalAidStatus, Offence, ProsecutionCase, ReportingRestriction,
};
pub use prosecution_case::{
    AssociateDefenceOrganisation, CaseAggregate, CreateProsecutionCase,
    DisassociateDefenceOrganisation, EjectCase, ProsecutionCaseError, ProsecutionCaseEvent,
    ProsecutionCaseService, RecordLaaReferenceForOffence,
};
