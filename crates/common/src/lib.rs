//! Shared building blocks for the case progression engine.
//!
//! - Strongly typed identifiers for streams and nested entities
//! - [`EngineConfig`] loaded from the environment
//! - Tracing subscriber initialisation

pub mod config;
pub mod telemetry;
pub mod types;

pub use config::{EngineConfig, LogFormat};
pub use telemetry::{init_test_tracing, init_tracing};
pub use types::{
    AggregateId, ApplicationId, CaseId, CourtCentreId, DefendantId, EventId, GroupId, HearingId,
    OffenceId, OrganisationId, ReportingRestrictionId,
};
