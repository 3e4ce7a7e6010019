//! Hearing aggregate: listing cases and applications into sittings, and
//! extending a hearing with more of them.

mod aggregate;
mod commands;
mod events;
pub mod merge;
mod service;

pub use aggregate::HearingAggregate;
pub use commands::*;
pub use events::{HearingEvent, HearingExtendedData, HearingInitiatedData};
pub use service::HearingService;

use chrono::{DateTime, Utc};
use common::{CourtCentreId, HearingId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CourtApplication, ProsecutionCase};

/// One sitting of a hearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HearingDay {
    pub sitting_day: DateTime<Utc>,
    pub listed_duration_minutes: u32,
    #[serde(default)]
    pub listing_sequence: u32,
}

/// A hearing and everything listed into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hearing {
    pub id: HearingId,
    pub court_centre_id: CourtCentreId,
    pub hearing_type: String,
    #[serde(default)]
    pub hearing_days: Vec<HearingDay>,
    #[serde(default)]
    pub prosecution_cases: Vec<ProsecutionCase>,
    #[serde(default)]
    pub court_applications: Vec<CourtApplication>,
}

impl Hearing {
    pub fn new(id: HearingId, court_centre_id: CourtCentreId, hearing_type: impl Into<String>) -> Self {
        Self {
            id,
            court_centre_id,
            hearing_type: hearing_type.into(),
            hearing_days: Vec::new(),
            prosecution_cases: Vec::new(),
            court_applications: Vec::new(),
        }
    }

    pub fn with_case(mut self, prosecution_case: ProsecutionCase) -> Self {
        self.prosecution_cases.push(prosecution_case);
        self
    }

    pub fn with_day(mut self, day: HearingDay) -> Self {
        self.hearing_days.push(day);
        self
    }

    /// Reconciles an extension into this hearing.
    pub fn extended_with(&self, extension: &HearingExtension) -> Hearing {
        Hearing {
            hearing_days: merge::reconcile_hearing_days(&self.hearing_days, &extension.hearing_days),
            prosecution_cases: merge::reconcile_cases(
                &self.prosecution_cases,
                &extension.prosecution_cases,
            ),
            court_applications: merge::reconcile_applications(
                &self.court_applications,
                &extension.court_applications,
            ),
            ..self.clone()
        }
    }
}

/// Cases, applications and sittings to add to an existing hearing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HearingExtension {
    #[serde(default)]
    pub prosecution_cases: Vec<ProsecutionCase>,
    #[serde(default)]
    pub court_applications: Vec<CourtApplication>,
    #[serde(default)]
    pub hearing_days: Vec<HearingDay>,
    /// The unallocated hearing these cases were previously listed in.
    #[serde(default)]
    pub extended_hearing_from: Option<HearingId>,
    #[serde(default)]
    pub is_adjourned: bool,
    #[serde(default)]
    pub is_partially_allocated: bool,
}

impl HearingExtension {
    pub fn is_empty(&self) -> bool {
        self.prosecution_cases.is_empty()
            && self.court_applications.is_empty()
            && self.hearing_days.is_empty()
    }

    /// True when the source hearing's bookkeeping can be discarded.
    pub fn is_fully_allocated(&self) -> bool {
        !self.is_adjourned && !self.is_partially_allocated
    }
}

/// Errors that can occur during hearing operations.
#[derive(Debug, Error)]
pub enum HearingError {
    #[error("Hearing already initiated")]
    AlreadyInitiated,

    #[error("Hearing {hearing_id} cannot be extended from itself")]
    ExtendedFromItself { hearing_id: HearingId },
}
