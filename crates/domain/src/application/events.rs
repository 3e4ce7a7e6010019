//! Court application domain events.

use chrono::{DateTime, Utc};
use common::{ApplicationId, HearingId};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::model::{ApplicationStatus, CourtApplication};

/// Events that can occur on a court application aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ApplicationEvent {
    /// Proceedings were started for the application.
    CourtApplicationProceedingsInitiated(CourtApplicationProceedingsInitiatedData),

    /// A repeated initiation request was received and ignored.
    CourtApplicationProceedingsInitiateIgnored(CourtApplicationProceedingsInitiateIgnoredData),

    CourtApplicationStatusChanged(CourtApplicationStatusChangedData),
}

impl DomainEvent for ApplicationEvent {
    const EVENT_TYPES: &'static [&'static str] = &[
        "CourtApplicationProceedingsInitiated",
        "CourtApplicationProceedingsInitiateIgnored",
        "CourtApplicationStatusChanged",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            ApplicationEvent::CourtApplicationProceedingsInitiated(_) => {
                "CourtApplicationProceedingsInitiated"
            }
            ApplicationEvent::CourtApplicationProceedingsInitiateIgnored(_) => {
                "CourtApplicationProceedingsInitiateIgnored"
            }
            ApplicationEvent::CourtApplicationStatusChanged(_) => "CourtApplicationStatusChanged",
        }
    }
}

/// Data for CourtApplicationProceedingsInitiated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtApplicationProceedingsInitiatedData {
    pub court_application: CourtApplication,
    /// The hearing the application is listed into, if any.
    #[serde(default)]
    pub court_hearing: Option<HearingId>,
    /// The application arises from a single justice procedure case.
    pub is_sjp_case: bool,
    pub application_referred_to_new_hearing: bool,
    pub summons_approval_required: bool,
    pub initiated_at: DateTime<Utc>,
}

/// Data for CourtApplicationProceedingsInitiateIgnored event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtApplicationProceedingsInitiateIgnoredData {
    pub application_id: ApplicationId,
    #[serde(default)]
    pub court_hearing: Option<HearingId>,
}

/// Data for CourtApplicationStatusChanged event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtApplicationStatusChangedData {
    pub application_id: ApplicationId,
    pub previous_status: ApplicationStatus,
    pub status: ApplicationStatus,
}

// Convenience constructors
impl ApplicationEvent {
    pub fn proceedings_initiated(
        court_application: CourtApplication,
        court_hearing: Option<HearingId>,
        is_sjp_case: bool,
        application_referred_to_new_hearing: bool,
        summons_approval_required: bool,
    ) -> Self {
        ApplicationEvent::CourtApplicationProceedingsInitiated(
            CourtApplicationProceedingsInitiatedData {
                court_application,
                court_hearing,
                is_sjp_case,
                application_referred_to_new_hearing,
                summons_approval_required,
                initiated_at: Utc::now(),
            },
        )
    }

    pub fn proceedings_initiate_ignored(
        application_id: ApplicationId,
        court_hearing: Option<HearingId>,
    ) -> Self {
        ApplicationEvent::CourtApplicationProceedingsInitiateIgnored(
            CourtApplicationProceedingsInitiateIgnoredData {
                application_id,
                court_hearing,
            },
        )
    }

    pub fn status_changed(
        application_id: ApplicationId,
        previous_status: ApplicationStatus,
        status: ApplicationStatus,
    ) -> Self {
        ApplicationEvent::CourtApplicationStatusChanged(CourtApplicationStatusChangedData {
            application_id,
            previous_status,
            status,
        })
    }
}
