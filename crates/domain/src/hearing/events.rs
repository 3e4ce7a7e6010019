//! Hearing domain events.

use common::HearingId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{Hearing, HearingExtension};

/// Events that can occur on a hearing aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HearingEvent {
    /// Hearing was initiated with its first listing.
    HearingInitiated(HearingInitiatedData),

    /// More cases, applications or sittings were listed into the hearing.
    HearingExtended(HearingExtendedData),
}

impl DomainEvent for HearingEvent {
    const EVENT_TYPES: &'static [&'static str] = &["HearingInitiated", "HearingExtended"];

    fn event_type(&self) -> &'static str {
        match self {
            HearingEvent::HearingInitiated(_) => "HearingInitiated",
            HearingEvent::HearingExtended(_) => "HearingExtended",
        }
    }
}

/// Data for HearingInitiated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingInitiatedData {
    pub hearing: Hearing,
}

/// Data for HearingExtended event.
///
/// Carries the request as received; consumers reconcile it against the
/// hearing they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingExtendedData {
    pub hearing_id: HearingId,
    pub extension: HearingExtension,
}

// Convenience constructors
impl HearingEvent {
    pub fn initiated(hearing: Hearing) -> Self {
        HearingEvent::HearingInitiated(HearingInitiatedData { hearing })
    }

    pub fn extended(hearing_id: HearingId, extension: HearingExtension) -> Self {
        HearingEvent::HearingExtended(HearingExtendedData {
            hearing_id,
            extension,
        })
    }
}
