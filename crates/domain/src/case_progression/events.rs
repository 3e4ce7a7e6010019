//! Case progression domain events.

use common::{CaseId, CourtCentreId, DefendantId, OffenceId};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{InvalidationReason, SendingSheet};

/// Events that can occur while progressing a case to the Crown Court.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CaseProgressionEvent {
    CaseAddedToCrownCourt(CaseAddedToCrownCourtData),
    DefendantAddedToCase(DefendantAddedToCaseData),
    DefendantRemovedFromCase(DefendantRemovedFromCaseData),
    SendingSheetCompleted(SendingSheetCompletedData),
    SendingSheetInvalidated(SendingSheetInvalidatedData),
    SendingSheetPreviouslyCompleted(SendingSheetPreviouslyCompletedData),
}

impl DomainEvent for CaseProgressionEvent {
    const EVENT_TYPES: &'static [&'static str] = &[
        "CaseAddedToCrownCourt",
        "DefendantAddedToCase",
        "DefendantRemovedFromCase",
        "SendingSheetCompleted",
        "SendingSheetInvalidated",
        "SendingSheetPreviouslyCompleted",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            CaseProgressionEvent::CaseAddedToCrownCourt(_) => "CaseAddedToCrownCourt",
            CaseProgressionEvent::DefendantAddedToCase(_) => "DefendantAddedToCase",
            CaseProgressionEvent::DefendantRemovedFromCase(_) => "DefendantRemovedFromCase",
            CaseProgressionEvent::SendingSheetCompleted(_) => "SendingSheetCompleted",
            CaseProgressionEvent::SendingSheetInvalidated(_) => "SendingSheetInvalidated",
            CaseProgressionEvent::SendingSheetPreviouslyCompleted(_) => {
                "SendingSheetPreviouslyCompleted"
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseAddedToCrownCourtData {
    pub case_id: CaseId,
    pub court_centre_id: CourtCentreId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefendantAddedToCaseData {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub offence_ids: Vec<OffenceId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefendantRemovedFromCaseData {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendingSheetCompletedData {
    pub case_id: CaseId,
    pub sending_sheet: SendingSheet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendingSheetInvalidatedData {
    pub case_id: CaseId,
    pub reason: InvalidationReason,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendingSheetPreviouslyCompletedData {
    pub case_id: CaseId,
}

// Convenience constructors
impl CaseProgressionEvent {
    pub fn added_to_crown_court(case_id: CaseId, court_centre_id: CourtCentreId) -> Self {
        CaseProgressionEvent::CaseAddedToCrownCourt(CaseAddedToCrownCourtData {
            case_id,
            court_centre_id,
        })
    }

    pub fn defendant_added(case_id: CaseId, defendant_id: DefendantId, offence_ids: Vec<OffenceId>) -> Self {
        CaseProgressionEvent::DefendantAddedToCase(DefendantAddedToCaseData {
            case_id,
            defendant_id,
            offence_ids,
        })
    }

    pub fn defendant_removed(case_id: CaseId, defendant_id: DefendantId) -> Self {
        CaseProgressionEvent::DefendantRemovedFromCase(DefendantRemovedFromCaseData {
            case_id,
            defendant_id,
        })
    }

    pub fn sending_sheet_completed(sending_sheet: SendingSheet) -> Self {
        CaseProgressionEvent::SendingSheetCompleted(SendingSheetCompletedData {
            case_id: sending_sheet.case_id,
            sending_sheet,
        })
    }

    pub fn sending_sheet_invalidated(case_id: CaseId, reason: InvalidationReason) -> Self {
        CaseProgressionEvent::SendingSheetInvalidated(SendingSheetInvalidatedData {
            case_id,
            description: reason.describe(case_id),
            reason,
        })
    }

    pub fn sending_sheet_previously_completed(case_id: CaseId) -> Self {
        CaseProgressionEvent::SendingSheetPreviouslyCompleted(
            SendingSheetPreviouslyCompletedData { case_id },
        )
    }
}
