//! Case progression aggregate implementation.

use std::collections::{BTreeMap, BTreeSet};

use common::{AggregateId, CaseId, CourtCentreId, DefendantId, OffenceId};
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

use super::{
    CaseProgressionError, CaseProgressionEvent, SendingSheet,
    sending_sheet::{self, KnownCase},
};

/// Tracks what is needed to send a case to the Crown Court.
///
/// Ordered collections keep replayed state byte-for-byte reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseProgressionAggregate {
    case_id: Option<CaseId>,

    #[serde(default)]
    version: Version,

    court_centre_id: Option<CourtCentreId>,

    /// Known defendants and the offences charged against each.
    offences_by_defendant: BTreeMap<DefendantId, BTreeSet<OffenceId>>,

    /// Cases whose sending sheet has been accepted.
    completed_sending_sheets: BTreeSet<CaseId>,
}

impl Aggregate for CaseProgressionAggregate {
    type Event = CaseProgressionEvent;
    type Error = CaseProgressionError;

    fn aggregate_type() -> &'static str {
        "CaseProgression"
    }

    fn id(&self) -> Option<AggregateId> {
        self.case_id.map(Into::into)
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            CaseProgressionEvent::CaseAddedToCrownCourt(data) => {
                self.case_id.get_or_insert(data.case_id);
                self.court_centre_id = Some(data.court_centre_id);
            }
            CaseProgressionEvent::DefendantAddedToCase(data) => {
                self.case_id.get_or_insert(data.case_id);
                self.offences_by_defendant
                    .insert(data.defendant_id, data.offence_ids.into_iter().collect());
            }
            CaseProgressionEvent::DefendantRemovedFromCase(data) => {
                self.offences_by_defendant.remove(&data.defendant_id);
            }
            CaseProgressionEvent::SendingSheetCompleted(data) => {
                self.completed_sending_sheets.insert(data.case_id);
            }
            CaseProgressionEvent::SendingSheetInvalidated(_)
            | CaseProgressionEvent::SendingSheetPreviouslyCompleted(_) => {}
        }
    }
}

// Query methods
impl CaseProgressionAggregate {
    pub fn court_centre_id(&self) -> Option<CourtCentreId> {
        self.court_centre_id
    }

    pub fn defendants(&self) -> impl Iterator<Item = &DefendantId> {
        self.offences_by_defendant.keys()
    }

    pub fn offences_for(&self, defendant_id: DefendantId) -> Option<&BTreeSet<OffenceId>> {
        self.offences_by_defendant.get(&defendant_id)
    }

    pub fn is_sending_sheet_completed(&self, case_id: CaseId) -> bool {
        self.completed_sending_sheets.contains(&case_id)
    }
}

// Command methods - these validate and return events
impl CaseProgressionAggregate {
    pub fn add_to_crown_court(
        &self,
        case_id: CaseId,
        court_centre_id: CourtCentreId,
    ) -> Result<Vec<CaseProgressionEvent>, CaseProgressionError> {
        self.ensure_same_case(case_id)?;
        if self.court_centre_id == Some(court_centre_id) {
            return Ok(vec![]);
        }
        Ok(vec![CaseProgressionEvent::added_to_crown_court(
            case_id,
            court_centre_id,
        )])
    }

    /// Adds a defendant, or replaces the offences of a known one.
    pub fn add_defendant(
        &self,
        case_id: CaseId,
        defendant_id: DefendantId,
        offence_ids: Vec<OffenceId>,
    ) -> Result<Vec<CaseProgressionEvent>, CaseProgressionError> {
        self.ensure_same_case(case_id)?;
        let requested: BTreeSet<OffenceId> = offence_ids.iter().copied().collect();
        if self.offences_by_defendant.get(&defendant_id) == Some(&requested) {
            return Ok(vec![]);
        }
        Ok(vec![CaseProgressionEvent::defendant_added(
            case_id,
            defendant_id,
            offence_ids,
        )])
    }

    pub fn remove_defendant(
        &self,
        case_id: CaseId,
        defendant_id: DefendantId,
    ) -> Result<Vec<CaseProgressionEvent>, CaseProgressionError> {
        if !self.offences_by_defendant.contains_key(&defendant_id) {
            tracing::debug!(%case_id, %defendant_id, "defendant not on case");
            return Ok(vec![]);
        }
        Ok(vec![CaseProgressionEvent::defendant_removed(
            case_id,
            defendant_id,
        )])
    }

    /// Checks a sending sheet and records the outcome.
    ///
    /// Exactly one event is produced: previously completed, invalidated with
    /// the first failing check, or completed.
    pub fn complete_sending_sheet(
        &self,
        sheet: SendingSheet,
    ) -> Result<Vec<CaseProgressionEvent>, CaseProgressionError> {
        if self.completed_sending_sheets.contains(&sheet.case_id) {
            return Ok(vec![
                CaseProgressionEvent::sending_sheet_previously_completed(sheet.case_id),
            ]);
        }

        let known = KnownCase {
            court_centre_id: self.court_centre_id,
            offences_by_defendant: &self.offences_by_defendant,
        };

        match sending_sheet::check(&sheet, known) {
            Ok(()) => Ok(vec![CaseProgressionEvent::sending_sheet_completed(sheet)]),
            Err(reason) => {
                tracing::info!(case_id = %sheet.case_id, ?reason, "sending sheet invalidated");
                Ok(vec![CaseProgressionEvent::sending_sheet_invalidated(
                    sheet.case_id,
                    reason,
                )])
            }
        }
    }

    fn ensure_same_case(&self, case_id: CaseId) -> Result<(), CaseProgressionError> {
        match self.case_id {
            Some(existing) if existing != case_id => Err(CaseProgressionError::CaseMismatch {
                expected: existing,
                actual: case_id,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::reconstitute;

    #[test]
    fn test_adding_same_court_centre_twice_is_a_no_op() {
        let case_id = CaseId::new();
        let centre = CourtCentreId::new();
        let progression: CaseProgressionAggregate =
            reconstitute(vec![CaseProgressionEvent::added_to_crown_court(case_id, centre)]);

        assert!(progression.add_to_crown_court(case_id, centre).unwrap().is_empty());
    }

    #[test]
    fn test_case_mismatch_is_rejected() {
        let progression: CaseProgressionAggregate = reconstitute(vec![
            CaseProgressionEvent::added_to_crown_court(CaseId::new(), CourtCentreId::new()),
        ]);

        assert!(matches!(
            progression.add_defendant(CaseId::new(), DefendantId::new(), vec![]),
            Err(CaseProgressionError::CaseMismatch { .. })
        ));
    }

    #[test]
    fn test_removing_unknown_defendant_is_a_no_op() {
        let progression = CaseProgressionAggregate::default();
        assert!(
            progression
                .remove_defendant(CaseId::new(), DefendantId::new())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_sheet_without_court_centre_is_invalidated() {
        let case_id = CaseId::new();
        let defendant_id = DefendantId::new();
        let progression: CaseProgressionAggregate = reconstitute(vec![
            CaseProgressionEvent::defendant_added(case_id, defendant_id, vec![]),
        ]);

        let events = progression
            .complete_sending_sheet(SendingSheet::new(case_id).with_defendant(defendant_id, &[]))
            .unwrap();

        match &events[..] {
            [CaseProgressionEvent::SendingSheetInvalidated(data)] => {
                assert_eq!(data.reason, crate::case_progression::InvalidationReason::MissingCourtCentre);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }
}
