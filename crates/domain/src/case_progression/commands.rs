//! Case progression commands.

use common::{AggregateId, CaseId, CourtCentreId, DefendantId, OffenceId};

use crate::command::Command;

use super::{CaseProgressionAggregate, CaseProgressionError, CaseProgressionEvent, SendingSheet};

/// Command to add a case to a Crown Court centre.
#[derive(Debug, Clone)]
pub struct AddCaseToCrownCourt {
    pub case_id: CaseId,
    pub court_centre_id: CourtCentreId,
}

impl AddCaseToCrownCourt {
    pub fn new(case_id: CaseId, court_centre_id: CourtCentreId) -> Self {
        Self {
            case_id,
            court_centre_id,
        }
    }
}

impl Command for AddCaseToCrownCourt {
    type Aggregate = CaseProgressionAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.case_id.into()
    }

    fn handle(
        &self,
        progression: &CaseProgressionAggregate,
    ) -> Result<Vec<CaseProgressionEvent>, CaseProgressionError> {
        progression.add_to_crown_court(self.case_id, self.court_centre_id)
    }
}

/// Command to add a defendant and their offences to a case.
#[derive(Debug, Clone)]
pub struct AddDefendant {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub offence_ids: Vec<OffenceId>,
}

impl AddDefendant {
    pub fn new(case_id: CaseId, defendant_id: DefendantId, offence_ids: Vec<OffenceId>) -> Self {
        Self {
            case_id,
            defendant_id,
            offence_ids,
        }
    }
}

impl Command for AddDefendant {
    type Aggregate = CaseProgressionAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.case_id.into()
    }

    fn handle(
        &self,
        progression: &CaseProgressionAggregate,
    ) -> Result<Vec<CaseProgressionEvent>, CaseProgressionError> {
        progression.add_defendant(self.case_id, self.defendant_id, self.offence_ids.clone())
    }
}

/// Command to remove a defendant from a case.
#[derive(Debug, Clone)]
pub struct RemoveDefendant {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
}

impl RemoveDefendant {
    pub fn new(case_id: CaseId, defendant_id: DefendantId) -> Self {
        Self {
            case_id,
            defendant_id,
        }
    }
}

impl Command for RemoveDefendant {
    type Aggregate = CaseProgressionAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.case_id.into()
    }

    fn handle(
        &self,
        progression: &CaseProgressionAggregate,
    ) -> Result<Vec<CaseProgressionEvent>, CaseProgressionError> {
        progression.remove_defendant(self.case_id, self.defendant_id)
    }
}

/// Command to submit a sending sheet.
#[derive(Debug, Clone)]
pub struct CompleteSendingSheet {
    pub sending_sheet: SendingSheet,
}

impl CompleteSendingSheet {
    pub fn new(sending_sheet: SendingSheet) -> Self {
        Self { sending_sheet }
    }
}

impl Command for CompleteSendingSheet {
    type Aggregate = CaseProgressionAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.sending_sheet.case_id.into()
    }

    fn handle(
        &self,
        progression: &CaseProgressionAggregate,
    ) -> Result<Vec<CaseProgressionEvent>, CaseProgressionError> {
        progression.complete_sending_sheet(self.sending_sheet.clone())
    }
}
