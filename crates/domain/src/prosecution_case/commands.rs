//! Prosecution case commands.

use common::{AggregateId, CaseId, DefendantId, OffenceId, OrganisationId};

use crate::command::Command;
use crate::model::{DefenceOrganisation, LaaReference, ProsecutionCase};

use super::{CaseAggregate, ProsecutionCaseError, ProsecutionCaseEvent};

/// Command to create a prosecution case.
#[derive(Debug, Clone)]
pub struct CreateProsecutionCase {
    pub prosecution_case: ProsecutionCase,
}

impl CreateProsecutionCase {
    pub fn new(prosecution_case: ProsecutionCase) -> Self {
        Self { prosecution_case }
    }
}

impl Command for CreateProsecutionCase {
    type Aggregate = CaseAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.prosecution_case.id.into()
    }

    fn handle(
        &self,
        case: &CaseAggregate,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        case.create(self.prosecution_case.clone())
    }
}

/// Command to record an LAA decision for one offence.
#[derive(Debug, Clone)]
pub struct RecordLaaReferenceForOffence {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub offence_id: OffenceId,
    pub reference: LaaReference,
}

impl RecordLaaReferenceForOffence {
    pub fn new(
        case_id: CaseId,
        defendant_id: DefendantId,
        offence_id: OffenceId,
        reference: LaaReference,
    ) -> Self {
        Self {
            case_id,
            defendant_id,
            offence_id,
            reference,
        }
    }
}

impl Command for RecordLaaReferenceForOffence {
    type Aggregate = CaseAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.case_id.into()
    }

    fn handle(
        &self,
        case: &CaseAggregate,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        case.record_laa_reference(self.defendant_id, self.offence_id, self.reference.clone())
    }
}

/// Command to associate a defence organisation with a defendant.
#[derive(Debug, Clone)]
pub struct AssociateDefenceOrganisation {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub organisation: DefenceOrganisation,
    /// Set when the association follows a representation order.
    pub locked_by_representation_order: bool,
}

impl AssociateDefenceOrganisation {
    pub fn new(case_id: CaseId, defendant_id: DefendantId, organisation: DefenceOrganisation) -> Self {
        Self {
            case_id,
            defendant_id,
            organisation,
            locked_by_representation_order: false,
        }
    }

    /// Marks the association as made through a representation order.
    pub fn by_representation_order(mut self) -> Self {
        self.locked_by_representation_order = true;
        self
    }
}

impl Command for AssociateDefenceOrganisation {
    type Aggregate = CaseAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.case_id.into()
    }

    fn handle(
        &self,
        case: &CaseAggregate,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        case.associate_defence_organisation(
            self.defendant_id,
            self.organisation.clone(),
            self.locked_by_representation_order,
        )
    }
}

/// Command to remove a defence organisation from a defendant.
#[derive(Debug, Clone)]
pub struct DisassociateDefenceOrganisation {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub organisation_id: OrganisationId,
}

impl DisassociateDefenceOrganisation {
    pub fn new(case_id: CaseId, defendant_id: DefendantId, organisation_id: OrganisationId) -> Self {
        Self {
            case_id,
            defendant_id,
            organisation_id,
        }
    }
}

impl Command for DisassociateDefenceOrganisation {
    type Aggregate = CaseAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.case_id.into()
    }

    fn handle(
        &self,
        case: &CaseAggregate,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        case.disassociate_defence_organisation(self.defendant_id, self.organisation_id)
    }
}

/// Command to eject a case.
#[derive(Debug, Clone)]
pub struct EjectCase {
    pub case_id: CaseId,
    pub reason: String,
}

impl EjectCase {
    pub fn new(case_id: CaseId, reason: impl Into<String>) -> Self {
        Self {
            case_id,
            reason: reason.into(),
        }
    }
}

impl Command for EjectCase {
    type Aggregate = CaseAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.case_id.into()
    }

    fn handle(
        &self,
        case: &CaseAggregate,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        case.eject(self.reason.clone())
    }
}
