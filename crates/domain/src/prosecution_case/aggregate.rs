//! Prosecution case aggregate implementation.

use common::{AggregateId, CaseId, DefendantId, OffenceId, OrganisationId};
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::model::{
    CaseStatus, DefenceOrganisation, Defendant, LaaReference, LegalAidStatus, Offence,
    ProsecutionCase,
};

use super::{
    ProsecutionCaseError, ProsecutionCaseEvent,
    events::{
        DefendantDefenceOrganisationAssociatedData, DefendantDefenceOrganisationDisassociatedData,
        OffencesForDefendantChangedData, ProsecutionCaseOffencesUpdatedData,
    },
};

/// Prosecution case aggregate root.
///
/// Owns the case's defendants, their offences with recorded legal aid
/// decisions, and the defence organisation acting for each defendant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseAggregate {
    /// Current version for optimistic concurrency.
    #[serde(default)]
    version: Version,

    /// The case, once created.
    prosecution_case: Option<ProsecutionCase>,
}

impl Aggregate for CaseAggregate {
    type Event = ProsecutionCaseEvent;
    type Error = ProsecutionCaseError;

    fn aggregate_type() -> &'static str {
        "ProsecutionCase"
    }

    fn id(&self) -> Option<AggregateId> {
        self.prosecution_case.as_ref().map(|case| case.id.into())
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            ProsecutionCaseEvent::ProsecutionCaseCreated(data) => {
                self.prosecution_case = Some(data.prosecution_case);
            }
            ProsecutionCaseEvent::ProsecutionCaseOffencesUpdated(data) => {
                self.apply_offences_updated(data)
            }
            ProsecutionCaseEvent::OffencesForDefendantChanged(data) => {
                self.apply_offences_changed(data)
            }
            ProsecutionCaseEvent::DefendantLaaAssociationChanged(data) => {
                if let Some(defendant) = self.defendant_mut(data.defendant_id) {
                    defendant.associated_by_laa = data.associated_by_laa;
                }
            }
            ProsecutionCaseEvent::DefendantLegalAidStatusUpdated(data) => {
                if let Some(defendant) = self.defendant_mut(data.defendant_id) {
                    defendant.legal_aid_status = data.legal_aid_status;
                }
            }
            ProsecutionCaseEvent::DefendantDefenceOrganisationChanged(data) => {
                if let Some(defendant) = self.defendant_mut(data.defendant_id) {
                    defendant.defence_organisation = data.defence_organisation;
                }
            }
            ProsecutionCaseEvent::DefendantDefenceOrganisationAssociated(data) => {
                self.apply_associated(data)
            }
            ProsecutionCaseEvent::DefendantDefenceOrganisationDisassociated(data) => {
                self.apply_disassociated(data)
            }
            ProsecutionCaseEvent::CaseEjected(_) => {
                if let Some(case) = self.prosecution_case.as_mut() {
                    case.status = CaseStatus::Ejected;
                }
            }
            ProsecutionCaseEvent::CaseEjectionIgnored(_) => {}
        }
    }
}

// Query methods
impl CaseAggregate {
    /// Returns the case, if created.
    pub fn prosecution_case(&self) -> Option<&ProsecutionCase> {
        self.prosecution_case.as_ref()
    }

    /// Returns a defendant by ID.
    pub fn defendant(&self, defendant_id: DefendantId) -> Option<&Defendant> {
        self.prosecution_case.as_ref()?.defendant(defendant_id)
    }

    /// Returns the case status, if created.
    pub fn status(&self) -> Option<CaseStatus> {
        self.prosecution_case.as_ref().map(|case| case.status)
    }

    /// Returns true if the case has been ejected.
    pub fn is_ejected(&self) -> bool {
        self.status() == Some(CaseStatus::Ejected)
    }
}

// Command methods - these validate and return events
impl CaseAggregate {
    /// Creates the case.
    pub fn create(
        &self,
        prosecution_case: ProsecutionCase,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        if self.prosecution_case.is_some() {
            return Err(ProsecutionCaseError::AlreadyCreated);
        }
        if prosecution_case.urn.trim().is_empty() {
            return Err(ProsecutionCaseError::UrnRequired);
        }

        Ok(vec![ProsecutionCaseEvent::case_created(prosecution_case)])
    }

    /// Records an LAA decision against one offence.
    ///
    /// Always replaces the offence and reports the change. When the decision
    /// is not a grant and the defendant's organisation was associated through
    /// a representation order, the association is revisited: if another
    /// offence still holds a grant only the defendant status is refreshed,
    /// otherwise the LAA association is cleared and the organisation removed.
    pub fn record_laa_reference(
        &self,
        defendant_id: DefendantId,
        offence_id: OffenceId,
        reference: LaaReference,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        let Some(case) = self.prosecution_case.as_ref() else {
            tracing::warn!(%defendant_id, "laa reference for unknown case ignored");
            return Ok(vec![]);
        };
        if case.status == CaseStatus::Ejected {
            tracing::debug!(case_id = %case.id, "laa reference for ejected case ignored");
            return Ok(vec![]);
        }
        let Some(defendant) = case.defendant(defendant_id) else {
            tracing::warn!(case_id = %case.id, %defendant_id, "laa reference for unknown defendant ignored");
            return Ok(vec![]);
        };
        let Some(offence) = defendant.offence(offence_id) else {
            tracing::warn!(case_id = %case.id, %defendant_id, %offence_id, "laa reference for unknown offence ignored");
            return Ok(vec![]);
        };

        let recorded_status = reference.legal_aid_status();
        let updated_offence = Offence {
            laa_reference: Some(reference),
            ..offence.clone()
        };
        let offences: Vec<Offence> = defendant
            .offences
            .iter()
            .map(|o| {
                if o.id == offence_id {
                    updated_offence.clone()
                } else {
                    o.clone()
                }
            })
            .collect();
        let defendant_status = LegalAidStatus::aggregate(offences.iter().map(Offence::legal_aid_status));

        let mut events = vec![
            ProsecutionCaseEvent::offences_updated(
                case.id,
                defendant_id,
                offences.clone(),
                defendant_status,
            ),
            ProsecutionCaseEvent::offences_changed(case.id, defendant_id, vec![updated_offence]),
        ];

        if recorded_status != LegalAidStatus::Granted
            && defendant.locked_by_representation_order
            && let Some(organisation) = defendant.defence_organisation.as_ref()
        {
            let other_offence_granted = offences
                .iter()
                .any(|o| o.id != offence_id && o.legal_aid_status() == LegalAidStatus::Granted);

            if other_offence_granted {
                events.push(ProsecutionCaseEvent::legal_aid_status_updated(
                    case.id,
                    defendant_id,
                    defendant_status,
                ));
            } else {
                events.extend([
                    ProsecutionCaseEvent::laa_association_changed(
                        case.id,
                        defendant_id,
                        organisation.organisation_id,
                        false,
                    ),
                    ProsecutionCaseEvent::legal_aid_status_updated(
                        case.id,
                        defendant_id,
                        defendant_status,
                    ),
                    ProsecutionCaseEvent::defence_organisation_changed(case.id, defendant_id, None),
                    ProsecutionCaseEvent::defence_organisation_disassociated(
                        case.id,
                        defendant_id,
                        organisation.organisation_id,
                    ),
                ]);
            }
        }

        Ok(events)
    }

    /// Associates a defence organisation with a defendant.
    pub fn associate_defence_organisation(
        &self,
        defendant_id: DefendantId,
        organisation: DefenceOrganisation,
        locked_by_representation_order: bool,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        let Some((case_id, defendant)) = self.existing_defendant(defendant_id) else {
            return Ok(vec![]);
        };

        if let Some(current) = defendant.defence_organisation.as_ref() {
            if current.organisation_id == organisation.organisation_id {
                return Ok(vec![]);
            }
            if defendant.locked_by_representation_order {
                return Err(ProsecutionCaseError::AssociationLocked {
                    defendant_id,
                    organisation_id: current.organisation_id,
                });
            }
        }

        Ok(vec![ProsecutionCaseEvent::defence_organisation_associated(
            case_id,
            defendant_id,
            organisation,
            locked_by_representation_order,
        )])
    }

    /// Removes a defence organisation from a defendant on request.
    ///
    /// Associations made through a representation order can only be removed
    /// by an LAA decision.
    pub fn disassociate_defence_organisation(
        &self,
        defendant_id: DefendantId,
        organisation_id: OrganisationId,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        let Some((case_id, defendant)) = self.existing_defendant(defendant_id) else {
            return Ok(vec![]);
        };

        match defendant.defence_organisation.as_ref() {
            Some(current) if current.organisation_id == organisation_id => {
                if defendant.locked_by_representation_order {
                    return Err(ProsecutionCaseError::AssociationLocked {
                        defendant_id,
                        organisation_id,
                    });
                }
                Ok(vec![
                    ProsecutionCaseEvent::defence_organisation_changed(case_id, defendant_id, None),
                    ProsecutionCaseEvent::defence_organisation_disassociated(
                        case_id,
                        defendant_id,
                        organisation_id,
                    ),
                ])
            }
            _ => {
                tracing::debug!(%case_id, %defendant_id, %organisation_id, "organisation not associated");
                Ok(vec![])
            }
        }
    }

    /// Ejects the case; a repeated ejection is recorded as ignored.
    pub fn eject(
        &self,
        reason: impl Into<String>,
    ) -> Result<Vec<ProsecutionCaseEvent>, ProsecutionCaseError> {
        let Some(case) = self.prosecution_case.as_ref() else {
            tracing::warn!("ejection of unknown case ignored");
            return Ok(vec![]);
        };

        if case.status == CaseStatus::Ejected {
            return Ok(vec![ProsecutionCaseEvent::case_ejection_ignored(
                case.id,
                reason,
            )]);
        }

        Ok(vec![ProsecutionCaseEvent::case_ejected(case.id, reason)])
    }

    fn existing_defendant(&self, defendant_id: DefendantId) -> Option<(CaseId, &Defendant)> {
        let case = self.prosecution_case.as_ref()?;
        match case.defendant(defendant_id) {
            Some(defendant) => Some((case.id, defendant)),
            None => {
                tracing::warn!(case_id = %case.id, %defendant_id, "unknown defendant");
                None
            }
        }
    }
}

// Apply event helpers
impl CaseAggregate {
    fn defendant_mut(&mut self, defendant_id: DefendantId) -> Option<&mut Defendant> {
        self.prosecution_case
            .as_mut()?
            .defendants
            .iter_mut()
            .find(|d| d.id == defendant_id)
    }

    fn apply_offences_updated(&mut self, data: ProsecutionCaseOffencesUpdatedData) {
        if let Some(defendant) = self.defendant_mut(data.defendant_id) {
            defendant.offences = data.offences;
            defendant.legal_aid_status = data.legal_aid_status;
        }
    }

    fn apply_offences_changed(&mut self, data: OffencesForDefendantChangedData) {
        let Some(defendant) = self.defendant_mut(data.defendant_id) else {
            return;
        };

        for updated in data.updated_offences {
            if let Some(offence) = defendant.offences.iter_mut().find(|o| o.id == updated.id) {
                *offence = updated;
            }
        }
        defendant
            .offences
            .retain(|o| !data.deleted_offences.contains(&o.id));
        for added in data.added_offences {
            if defendant.offence(added.id).is_none() {
                defendant.offences.push(added);
            }
        }
    }

    fn apply_associated(&mut self, data: DefendantDefenceOrganisationAssociatedData) {
        if let Some(defendant) = self.defendant_mut(data.defendant_id) {
            defendant.defence_organisation = Some(data.defence_organisation);
            defendant.locked_by_representation_order = data.locked_by_representation_order;
            defendant.associated_by_laa = data.locked_by_representation_order;
        }
    }

    fn apply_disassociated(&mut self, data: DefendantDefenceOrganisationDisassociatedData) {
        if let Some(defendant) = self.defendant_mut(data.defendant_id) {
            let still_current = defendant
                .defence_organisation
                .as_ref()
                .is_none_or(|org| org.organisation_id == data.organisation_id);
            if still_current {
                defendant.defence_organisation = None;
                defendant.locked_by_representation_order = false;
                defendant.associated_by_laa = false;
            }
        }
    }
}
