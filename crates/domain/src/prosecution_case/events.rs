//! Prosecution case domain events.

use chrono::{DateTime, Utc};
use common::{CaseId, DefendantId, OffenceId, OrganisationId};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::model::{DefenceOrganisation, LegalAidStatus, Offence, ProsecutionCase};

/// Events that can occur on a prosecution case aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ProsecutionCaseEvent {
    /// Case was created with its defendants and offences.
    ProsecutionCaseCreated(ProsecutionCaseCreatedData),

    /// A defendant's offence list was replaced after an LAA decision.
    ProsecutionCaseOffencesUpdated(ProsecutionCaseOffencesUpdatedData),

    /// Offences for a defendant changed.
    OffencesForDefendantChanged(OffencesForDefendantChangedData),

    /// The LAA flag on a defendant's representation changed.
    DefendantLaaAssociationChanged(DefendantLaaAssociationChangedData),

    /// A defendant's aggregated legal aid status changed.
    DefendantLegalAidStatusUpdated(DefendantLegalAidStatusUpdatedData),

    /// A defendant's defence organisation changed (or was cleared).
    DefendantDefenceOrganisationChanged(DefendantDefenceOrganisationChangedData),

    /// A defence organisation started acting for a defendant.
    DefendantDefenceOrganisationAssociated(DefendantDefenceOrganisationAssociatedData),

    /// A defence organisation stopped acting for a defendant.
    DefendantDefenceOrganisationDisassociated(DefendantDefenceOrganisationDisassociatedData),

    /// Case was ejected from the court process.
    CaseEjected(CaseEjectedData),

    /// An ejection request arrived for a case that was already ejected.
    CaseEjectionIgnored(CaseEjectionIgnoredData),
}

impl DomainEvent for ProsecutionCaseEvent {
    const EVENT_TYPES: &'static [&'static str] = &[
        "ProsecutionCaseCreated",
        "ProsecutionCaseOffencesUpdated",
        "OffencesForDefendantChanged",
        "DefendantLaaAssociationChanged",
        "DefendantLegalAidStatusUpdated",
        "DefendantDefenceOrganisationChanged",
        "DefendantDefenceOrganisationAssociated",
        "DefendantDefenceOrganisationDisassociated",
        "CaseEjected",
        "CaseEjectionIgnored",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            ProsecutionCaseEvent::ProsecutionCaseCreated(_) => "ProsecutionCaseCreated",
            ProsecutionCaseEvent::ProsecutionCaseOffencesUpdated(_) => {
                "ProsecutionCaseOffencesUpdated"
            }
            ProsecutionCaseEvent::OffencesForDefendantChanged(_) => "OffencesForDefendantChanged",
            ProsecutionCaseEvent::DefendantLaaAssociationChanged(_) => {
                "DefendantLaaAssociationChanged"
            }
            ProsecutionCaseEvent::DefendantLegalAidStatusUpdated(_) => {
                "DefendantLegalAidStatusUpdated"
            }
            ProsecutionCaseEvent::DefendantDefenceOrganisationChanged(_) => {
                "DefendantDefenceOrganisationChanged"
            }
            ProsecutionCaseEvent::DefendantDefenceOrganisationAssociated(_) => {
                "DefendantDefenceOrganisationAssociated"
            }
            ProsecutionCaseEvent::DefendantDefenceOrganisationDisassociated(_) => {
                "DefendantDefenceOrganisationDisassociated"
            }
            ProsecutionCaseEvent::CaseEjected(_) => "CaseEjected",
            ProsecutionCaseEvent::CaseEjectionIgnored(_) => "CaseEjectionIgnored",
        }
    }
}

/// Data for ProsecutionCaseCreated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProsecutionCaseCreatedData {
    pub prosecution_case: ProsecutionCase,
    pub created_at: DateTime<Utc>,
}

/// Data for ProsecutionCaseOffencesUpdated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProsecutionCaseOffencesUpdatedData {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    /// The defendant's complete offence list after the update.
    pub offences: Vec<Offence>,
    /// The defendant's status recomputed over `offences`.
    pub legal_aid_status: LegalAidStatus,
}

/// Data for OffencesForDefendantChanged event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffencesForDefendantChangedData {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    #[serde(default)]
    pub updated_offences: Vec<Offence>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_offences: Vec<Offence>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_offences: Vec<OffenceId>,
}

/// Data for DefendantLaaAssociationChanged event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefendantLaaAssociationChangedData {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub organisation_id: OrganisationId,
    pub associated_by_laa: bool,
}

/// Data for DefendantLegalAidStatusUpdated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefendantLegalAidStatusUpdatedData {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub legal_aid_status: LegalAidStatus,
}

/// Data for DefendantDefenceOrganisationChanged event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefendantDefenceOrganisationChangedData {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    /// None when the defendant is left unrepresented.
    #[serde(default)]
    pub defence_organisation: Option<DefenceOrganisation>,
}

/// Data for DefendantDefenceOrganisationAssociated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefendantDefenceOrganisationAssociatedData {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub defence_organisation: DefenceOrganisation,
    pub locked_by_representation_order: bool,
    pub associated_at: DateTime<Utc>,
}

/// Data for DefendantDefenceOrganisationDisassociated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefendantDefenceOrganisationDisassociatedData {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub organisation_id: OrganisationId,
    pub disassociated_at: DateTime<Utc>,
}

/// Data for CaseEjected event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseEjectedData {
    pub case_id: CaseId,
    pub reason: String,
    pub ejected_at: DateTime<Utc>,
}

/// Data for CaseEjectionIgnored event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseEjectionIgnoredData {
    pub case_id: CaseId,
    pub reason: String,
}

// Convenience constructors
impl ProsecutionCaseEvent {
    pub fn case_created(prosecution_case: ProsecutionCase) -> Self {
        ProsecutionCaseEvent::ProsecutionCaseCreated(ProsecutionCaseCreatedData {
            prosecution_case,
            created_at: Utc::now(),
        })
    }

    pub fn offences_updated(
        case_id: CaseId,
        defendant_id: DefendantId,
        offences: Vec<Offence>,
        legal_aid_status: LegalAidStatus,
    ) -> Self {
        ProsecutionCaseEvent::ProsecutionCaseOffencesUpdated(ProsecutionCaseOffencesUpdatedData {
            case_id,
            defendant_id,
            offences,
            legal_aid_status,
        })
    }

    /// Reports changed offences only; nothing added or removed.
    pub fn offences_changed(
        case_id: CaseId,
        defendant_id: DefendantId,
        updated_offences: Vec<Offence>,
    ) -> Self {
        ProsecutionCaseEvent::OffencesForDefendantChanged(OffencesForDefendantChangedData {
            case_id,
            defendant_id,
            updated_offences,
            added_offences: Vec::new(),
            deleted_offences: Vec::new(),
        })
    }

    pub fn laa_association_changed(
        case_id: CaseId,
        defendant_id: DefendantId,
        organisation_id: OrganisationId,
        associated_by_laa: bool,
    ) -> Self {
        ProsecutionCaseEvent::DefendantLaaAssociationChanged(DefendantLaaAssociationChangedData {
            case_id,
            defendant_id,
            organisation_id,
            associated_by_laa,
        })
    }

    pub fn legal_aid_status_updated(
        case_id: CaseId,
        defendant_id: DefendantId,
        legal_aid_status: LegalAidStatus,
    ) -> Self {
        ProsecutionCaseEvent::DefendantLegalAidStatusUpdated(DefendantLegalAidStatusUpdatedData {
            case_id,
            defendant_id,
            legal_aid_status,
        })
    }

    pub fn defence_organisation_changed(
        case_id: CaseId,
        defendant_id: DefendantId,
        defence_organisation: Option<DefenceOrganisation>,
    ) -> Self {
        ProsecutionCaseEvent::DefendantDefenceOrganisationChanged(
            DefendantDefenceOrganisationChangedData {
                case_id,
                defendant_id,
                defence_organisation,
            },
        )
    }

    pub fn defence_organisation_associated(
        case_id: CaseId,
        defendant_id: DefendantId,
        defence_organisation: DefenceOrganisation,
        locked_by_representation_order: bool,
    ) -> Self {
        ProsecutionCaseEvent::DefendantDefenceOrganisationAssociated(
            DefendantDefenceOrganisationAssociatedData {
                case_id,
                defendant_id,
                defence_organisation,
                locked_by_representation_order,
                associated_at: Utc::now(),
            },
        )
    }

    pub fn defence_organisation_disassociated(
        case_id: CaseId,
        defendant_id: DefendantId,
        organisation_id: OrganisationId,
    ) -> Self {
        ProsecutionCaseEvent::DefendantDefenceOrganisationDisassociated(
            DefendantDefenceOrganisationDisassociatedData {
                case_id,
                defendant_id,
                organisation_id,
                disassociated_at: Utc::now(),
            },
        )
    }

    pub fn case_ejected(case_id: CaseId, reason: impl Into<String>) -> Self {
        ProsecutionCaseEvent::CaseEjected(CaseEjectedData {
            case_id,
            reason: reason.into(),
            ejected_at: Utc::now(),
        })
    }

    pub fn case_ejection_ignored(case_id: CaseId, reason: impl Into<String>) -> Self {
        ProsecutionCaseEvent::CaseEjectionIgnored(CaseEjectionIgnoredData {
            case_id,
            reason: reason.into(),
        })
    }
}
