//! Prosecution case value tree: case, defendants, offences and reporting
//! restrictions.

use chrono::NaiveDate;
use common::{CaseId, DefendantId, OffenceId, OrganisationId, ReportingRestrictionId};
use serde::{Deserialize, Serialize};

use super::{LaaReference, LegalAidStatus};

/// Lifecycle status of a prosecution case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    #[default]
    Active,
    Inactive,
    Ejected,
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStatus::Active => write!(f, "ACTIVE"),
            CaseStatus::Inactive => write!(f, "INACTIVE"),
            CaseStatus::Ejected => write!(f, "EJECTED"),
        }
    }
}

/// A prosecution case with its defendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProsecutionCase {
    pub id: CaseId,
    /// Unique reference number issued by the prosecuting authority.
    pub urn: String,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub defendants: Vec<Defendant>,
}

impl ProsecutionCase {
    pub fn new(id: CaseId, urn: impl Into<String>) -> Self {
        Self {
            id,
            urn: urn.into(),
            status: CaseStatus::Active,
            defendants: Vec::new(),
        }
    }

    pub fn with_defendant(mut self, defendant: Defendant) -> Self {
        self.defendants.push(defendant);
        self
    }

    pub fn defendant(&self, defendant_id: DefendantId) -> Option<&Defendant> {
        self.defendants.iter().find(|d| d.id == defendant_id)
    }
}

/// An organisation acting for a defendant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenceOrganisation {
    pub organisation_id: OrganisationId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laa_contract_number: Option<String>,
}

/// A defendant on a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defendant {
    pub id: DefendantId,
    pub name: String,
    #[serde(default)]
    pub offences: Vec<Offence>,
    #[serde(default)]
    pub legal_aid_status: LegalAidStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defence_organisation: Option<DefenceOrganisation>,
    /// The current association came through a representation order and can
    /// only be removed by the legal aid workflow.
    #[serde(default)]
    pub locked_by_representation_order: bool,
    /// The current association was made on the LAA's behalf.
    #[serde(default)]
    pub associated_by_laa: bool,
}

impl Defendant {
    pub fn new(id: DefendantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            offences: Vec::new(),
            legal_aid_status: LegalAidStatus::NoValue,
            defence_organisation: None,
            locked_by_representation_order: false,
            associated_by_laa: false,
        }
    }

    pub fn with_offence(mut self, offence: Offence) -> Self {
        self.offences.push(offence);
        self
    }

    pub fn offence(&self, offence_id: OffenceId) -> Option<&Offence> {
        self.offences.iter().find(|o| o.id == offence_id)
    }
}

/// An offence charged against a defendant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offence {
    pub id: OffenceId,
    pub offence_code: String,
    pub wording: String,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laa_reference: Option<LaaReference>,
    #[serde(default)]
    pub reporting_restrictions: Vec<ReportingRestriction>,
}

impl Offence {
    pub fn new(id: OffenceId, offence_code: impl Into<String>, wording: impl Into<String>) -> Self {
        Self {
            id,
            offence_code: offence_code.into(),
            wording: wording.into(),
            order_index: 0,
            laa_reference: None,
            reporting_restrictions: Vec::new(),
        }
    }

    pub fn with_restriction(mut self, restriction: ReportingRestriction) -> Self {
        self.reporting_restrictions.push(restriction);
        self
    }

    /// Status recorded by the offence's LAA reference, `NoValue` if none.
    pub fn legal_aid_status(&self) -> LegalAidStatus {
        self.laa_reference
            .as_ref()
            .map(LaaReference::legal_aid_status)
            .unwrap_or_default()
    }
}

/// A restriction on what may be reported about an offence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingRestriction {
    pub id: ReportingRestrictionId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered_date: Option<NaiveDate>,
}

impl ReportingRestriction {
    pub fn new(id: ReportingRestrictionId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            ordered_date: None,
        }
    }
}
