//! Legal aid statuses and the LAA reference recorded against an offence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Legal aid status of an offence, or of a defendant across their offences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalAidStatus {
    Granted,
    Refused,
    Withdrawn,
    #[default]
    NoValue,
}

impl LegalAidStatus {
    /// Rank used when folding offence statuses into a defendant status.
    fn precedence(self) -> u8 {
        match self {
            LegalAidStatus::Granted => 3,
            LegalAidStatus::Refused => 2,
            LegalAidStatus::Withdrawn => 1,
            LegalAidStatus::NoValue => 0,
        }
    }

    /// Maps an LAA status description onto a status, ignoring case.
    ///
    /// Anything unrecognised maps to `NoValue`.
    pub fn from_description(description: &str) -> Self {
        let description = description.trim();
        if description.eq_ignore_ascii_case("granted") {
            LegalAidStatus::Granted
        } else if description.eq_ignore_ascii_case("refused") {
            LegalAidStatus::Refused
        } else if description.eq_ignore_ascii_case("withdrawn") {
            LegalAidStatus::Withdrawn
        } else {
            LegalAidStatus::NoValue
        }
    }

    /// Folds offence statuses into a single defendant status.
    ///
    /// Granted beats Refused beats Withdrawn; no statuses at all yields
    /// `NoValue`.
    pub fn aggregate(statuses: impl IntoIterator<Item = LegalAidStatus>) -> Self {
        statuses
            .into_iter()
            .max_by_key(|status| status.precedence())
            .unwrap_or_default()
    }

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            LegalAidStatus::Granted => "GRANTED",
            LegalAidStatus::Refused => "REFUSED",
            LegalAidStatus::Withdrawn => "WITHDRAWN",
            LegalAidStatus::NoValue => "NO_VALUE",
        }
    }
}

impl std::fmt::Display for LegalAidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Legal Aid Agency decision recorded against one offence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaaReference {
    pub application_reference: String,
    pub status_id: Uuid,
    pub status_code: String,
    pub status_description: String,
    pub status_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laa_contract_number: Option<String>,
}

impl LaaReference {
    /// Returns the legal aid status this reference records.
    pub fn legal_aid_status(&self) -> LegalAidStatus {
        LegalAidStatus::from_description(&self.status_description)
    }
}
