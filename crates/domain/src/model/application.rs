use common::{ApplicationId, CaseId};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a court application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    UnListed,
    Listed,
    Finalised,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ApplicationStatus::Draft => "DRAFT",
            ApplicationStatus::UnListed => "UN_LISTED",
            ApplicationStatus::Listed => "LISTED",
            ApplicationStatus::Finalised => "FINALISED",
        };
        write!(f, "{name}")
    }
}

/// An application made to the court, optionally linked to cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtApplication {
    pub id: ApplicationId,
    pub application_reference: String,
    pub application_type: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub linked_case_ids: Vec<CaseId>,
}

impl CourtApplication {
    pub fn new(
        id: ApplicationId,
        application_reference: impl Into<String>,
        application_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            application_reference: application_reference.into(),
            application_type: application_type.into(),
            status: ApplicationStatus::Draft,
            linked_case_ids: Vec::new(),
        }
    }
}
