//! Court application commands.

use common::{AggregateId, ApplicationId, HearingId};

use crate::command::Command;
use crate::model::{ApplicationStatus, CourtApplication};

use super::{ApplicationAggregate, ApplicationError, ApplicationEvent};

/// What a caller supplies to start proceedings for an application.
#[derive(Debug, Clone)]
pub struct ProceedingsRequest {
    pub court_application: CourtApplication,
    pub court_hearing: Option<HearingId>,
    pub is_sjp_case: bool,
    pub application_referred_to_new_hearing: bool,
    pub summons_approval_required: bool,
}

impl ProceedingsRequest {
    pub fn new(court_application: CourtApplication) -> Self {
        Self {
            court_application,
            court_hearing: None,
            is_sjp_case: false,
            application_referred_to_new_hearing: false,
            summons_approval_required: false,
        }
    }

    pub fn listed_in(mut self, hearing_id: HearingId) -> Self {
        self.court_hearing = Some(hearing_id);
        self
    }

    pub fn sjp(mut self) -> Self {
        self.is_sjp_case = true;
        self
    }

    pub fn referred_to_new_hearing(mut self) -> Self {
        self.application_referred_to_new_hearing = true;
        self
    }

    pub fn requiring_summons_approval(mut self) -> Self {
        self.summons_approval_required = true;
        self
    }
}

/// Command to initiate court application proceedings.
#[derive(Debug, Clone)]
pub struct InitiateCourtApplicationProceedings {
    pub request: ProceedingsRequest,
}

impl InitiateCourtApplicationProceedings {
    pub fn new(request: ProceedingsRequest) -> Self {
        Self { request }
    }
}

impl Command for InitiateCourtApplicationProceedings {
    type Aggregate = ApplicationAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.request.court_application.id.into()
    }

    fn handle(
        &self,
        application: &ApplicationAggregate,
    ) -> Result<Vec<ApplicationEvent>, ApplicationError> {
        application.initiate_proceedings(self.request.clone())
    }
}

/// Command to move an application to a new status.
#[derive(Debug, Clone)]
pub struct ChangeApplicationStatus {
    pub application_id: ApplicationId,
    pub status: ApplicationStatus,
}

impl ChangeApplicationStatus {
    pub fn new(application_id: ApplicationId, status: ApplicationStatus) -> Self {
        Self {
            application_id,
            status,
        }
    }
}

impl Command for ChangeApplicationStatus {
    type Aggregate = ApplicationAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.application_id.into()
    }

    fn handle(
        &self,
        application: &ApplicationAggregate,
    ) -> Result<Vec<ApplicationEvent>, ApplicationError> {
        application.change_status(self.status)
    }
}
