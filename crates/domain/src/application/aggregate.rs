//! Court application aggregate implementation.

use common::{AggregateId, HearingId};
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::model::{ApplicationStatus, CourtApplication};

use super::{
    ApplicationError, ApplicationEvent, ProceedingsRequest,
    events::CourtApplicationProceedingsInitiatedData,
};

/// Court application aggregate root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationAggregate {
    #[serde(default)]
    version: Version,

    court_application: Option<CourtApplication>,

    /// Set once proceedings have been initiated; never cleared.
    proceedings_initiated: bool,

    court_hearing: Option<HearingId>,

    is_sjp_case: bool,
}

impl Aggregate for ApplicationAggregate {
    type Event = ApplicationEvent;
    type Error = ApplicationError;

    fn aggregate_type() -> &'static str {
        "CourtApplication"
    }

    fn id(&self) -> Option<AggregateId> {
        self.court_application.as_ref().map(|a| a.id.into())
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            ApplicationEvent::CourtApplicationProceedingsInitiated(data) => {
                self.apply_proceedings_initiated(data)
            }
            ApplicationEvent::CourtApplicationProceedingsInitiateIgnored(_) => {}
            ApplicationEvent::CourtApplicationStatusChanged(data) => {
                if let Some(application) = self.court_application.as_mut() {
                    application.status = data.status;
                }
            }
        }
    }
}

// Query methods
impl ApplicationAggregate {
    pub fn court_application(&self) -> Option<&CourtApplication> {
        self.court_application.as_ref()
    }

    pub fn proceedings_initiated(&self) -> bool {
        self.proceedings_initiated
    }

    pub fn court_hearing(&self) -> Option<HearingId> {
        self.court_hearing
    }

    pub fn is_sjp_case(&self) -> bool {
        self.is_sjp_case
    }
}

// Command methods - these validate and return events
impl ApplicationAggregate {
    /// Starts proceedings for an application.
    ///
    /// Once initiated, every further request produces a single ignored event
    /// regardless of its contents.
    pub fn initiate_proceedings(
        &self,
        request: ProceedingsRequest,
    ) -> Result<Vec<ApplicationEvent>, ApplicationError> {
        if self.proceedings_initiated {
            tracing::info!(
                application_id = %request.court_application.id,
                "proceedings already initiated"
            );
            return Ok(vec![ApplicationEvent::proceedings_initiate_ignored(
                request.court_application.id,
                request.court_hearing,
            )]);
        }

        if request.court_application.application_reference.trim().is_empty() {
            return Err(ApplicationError::ReferenceRequired);
        }

        Ok(vec![ApplicationEvent::proceedings_initiated(
            request.court_application,
            request.court_hearing,
            request.is_sjp_case,
            request.application_referred_to_new_hearing,
            request.summons_approval_required,
        )])
    }

    pub fn change_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<ApplicationEvent>, ApplicationError> {
        let Some(application) = self.court_application.as_ref() else {
            tracing::warn!(%status, "status change for uninitiated application ignored");
            return Ok(vec![]);
        };

        if application.status == status {
            return Ok(vec![]);
        }

        if application.status == ApplicationStatus::Finalised {
            return Err(ApplicationError::AlreadyFinalised {
                application_id: application.id,
            });
        }

        Ok(vec![ApplicationEvent::status_changed(
            application.id,
            application.status,
            status,
        )])
    }
}

// Apply event helpers
impl ApplicationAggregate {
    fn apply_proceedings_initiated(&mut self, data: CourtApplicationProceedingsInitiatedData) {
        self.court_application = Some(data.court_application);
        self.court_hearing = data.court_hearing;
        self.is_sjp_case = data.is_sjp_case;
        self.proceedings_initiated = true;
    }
}

#[cfg(test)]
mod tests {
    use common::ApplicationId;

    use super::*;
    use crate::aggregate::reconstitute;

    fn request() -> ProceedingsRequest {
        ProceedingsRequest::new(CourtApplication::new(
            ApplicationId::new(),
            "CJ03510",
            "Breach of community order",
        ))
    }

    #[test]
    fn test_first_initiation_emits_initiated() {
        let events = ApplicationAggregate::default()
            .initiate_proceedings(request())
            .unwrap();
        assert!(matches!(
            events[..],
            [ApplicationEvent::CourtApplicationProceedingsInitiated(_)]
        ));
    }

    #[test]
    fn test_repeat_initiation_is_ignored() {
        let application: ApplicationAggregate = reconstitute(
            ApplicationAggregate::default()
                .initiate_proceedings(request())
                .unwrap(),
        );
        assert!(application.proceedings_initiated());

        let events = application.initiate_proceedings(request()).unwrap();
        assert!(matches!(
            events[..],
            [ApplicationEvent::CourtApplicationProceedingsInitiateIgnored(_)]
        ));
    }

    #[test]
    fn test_reference_is_required() {
        let mut request = request();
        request.court_application.application_reference = String::new();
        assert!(matches!(
            ApplicationAggregate::default().initiate_proceedings(request),
            Err(ApplicationError::ReferenceRequired)
        ));
    }

    #[test]
    fn test_status_change() {
        let mut application: ApplicationAggregate = reconstitute(
            ApplicationAggregate::default()
                .initiate_proceedings(request())
                .unwrap(),
        );

        assert!(
            application
                .change_status(ApplicationStatus::Draft)
                .unwrap()
                .is_empty()
        );

        let events = application.change_status(ApplicationStatus::Listed).unwrap();
        application.apply_events(events);
        assert_eq!(
            application.court_application().unwrap().status,
            ApplicationStatus::Listed
        );
    }

    #[test]
    fn test_finalised_application_cannot_change() {
        let mut application: ApplicationAggregate = reconstitute(
            ApplicationAggregate::default()
                .initiate_proceedings(request())
                .unwrap(),
        );
        application.apply_events(
            application
                .change_status(ApplicationStatus::Finalised)
                .unwrap(),
        );

        assert!(matches!(
            application.change_status(ApplicationStatus::Listed),
            Err(ApplicationError::AlreadyFinalised { .. })
        ));
    }
}
