//! Hearing read model: the reconciled hearing record plus the link table
//! of which case defendants are listed in which hearing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CaseId, DefendantId, HearingId};
use domain::hearing::merge;
use domain::{DomainEvent, Hearing, HearingEvent, HearingExtension};
use event_store::EventEnvelope;
use tokio::sync::RwLock;

use super::links::{CaseDefendantHearingLinks, HearingLink};
use crate::projection::{Projection, ProjectionPosition, ReadModel};
use crate::{ProjectionError, Result};

/// Read model view of hearings and their case defendant links.
///
/// Handling is safe under redelivery: a repeated extension reconciles to the
/// same record, and link rows already removed are only logged.
#[derive(Clone)]
pub struct HearingView {
    hearings: Arc<RwLock<HashMap<HearingId, Hearing>>>,
    links: Arc<RwLock<CaseDefendantHearingLinks>>,
    position: Arc<RwLock<ProjectionPosition>>,
}

impl HearingView {
    /// Creates a new empty hearing view.
    pub fn new() -> Self {
        Self {
            hearings: Arc::new(RwLock::new(HashMap::new())),
            links: Arc::new(RwLock::new(CaseDefendantHearingLinks::new())),
            position: Arc::new(RwLock::new(ProjectionPosition::zero())),
        }
    }

    pub async fn get_hearing(&self, hearing_id: HearingId) -> Option<Hearing> {
        self.hearings.read().await.get(&hearing_id).cloned()
    }

    /// Hearings a defendant on a case is linked to.
    pub async fn hearings_for_defendant(
        &self,
        case_id: CaseId,
        defendant_id: DefendantId,
    ) -> Vec<HearingId> {
        self.links.read().await.hearings_for(case_id, defendant_id)
    }

    pub async fn links_for_hearing(&self, hearing_id: HearingId) -> Vec<HearingLink> {
        self.links.read().await.for_hearing(hearing_id)
    }

    pub async fn link_count(&self) -> usize {
        self.links.read().await.len()
    }

    async fn advance(&self) {
        let mut pos = self.position.write().await;
        *pos = pos.advance();
    }

    async fn on_initiated(&self, hearing: Hearing) {
        let mut hearings = self.hearings.write().await;
        let mut links = self.links.write().await;

        links.link_cases(hearing.id, &hearing.prosecution_cases);
        hearings.insert(hearing.id, hearing);
    }

    async fn on_extended(&self, hearing_id: HearingId, extension: HearingExtension) {
        let mut hearings = self.hearings.write().await;
        let mut links = self.links.write().await;

        let merged = match hearings.get(&hearing_id) {
            Some(stored) => Some(stored.extended_with(&extension)),
            None => {
                tracing::warn!(%hearing_id, "extension for unknown hearing; links only");
                None
            }
        };

        let requested = merge::dedupe_request(&extension.prosecution_cases);

        if extension.is_fully_allocated()
            && let Some(from) = extension.extended_hearing_from
        {
            for case in &requested {
                for defendant in &case.defendants {
                    let link = HearingLink::new(case.id, defendant.id, from);
                    if let Err(ProjectionError::LinkNotFound { .. }) = links.remove(link) {
                        metrics::counter!("projection_link_misses").increment(1);
                        tracing::warn!(
                            case_id = %case.id,
                            defendant_id = %defendant.id,
                            unallocated_hearing_id = %from,
                            "unallocated hearing link already removed"
                        );
                    }
                }
            }
        }

        if let Some(merged) = merged {
            hearings.insert(hearing_id, merged);
        }
        links.link_cases(hearing_id, &requested);
    }
}

impl Default for HearingView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Projection for HearingView {
    fn name(&self) -> &'static str {
        "HearingView"
    }

    async fn handle(&self, event: &EventEnvelope) -> Result<()> {
        if !HearingEvent::recognises(&event.event_type) {
            self.advance().await;
            return Ok(());
        }

        match serde_json::from_value(event.payload.clone())? {
            HearingEvent::HearingInitiated(data) => self.on_initiated(data.hearing).await,
            HearingEvent::HearingExtended(data) => {
                self.on_extended(data.hearing_id, data.extension).await
            }
        }

        self.advance().await;
        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        *self.position.read().await
    }

    async fn reset(&self) -> Result<()> {
        self.hearings.write().await.clear();
        self.links.write().await.clear();
        *self.position.write().await = ProjectionPosition::zero();
        Ok(())
    }
}

impl ReadModel for HearingView {
    fn name(&self) -> &'static str {
        "HearingView"
    }

    fn count(&self) -> usize {
        self.hearings.try_read().map(|h| h.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use common::CourtCentreId;
    use domain::{Defendant, ProsecutionCase};
    use event_store::Version;

    use super::*;

    fn make_envelope(hearing_id: HearingId, version: i64, event: &HearingEvent) -> EventEnvelope {
        EventEnvelope::builder()
            .stream_id(hearing_id)
            .aggregate_type("Hearing")
            .event_type(event.event_type())
            .version(Version::new(version))
            .payload(event)
            .unwrap()
            .build()
            .unwrap()
    }

    fn case(case_id: CaseId, defendant_id: DefendantId) -> ProsecutionCase {
        ProsecutionCase::new(case_id, "URN").with_defendant(Defendant::new(defendant_id, "Alex Kerr"))
    }

    #[tokio::test]
    async fn test_initiated_hearing_links_defendants() {
        let view = HearingView::new();
        let hearing_id = HearingId::new();
        let (case_id, defendant_id) = (CaseId::new(), DefendantId::new());
        let hearing = Hearing::new(hearing_id, CourtCentreId::new(), "Trial")
            .with_case(case(case_id, defendant_id));

        view.handle(&make_envelope(hearing_id, 1, &HearingEvent::initiated(hearing)))
            .await
            .unwrap();

        assert!(view.get_hearing(hearing_id).await.is_some());
        assert_eq!(
            view.hearings_for_defendant(case_id, defendant_id).await,
            vec![hearing_id]
        );
        assert_eq!(view.position().await.events_processed, 1);
    }

    #[tokio::test]
    async fn test_fully_allocated_extension_moves_links() {
        let view = HearingView::new();
        let (source, target) = (HearingId::new(), HearingId::new());
        let (case_id, defendant_id) = (CaseId::new(), DefendantId::new());

        let unallocated = Hearing::new(source, CourtCentreId::new(), "Trial")
            .with_case(case(case_id, defendant_id));
        view.handle(&make_envelope(source, 1, &HearingEvent::initiated(unallocated)))
            .await
            .unwrap();
        view.handle(&make_envelope(
            target,
            1,
            &HearingEvent::initiated(Hearing::new(target, CourtCentreId::new(), "Trial")),
        ))
        .await
        .unwrap();

        let extension = HearingExtension {
            prosecution_cases: vec![case(case_id, defendant_id)],
            extended_hearing_from: Some(source),
            ..HearingExtension::default()
        };
        view.handle(&make_envelope(target, 2, &HearingEvent::extended(target, extension)))
            .await
            .unwrap();

        assert_eq!(
            view.hearings_for_defendant(case_id, defendant_id).await,
            vec![target]
        );
        assert_eq!(
            view.get_hearing(target).await.unwrap().prosecution_cases.len(),
            1
        );
    }

    #[tokio::test]
    async fn test_adjourned_extension_keeps_source_links() {
        let view = HearingView::new();
        let (source, target) = (HearingId::new(), HearingId::new());
        let (case_id, defendant_id) = (CaseId::new(), DefendantId::new());
        let initiated = Hearing::new(source, CourtCentreId::new(), "Trial")
            .with_case(case(case_id, defendant_id));
        view.handle(&make_envelope(source, 1, &HearingEvent::initiated(initiated)))
            .await
            .unwrap();
        view.handle(&make_envelope(
            target,
            1,
            &HearingEvent::initiated(Hearing::new(target, CourtCentreId::new(), "Trial")),
        ))
        .await
        .unwrap();

        let extension = HearingExtension {
            prosecution_cases: vec![case(case_id, defendant_id)],
            extended_hearing_from: Some(source),
            is_adjourned: true,
            ..HearingExtension::default()
        };
        view.handle(&make_envelope(target, 2, &HearingEvent::extended(target, extension)))
            .await
            .unwrap();

        let mut linked = view.hearings_for_defendant(case_id, defendant_id).await;
        linked.sort();
        let mut expected = vec![source, target];
        expected.sort();
        assert_eq!(linked, expected);
    }

    #[tokio::test]
    async fn test_redelivered_extension_is_harmless() {
        let view = HearingView::new();
        let (source, target) = (HearingId::new(), HearingId::new());
        let (case_id, defendant_id) = (CaseId::new(), DefendantId::new());
        view.handle(&make_envelope(
            target,
            1,
            &HearingEvent::initiated(Hearing::new(target, CourtCentreId::new(), "Trial")),
        ))
        .await
        .unwrap();

        let extended = HearingEvent::extended(
            target,
            HearingExtension {
                prosecution_cases: vec![case(case_id, defendant_id)],
                extended_hearing_from: Some(source),
                ..HearingExtension::default()
            },
        );
        let envelope = make_envelope(target, 2, &extended);
        view.handle(&envelope).await.unwrap();
        let once = view.get_hearing(target).await;
        view.handle(&envelope).await.unwrap();

        assert_eq!(view.get_hearing(target).await, once);
        assert_eq!(view.link_count().await, 1);
    }

    #[tokio::test]
    async fn test_extension_of_unknown_hearing_still_links() {
        let view = HearingView::new();
        let hearing_id = HearingId::new();
        let (case_id, defendant_id) = (CaseId::new(), DefendantId::new());
        let extension = HearingExtension {
            prosecution_cases: vec![case(case_id, defendant_id)],
            ..HearingExtension::default()
        };

        view.handle(&make_envelope(
            hearing_id,
            1,
            &HearingEvent::extended(hearing_id, extension),
        ))
        .await
        .unwrap();

        assert!(view.get_hearing(hearing_id).await.is_none());
        assert_eq!(
            view.hearings_for_defendant(case_id, defendant_id).await,
            vec![hearing_id]
        );
    }

    #[tokio::test]
    async fn test_other_events_only_advance_position() {
        let view = HearingView::new();
        let envelope = EventEnvelope::builder()
            .stream_id(CaseId::new())
            .aggregate_type("ProsecutionCase")
            .event_type("CaseEjected")
            .version(Version::new(1))
            .payload_raw(serde_json::json!({"type": "CaseEjected", "data": {}}))
            .build()
            .unwrap();

        view.handle(&envelope).await.unwrap();

        assert_eq!(view.position().await.events_processed, 1);
        assert_eq!(ReadModel::count(&view), 0);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let view = HearingView::new();
        let hearing_id = HearingId::new();
        let hearing = Hearing::new(hearing_id, CourtCentreId::new(), "Trial")
            .with_case(case(CaseId::new(), DefendantId::new()));
        view.handle(&make_envelope(hearing_id, 1, &HearingEvent::initiated(hearing)))
            .await
            .unwrap();

        view.reset().await.unwrap();

        assert!(view.get_hearing(hearing_id).await.is_none());
        assert_eq!(view.link_count().await, 0);
        assert_eq!(view.position().await, ProjectionPosition::zero());
    }
}
