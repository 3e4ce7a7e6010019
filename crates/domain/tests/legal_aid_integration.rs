//! Integration tests for legal aid recording on the prosecution case
//! aggregate.
//!
//! These tests run commands through the service against an in-memory store
//! and verify the emitted cascade, the persisted stream and replay.

use chrono::NaiveDate;
use common::{CaseId, DefendantId, OffenceId, OrganisationId};
use domain::{
    Aggregate, AssociateDefenceOrganisation, CaseAggregate, CreateProsecutionCase, DefenceOrganisation,
    Defendant, DisassociateDefenceOrganisation, DomainError, EjectCase, LaaReference,
    LegalAidStatus, Offence, ProsecutionCase, ProsecutionCaseError, ProsecutionCaseService,
    RecordLaaReferenceForOffence,
};
use event_store::{EventStore, InMemoryEventStore, Version};
use uuid::Uuid;

struct Scenario {
    service: ProsecutionCaseService<InMemoryEventStore>,
    store: InMemoryEventStore,
    case_id: CaseId,
    defendant_id: DefendantId,
    first_offence: OffenceId,
    second_offence: OffenceId,
    organisation: DefenceOrganisation,
}

fn reference(description: &str) -> LaaReference {
    LaaReference {
        application_reference: "AB746921".to_string(),
        status_id: Uuid::new_v4(),
        status_code: description.chars().take(2).collect::<String>().to_uppercase(),
        status_description: description.to_string(),
        status_date: NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
        effective_start_date: NaiveDate::from_ymd_opt(2024, 5, 14),
        effective_end_date: None,
        laa_contract_number: Some("2C417M".to_string()),
    }
}

async fn scenario() -> Scenario {
    common::init_test_tracing();
    let store = InMemoryEventStore::new();
    let service = ProsecutionCaseService::new(store.clone());
    let case_id = CaseId::new();
    let defendant_id = DefendantId::new();
    let first_offence = OffenceId::new();
    let second_offence = OffenceId::new();

    let prosecution_case = ProsecutionCase::new(case_id, "32DN1212262").with_defendant(
        Defendant::new(defendant_id, "Casey Morgan")
            .with_offence(Offence::new(first_offence, "CA03012", "Common assault"))
            .with_offence(Offence::new(second_offence, "PL84504", "Possession of a bladed article")),
    );
    service
        .create_case(CreateProsecutionCase::new(prosecution_case))
        .await
        .unwrap();

    Scenario {
        service,
        store,
        case_id,
        defendant_id,
        first_offence,
        second_offence,
        organisation: DefenceOrganisation {
            organisation_id: OrganisationId::new(),
            name: "Whitcombe Legal LLP".to_string(),
            laa_contract_number: Some("2C417M".to_string()),
        },
    }
}

impl Scenario {
    async fn associate_by_representation_order(&self) {
        self.service
            .associate_defence_organisation(
                AssociateDefenceOrganisation::new(
                    self.case_id,
                    self.defendant_id,
                    self.organisation.clone(),
                )
                .by_representation_order(),
            )
            .await
            .unwrap();
    }

    async fn record(&self, offence_id: OffenceId, description: &str) -> Vec<&'static str> {
        self.service
            .record_laa_reference(RecordLaaReferenceForOffence::new(
                self.case_id,
                self.defendant_id,
                offence_id,
                reference(description),
            ))
            .await
            .unwrap()
            .event_types()
    }

    async fn reload(&self) -> CaseAggregate {
        self.service
            .handler()
            .load(self.case_id.into())
            .await
            .unwrap()
    }
}

mod cascade {
    use super::*;

    #[tokio::test]
    async fn grant_without_representation_emits_two_events() {
        let s = scenario().await;

        let types = s.record(s.first_offence, "Granted").await;

        assert_eq!(
            types,
            vec!["ProsecutionCaseOffencesUpdated", "OffencesForDefendantChanged"]
        );
        let case = s.reload().await;
        assert_eq!(
            case.defendant(s.defendant_id).unwrap().legal_aid_status,
            LegalAidStatus::Granted
        );
    }

    #[tokio::test]
    async fn refusal_of_only_grant_emits_full_cascade() {
        let s = scenario().await;
        s.associate_by_representation_order().await;

        let types = s.record(s.first_offence, "Refused").await;

        assert_eq!(types.len(), 6);
        assert_eq!(
            types,
            vec![
                "ProsecutionCaseOffencesUpdated",
                "OffencesForDefendantChanged",
                "DefendantLaaAssociationChanged",
                "DefendantLegalAidStatusUpdated",
                "DefendantDefenceOrganisationChanged",
                "DefendantDefenceOrganisationDisassociated",
            ]
        );

        let defendant = s.reload().await.defendant(s.defendant_id).cloned().unwrap();
        assert!(defendant.defence_organisation.is_none());
        assert_eq!(defendant.legal_aid_status, LegalAidStatus::Refused);
    }

    #[tokio::test]
    async fn refusal_with_another_grant_emits_reduced_cascade() {
        let s = scenario().await;
        s.associate_by_representation_order().await;
        s.record(s.second_offence, "Granted").await;

        let types = s.record(s.first_offence, "Withdrawn").await;

        assert_eq!(
            types,
            vec![
                "ProsecutionCaseOffencesUpdated",
                "OffencesForDefendantChanged",
                "DefendantLegalAidStatusUpdated",
            ]
        );
        let defendant = s.reload().await.defendant(s.defendant_id).cloned().unwrap();
        assert_eq!(
            defendant
                .defence_organisation
                .map(|org| org.organisation_id),
            Some(s.organisation.organisation_id)
        );
        assert_eq!(defendant.legal_aid_status, LegalAidStatus::Granted);
    }

    #[tokio::test]
    async fn unrecognised_description_records_no_value() {
        let s = scenario().await;

        s.record(s.first_offence, "Pending assessment").await;

        let case = s.reload().await;
        let defendant = case.defendant(s.defendant_id).unwrap();
        assert_eq!(defendant.legal_aid_status, LegalAidStatus::NoValue);
        assert!(defendant.offence(s.first_offence).unwrap().laa_reference.is_some());
    }
}

mod persistence {
    use super::*;

    #[tokio::test]
    async fn cascade_is_persisted_as_one_batch() {
        let s = scenario().await;
        s.associate_by_representation_order().await;

        s.record(s.first_offence, "Refused").await;

        let stored = s.store.load_stream(s.case_id.into()).await.unwrap();
        assert_eq!(stored.len(), 8);
        assert_eq!(
            stored.last().unwrap().event_type,
            "DefendantDefenceOrganisationDisassociated"
        );
        assert_eq!(s.reload().await.version(), Version::new(8));
    }

    #[tokio::test]
    async fn ejected_case_ignores_laa_references() {
        let s = scenario().await;
        s.service
            .eject_case(EjectCase::new(s.case_id, "Case discontinued"))
            .await
            .unwrap();

        let types = s.record(s.first_offence, "Granted").await;
        assert!(types.is_empty());

        let repeat = s
            .service
            .eject_case(EjectCase::new(s.case_id, "Case discontinued"))
            .await
            .unwrap();
        assert_eq!(repeat.event_types(), vec!["CaseEjectionIgnored"]);
    }

    #[tokio::test]
    async fn locked_association_cannot_be_removed_manually() {
        let s = scenario().await;
        s.associate_by_representation_order().await;

        let result = s
            .service
            .disassociate_defence_organisation(DisassociateDefenceOrganisation::new(
                s.case_id,
                s.defendant_id,
                s.organisation.organisation_id,
            ))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::ProsecutionCase(
                ProsecutionCaseError::AssociationLocked { .. }
            ))
        ));
    }
}
