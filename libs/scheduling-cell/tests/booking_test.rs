// libs/scheduling-cell/tests/booking_test.rs
//
// Booking service semantics against the in-memory store: serialized
// check-then-write, the create/update asymmetry, and the not-found paths.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{DateTime, TimeZone, Utc};
use futures::future::join_all;
use tokio_test::assert_ok;

use scheduling_cell::models::{AppointmentError, ConflictScope, SchedulePolicy};
use scheduling_cell::services::booking::AppointmentBookingService;
use shared_models::appointment::AppointmentDraft;
use shared_store::{AppointmentStore, MemoryAppointmentStore};

fn monday(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
}

fn draft(professional: &str, start: DateTime<Utc>, duration_minutes: i64) -> AppointmentDraft {
    AppointmentDraft {
        patient_name: "Iam Sick".to_string(),
        professional_name: professional.to_string(),
        start_time: start,
        duration_minutes,
        description: Some("Regular checkup".to_string()),
    }
}

fn service() -> AppointmentBookingService {
    AppointmentBookingService::new(Arc::new(MemoryAppointmentStore::new()))
}

#[tokio::test]
async fn create_into_empty_store_succeeds() {
    let service = service();

    let appointment = service.create(draft("Dr. Smith", monday(10, 0), 30)).await.unwrap();

    assert_eq!(appointment.id, 1);
    assert_eq!(appointment.patient_name, "Iam Sick");
    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn overlapping_create_is_rejected_with_alternatives() {
    let service = service();
    service.create(draft("Dr. Smith", monday(10, 0), 30)).await.unwrap();

    let err = service
        .create(draft("Dr. Jones", monday(10, 15), 30))
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::ConflictDetected { ref alternative_times } => {
        assert_eq!(alternative_times.len(), 3);
    });
    // The rejected candidate was never persisted.
    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn touching_boundary_is_rejected() {
    let service = service();
    assert_ok!(service.create(draft("Dr. Smith", monday(10, 0), 30)).await);

    // Starts exactly where the existing booking ends: inclusive screen.
    let err = service
        .create(draft("Dr. Smith", monday(10, 30), 30))
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::ConflictDetected { .. });
}

#[tokio::test]
async fn different_professionals_share_slots_under_per_professional_scope() {
    let policy = SchedulePolicy {
        scope: ConflictScope::PerProfessional,
        ..SchedulePolicy::default()
    };
    let service =
        AppointmentBookingService::with_policy(Arc::new(MemoryAppointmentStore::new()), policy);

    service.create(draft("Dr. Smith", monday(10, 0), 30)).await.unwrap();

    // Same slot, different professional: allowed under the scoped screen.
    service.create(draft("Dr. Jones", monday(10, 0), 30)).await.unwrap();

    // Same professional still conflicts.
    let err = service
        .create(draft("Dr. Smith", monday(10, 0), 30))
        .await
        .unwrap_err();
    assert_matches!(err, AppointmentError::ConflictDetected { .. });
}

#[tokio::test]
async fn update_of_missing_id_reports_not_found_without_mutation() {
    let service = service();
    service.create(draft("Dr. Smith", monday(10, 0), 30)).await.unwrap();

    let err = service
        .update(9999, draft("Dr. Smith", monday(12, 0), 30))
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::NotFound);
    let stored = service.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].start_time, monday(10, 0));
}

#[tokio::test]
async fn update_replaces_all_fields_but_keeps_the_id() {
    let service = service();
    let created = service.create(draft("Dr. Smith", monday(10, 0), 30)).await.unwrap();

    let mut replacement = draft("Dr. Jones", monday(14, 0), 60);
    replacement.description = Some("Updated appointment".to_string());
    let updated = service.update(created.id, replacement).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.professional_name, "Dr. Jones");
    assert_eq!(updated.start_time, monday(14, 0));
    assert_eq!(updated.duration_minutes, 60);
    assert_eq!(updated.description.as_deref(), Some("Updated appointment"));
}

#[tokio::test]
async fn update_does_not_rescreen_against_other_appointments() {
    // Only create rejects on overlap; moving an existing booking onto an
    // occupied slot goes through.
    let service = service();
    service.create(draft("Dr. Smith", monday(10, 0), 30)).await.unwrap();
    let second = service.create(draft("Dr. Smith", monday(12, 0), 30)).await.unwrap();

    let moved = service
        .update(second.id, draft("Dr. Smith", monday(10, 0), 30))
        .await
        .unwrap();

    assert_eq!(moved.start_time, monday(10, 0));
}

#[tokio::test]
async fn delete_reports_presence_and_removes() {
    let service = service();
    let created = service.create(draft("Dr. Smith", monday(10, 0), 30)).await.unwrap();

    assert!(service.delete(created.id).await.unwrap());
    assert!(!service.delete(created.id).await.unwrap());
    assert!(service.get(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn get_is_idempotent_without_mutation() {
    let service = service();
    let created = service.create(draft("Dr. Smith", monday(10, 0), 30)).await.unwrap();

    let first = service.get(created.id).await.unwrap().unwrap();
    let second = service.get(created.id).await.unwrap().unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.start_time, second.start_time);
    assert_eq!(first.duration_minutes, second.duration_minutes);
}

#[tokio::test]
async fn racing_creates_for_the_same_slot_admit_exactly_one() {
    // Eight tasks race the same slot through one shared service. The write
    // lock serializes the screen-then-insert sequences, so exactly one
    // winner commits no matter the interleaving.
    let service = Arc::new(service());

    let attempts = (0..8).map(|i| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .create(AppointmentDraft {
                    patient_name: format!("Patient {}", i),
                    professional_name: "Dr. Smith".to_string(),
                    start_time: monday(10, 0),
                    duration_minutes: 30,
                    description: None,
                })
                .await
        })
    });

    let outcomes = join_all(attempts).await;
    let successes = outcomes
        .into_iter()
        .map(|joined| joined.unwrap())
        .filter(|outcome| outcome.is_ok())
        .count();

    assert_eq!(successes, 1);
    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_of_missing_id_never_touches_the_store() {
    use async_trait::async_trait;

    mockall::mock! {
        Store {}

        #[async_trait]
        impl AppointmentStore for Store {
            async fn insert(&self, draft: AppointmentDraft) -> anyhow::Result<shared_models::appointment::Appointment>;
            async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<shared_models::appointment::Appointment>>;
            async fn update(&self, appointment: shared_models::appointment::Appointment) -> anyhow::Result<()>;
            async fn remove(&self, id: i64) -> anyhow::Result<bool>;
            async fn list_all(&self) -> anyhow::Result<Vec<shared_models::appointment::Appointment>>;
            async fn find_intersecting(
                &self,
                range_start: DateTime<Utc>,
                range_end: DateTime<Utc>,
                professional: Option<String>,
            ) -> anyhow::Result<Vec<shared_models::appointment::Appointment>>;
        }
    }

    let mut store = MockStore::new();
    store.expect_find_by_id().returning(|_| Ok(None));
    store.expect_update().times(0);

    let service = AppointmentBookingService::new(Arc::new(store));
    let err = service
        .update(42, draft("Dr. Smith", monday(10, 0), 30))
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::NotFound);
}
