// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared_models::appointment::{Appointment, AppointmentDraft};
use shared_store::AppointmentStore;

use crate::models::{AppointmentError, ConflictScope, SchedulePolicy};
use crate::services::conflict::ConflictDetectionService;

/// Orchestrates appointment CRUD against the store and serializes every
/// mutating operation through a single process-wide lock, so the overlap
/// check and the subsequent write are atomic with respect to other
/// mutations. Constructed once at startup and shared behind an `Arc`.
pub struct AppointmentBookingService {
    store: Arc<dyn AppointmentStore>,
    conflict_service: ConflictDetectionService,
    // Serialization token for create/update/delete. Capacity one, never
    // reentrant, never held across another lock acquisition. Reads bypass it.
    write_lock: Mutex<()>,
}

impl AppointmentBookingService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self::with_policy(store, SchedulePolicy::default())
    }

    pub fn with_policy(store: Arc<dyn AppointmentStore>, policy: SchedulePolicy) -> Self {
        Self {
            store,
            conflict_service: ConflictDetectionService::new(policy),
            write_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> &SchedulePolicy {
        self.conflict_service.policy()
    }

    /// Create an appointment, rejecting it with alternative start times when
    /// it overlaps an existing booking. The conflict screen and the insert
    /// run under the write lock; the guard drops on every exit path.
    pub async fn create(
        &self,
        draft: AppointmentDraft,
    ) -> Result<Appointment, AppointmentError> {
        let _guard = self.write_lock.lock().await;

        let existing = self.appointments_in_window(&draft).await?;
        let check = self.conflict_service.check_conflicts(&draft, &existing);

        if check.has_conflict {
            warn!(
                "Conflict detected for {} at {} - {} overlapping appointments, {} alternatives",
                draft.professional_name,
                draft.start_time,
                check.conflicting_appointments.len(),
                check.alternative_times.len()
            );
            return Err(AppointmentError::ConflictDetected {
                alternative_times: check.alternative_times,
            });
        }

        let appointment = self
            .store
            .insert(draft)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!(
            "Booked appointment {} for {} at {}",
            appointment.id, appointment.professional_name, appointment.start_time
        );
        Ok(appointment)
    }

    /// Replace every field of an existing appointment except its id. The
    /// replacement is not re-screened against other bookings; only create
    /// rejects on overlap.
    pub async fn update(
        &self,
        id: i64,
        draft: AppointmentDraft,
    ) -> Result<Appointment, AppointmentError> {
        let _guard = self.write_lock.lock().await;

        let existing = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;
        if existing.is_none() {
            debug!("Update target {} not found", id);
            return Err(AppointmentError::NotFound);
        }

        let updated = draft.into_appointment(id);
        self.store
            .update(updated.clone())
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Updated appointment {}", id);
        Ok(updated)
    }

    /// Remove an appointment, reporting whether it existed.
    pub async fn delete(&self, id: i64) -> Result<bool, AppointmentError> {
        let _guard = self.write_lock.lock().await;

        let removed = self
            .store
            .remove(id)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if removed {
            info!("Deleted appointment {}", id);
        } else {
            debug!("Delete target {} not found", id);
        }
        Ok(removed)
    }

    /// Unserialized read. A get racing a write may observe either state.
    pub async fn get(&self, id: i64) -> Result<Option<Appointment>, AppointmentError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    /// Unserialized read of the full appointment list.
    pub async fn list(&self) -> Result<Vec<Appointment>, AppointmentError> {
        self.store
            .list_all()
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    /// Stored appointments intersecting the candidate's search window,
    /// optionally narrowed to the candidate's professional.
    async fn appointments_in_window(
        &self,
        draft: &AppointmentDraft,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let (window_start, window_end) = self.conflict_service.search_window(draft);
        let professional = match self.policy().scope {
            ConflictScope::AllProfessionals => None,
            ConflictScope::PerProfessional => Some(draft.professional_name.clone()),
        };

        self.store
            .find_intersecting(window_start, window_end, professional)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }
}
