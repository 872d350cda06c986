use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shared_models::appointment::{Appointment, AppointmentDraft};

pub mod memory;

pub use memory::MemoryAppointmentStore;

/// Persistence contract for appointments. Any ordered store satisfying this
/// trait can back the scheduling engine; the engine never assumes more than
/// what is listed here. The store itself does not enforce overlap freedom —
/// serialization of check-then-write sequences is the engine's job.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Persist a draft, assigning the next free id.
    async fn insert(&self, draft: AppointmentDraft) -> Result<Appointment>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>>;

    /// Replace the stored record carrying `appointment.id`.
    async fn update(&self, appointment: Appointment) -> Result<()>;

    /// Remove by id, reporting whether a record was present.
    async fn remove(&self, id: i64) -> Result<bool>;

    /// All appointments in id order.
    async fn list_all(&self) -> Result<Vec<Appointment>>;

    /// All appointments whose interval intersects `[range_start, range_end]`,
    /// boundaries included, ascending by start time. `professional` narrows
    /// the scan to a single professional's bookings when set.
    async fn find_intersecting(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        professional: Option<String>,
    ) -> Result<Vec<Appointment>>;
}
