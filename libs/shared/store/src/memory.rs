use std::collections::BTreeMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use shared_models::appointment::{Appointment, AppointmentDraft};

use crate::AppointmentStore;

/// In-memory appointment store. Ids are assigned sequentially starting at 1.
/// Suitable as the single-process backing store and as the test double for
/// anything consuming [`AppointmentStore`].
pub struct MemoryAppointmentStore {
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    next_id: i64,
    appointments: BTreeMap<i64, Appointment>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                next_id: 1,
                appointments: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemoryAppointmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn insert(&self, draft: AppointmentDraft) -> Result<Appointment> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let appointment = draft.into_appointment(id);
        inner.appointments.insert(id, appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        let inner = self.inner.read().await;
        Ok(inner.appointments.get(&id).cloned())
    }

    async fn update(&self, appointment: Appointment) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.appointments.contains_key(&appointment.id) {
            bail!("appointment {} not found", appointment.id);
        }
        inner.appointments.insert(appointment.id, appointment);
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.appointments.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(inner.appointments.values().cloned().collect())
    }

    async fn find_intersecting(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        professional: Option<String>,
    ) -> Result<Vec<Appointment>> {
        let inner = self.inner.read().await;
        let mut matches: Vec<Appointment> = inner
            .appointments
            .values()
            .filter(|a| a.start_time <= range_end && a.end_time() >= range_start)
            .filter(|a| {
                professional
                    .as_deref()
                    .map_or(true, |name| a.professional_name == name)
            })
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.start_time);
        Ok(matches)
    }
}
