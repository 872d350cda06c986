use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Minimum and maximum bookable duration, in minutes.
pub const MIN_DURATION_MINUTES: i64 = 15;
pub const MAX_DURATION_MINUTES: i64 = 240;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_name: String,
    pub professional_name: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub description: Option<String>,
}

impl Appointment {
    /// Scheduled end time derived from start and duration.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes)
    }
}

/// Client-submitted appointment, before the store has assigned an id.
/// Doubles as the create/update request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub patient_name: String,
    pub professional_name: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub description: Option<String>,
}

impl AppointmentDraft {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes)
    }

    /// Boundary validation. Runs before the scheduling engine is invoked;
    /// a draft that fails here never reaches the serialized section.
    pub fn validate(&self) -> Result<(), String> {
        if self.patient_name.trim().is_empty() {
            return Err("patient_name is required".to_string());
        }
        if self.patient_name.chars().count() > MAX_NAME_LENGTH {
            return Err(format!(
                "patient_name must be at most {} characters",
                MAX_NAME_LENGTH
            ));
        }
        if self.professional_name.trim().is_empty() {
            return Err("professional_name is required".to_string());
        }
        if self.professional_name.chars().count() > MAX_NAME_LENGTH {
            return Err(format!(
                "professional_name must be at most {} characters",
                MAX_NAME_LENGTH
            ));
        }
        if self.duration_minutes < MIN_DURATION_MINUTES
            || self.duration_minutes > MAX_DURATION_MINUTES
        {
            return Err(format!(
                "duration_minutes must be between {} and {}",
                MIN_DURATION_MINUTES, MAX_DURATION_MINUTES
            ));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(format!(
                    "description must be at most {} characters",
                    MAX_DESCRIPTION_LENGTH
                ));
            }
        }
        Ok(())
    }

    /// Materialize the draft into a stored appointment with an assigned id.
    pub fn into_appointment(self, id: i64) -> Appointment {
        Appointment {
            id,
            patient_name: self.patient_name,
            professional_name: self.professional_name,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            description: self.description,
        }
    }
}
