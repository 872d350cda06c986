// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use shared_models::appointment::Appointment;

// ==============================================================================
// SCHEDULING POLICY
// ==============================================================================

/// Which appointments count when screening a candidate for overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictScope {
    /// Every stored appointment blocks the slot, regardless of professional.
    AllProfessionals,
    /// Only appointments of the candidate's professional block the slot.
    PerProfessional,
}

/// Working-calendar constants driving conflict screening and the
/// alternative-slot sweep. Passed to the engine at construction; nothing in
/// the scheduling path reads global state.
#[derive(Debug, Clone)]
pub struct SchedulePolicy {
    pub work_days: Vec<Weekday>,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub search_horizon_days: i64,
    pub slot_step_minutes: i64,
    pub max_alternatives: usize,
    pub scope: ConflictScope,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            work_days: vec![
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
            ],
            work_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            search_horizon_days: 14,
            slot_step_minutes: 30,
            max_alternatives: 3,
            scope: ConflictScope::AllProfessionals,
        }
    }
}

// ==============================================================================
// CONFLICT DETECTION MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResult {
    pub has_conflict: bool,
    pub conflicting_appointments: Vec<Appointment>,
    pub alternative_times: Vec<DateTime<Utc>>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Cannot create appointment due to scheduling conflict.")]
    ConflictDetected {
        alternative_times: Vec<DateTime<Utc>>,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
