// libs/scheduling-cell/src/services/conflict.rs
use chrono::{DateTime, Datelike, Duration, Utc};
use tracing::debug;

use shared_models::appointment::{Appointment, AppointmentDraft};

use crate::models::{ConflictCheckResult, SchedulePolicy};

/// Conflict screening and alternative-slot search. Pure functions of the
/// policy and the appointment sets handed in; the store and the write lock
/// live in the booking service.
pub struct ConflictDetectionService {
    policy: SchedulePolicy,
}

impl ConflictDetectionService {
    pub fn new(policy: SchedulePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    /// Screen a candidate against the stored appointments and, when it
    /// collides, propose up to `max_alternatives` free start times.
    ///
    /// `existing` is expected to cover at least the candidate's search
    /// window; the same set doubles as the busy intervals the sweep avoids.
    pub fn check_conflicts(
        &self,
        candidate: &AppointmentDraft,
        existing: &[Appointment],
    ) -> ConflictCheckResult {
        let candidate_end = candidate.end_time();
        debug!(
            "Checking conflicts for {} from {} to {}",
            candidate.professional_name, candidate.start_time, candidate_end
        );

        let conflicting_appointments: Vec<Appointment> = existing
            .iter()
            .filter(|a| {
                Self::overlaps_inclusive(
                    candidate.start_time,
                    candidate_end,
                    a.start_time,
                    a.end_time(),
                )
            })
            .cloned()
            .collect();

        let has_conflict = !conflicting_appointments.is_empty();

        let alternative_times = if has_conflict {
            self.generate_alternative_slots(candidate, existing)
        } else {
            vec![]
        };

        ConflictCheckResult {
            has_conflict,
            conflicting_appointments,
            alternative_times,
        }
    }

    /// Inclusive overlap rule for the initial screen: intervals that merely
    /// touch at an endpoint still conflict.
    pub fn overlaps_inclusive(
        start1: DateTime<Utc>,
        end1: DateTime<Utc>,
        start2: DateTime<Utc>,
        end2: DateTime<Utc>,
    ) -> bool {
        start1 <= end2 && start2 <= end1
    }

    /// The candidate's search window: midnight of its date through the end
    /// of the horizon. Appointments intersecting this range are the busy set
    /// for the sweep.
    pub fn search_window(&self, candidate: &AppointmentDraft) -> (DateTime<Utc>, DateTime<Utc>) {
        let window_start = candidate
            .start_time
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        let window_end = window_start + Duration::days(self.policy.search_horizon_days);
        (window_start, window_end)
    }

    /// Sweep the working calendar for free slots of the candidate's duration.
    ///
    /// Day 0 scans from the candidate's own time-of-day (not clamped to
    /// opening time); later days from opening. Slot starts step by the
    /// policy step from the day's scan start, the last start lying strictly
    /// below closing minus the duration. A slot is free when it overlaps no
    /// busy interval under the strict rule, so a suggestion may butt directly
    /// against an existing booking. Results are chronological by
    /// construction and capped at `max_alternatives`.
    pub fn generate_alternative_slots(
        &self,
        candidate: &AppointmentDraft,
        busy: &[Appointment],
    ) -> Vec<DateTime<Utc>> {
        let duration = Duration::minutes(candidate.duration_minutes);
        let step = Duration::minutes(self.policy.slot_step_minutes);
        let candidate_date = candidate.start_time.date_naive();

        let busy_times: Vec<(DateTime<Utc>, DateTime<Utc>)> =
            busy.iter().map(|a| (a.start_time, a.end_time())).collect();

        let mut alternatives = Vec::new();

        for day in 0..self.policy.search_horizon_days {
            if alternatives.len() >= self.policy.max_alternatives {
                break;
            }

            let check_date = candidate_date + Duration::days(day);
            if !self.policy.work_days.contains(&check_date.weekday()) {
                continue;
            }

            let scan_start = if day == 0 {
                candidate.start_time
            } else {
                check_date.and_time(self.policy.work_start).and_utc()
            };
            let day_end = check_date.and_time(self.policy.work_end).and_utc() - duration;

            let mut current = scan_start;
            while current < day_end && alternatives.len() < self.policy.max_alternatives {
                let potential_end = current + duration;

                let blocked = busy_times
                    .iter()
                    .any(|(busy_start, busy_end)| current < *busy_end && potential_end > *busy_start);
                if !blocked {
                    alternatives.push(current);
                }

                current += step;
            }
        }

        debug!(
            "Generated {} alternative slots for candidate at {}",
            alternatives.len(),
            candidate.start_time
        );

        alternatives
    }
}
