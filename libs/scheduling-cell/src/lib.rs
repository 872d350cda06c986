pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

// Re-export commonly used types
pub use models::{AppointmentError, ConflictCheckResult, ConflictScope, SchedulePolicy};
pub use router::appointment_routes;
pub use services::{AppointmentBookingService, ConflictDetectionService};
