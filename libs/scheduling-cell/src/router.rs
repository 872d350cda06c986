// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::services::booking::AppointmentBookingService;

/// Appointment routes. The booking service is the shared state: one
/// instance per process, so its write lock serializes mutations across
/// every concurrent request.
pub fn appointment_routes(service: Arc<AppointmentBookingService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/", post(handlers::create_appointment))
        .route("/{id}", get(handlers::get_appointment))
        .route("/{id}", put(handlers::update_appointment))
        .route("/{id}", delete(handlers::delete_appointment))
        .with_state(service)
}
