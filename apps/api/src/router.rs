use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use scheduling_cell::router::appointment_routes;
use scheduling_cell::services::booking::AppointmentBookingService;

pub fn create_router(booking_service: Arc<AppointmentBookingService>) -> Router {
    Router::new()
        .route("/", get(|| async { "Medical appointment scheduler API is running!" }))
        .nest("/api/appointments", appointment_routes(booking_service))
}
