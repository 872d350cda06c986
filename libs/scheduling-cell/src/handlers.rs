// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use shared_models::appointment::{Appointment, AppointmentDraft};
use shared_models::error::AppError;

use crate::models::AppointmentError;
use crate::services::booking::AppointmentBookingService;

#[axum::debug_handler]
pub async fn list_appointments(
    State(service): State<Arc<AppointmentBookingService>>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = service.list().await.map_err(map_error)?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = service
        .get(id)
        .await
        .map_err(map_error)?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(appointment))
}

/// Create an appointment. A conflicting candidate is not an error at the
/// transport level: it maps to 409 with the offered alternative start times
/// in the body.
#[axum::debug_handler]
pub async fn create_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    Json(draft): Json<AppointmentDraft>,
) -> Result<Response, AppError> {
    draft.validate().map_err(AppError::ValidationError)?;

    match service.create(draft).await {
        Ok(appointment) => Ok((StatusCode::CREATED, Json(appointment)).into_response()),
        Err(AppointmentError::ConflictDetected { alternative_times }) => {
            Ok(conflict_response(alternative_times).into_response())
        }
        Err(e) => Err(map_error(e)),
    }
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    Path(id): Path<i64>,
    Json(draft): Json<AppointmentDraft>,
) -> Result<Json<Appointment>, AppError> {
    draft.validate().map_err(AppError::ValidationError)?;

    let updated = service.update(id, draft).await.map_err(|e| match e {
        AppointmentError::NotFound => not_found(id),
        other => map_error(other),
    })?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let removed = service.delete(id).await.map_err(map_error)?;
    if !removed {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn conflict_response(alternative_times: Vec<chrono::DateTime<chrono::Utc>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CONFLICT,
        Json(json!({
            "message": "Cannot create appointment due to scheduling conflict.",
            "alternative_times": alternative_times,
        })),
    )
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Appointment with ID {} not found.", id))
}

fn map_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::ConflictDetected { .. } => AppError::Conflict(e.to_string()),
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}
