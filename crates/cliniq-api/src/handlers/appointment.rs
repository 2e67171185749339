//! Appointment handlers
//!
//! Appointment CRUD carries no guards; referential integrity against patients
//! and slots is enforced by the stores.

use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use cliniq_db::{AppointmentPatch, NewAppointment};

use crate::dto::{
    empty, ApiResponse, AppointmentView, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Book an appointment against a slot
#[utoipa::path(
    post,
    path = "/appointment",
    tag = "Appointment",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentView),
        (status = 400, description = "Invalid fields or unknown patient/slot")
    )
)]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateAppointmentRequest>,
) -> ApiResult<ApiResponse<AppointmentView>> {
    body.validate()?;

    let appointment = state
        .stores
        .appointments
        .create(NewAppointment {
            patient_id: body.patient_id,
            slot_id: body.slot_id,
            complaint: body.complaint,
            status: body.status,
        })
        .await?;

    Ok(ApiResponse::created(appointment.into()))
}

/// List all appointments
#[utoipa::path(
    get,
    path = "/appointment",
    tag = "Appointment",
    responses((status = 200, description = "All appointment records", body = [AppointmentView]))
)]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
) -> ApiResult<ApiResponse<Vec<AppointmentView>>> {
    let appointments = state.stores.appointments.list().await?;
    Ok(ApiResponse::ok(
        appointments.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one appointment
#[utoipa::path(
    get,
    path = "/appointment/{id}",
    tag = "Appointment",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment record", body = AppointmentView),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<AppointmentView>> {
    let appointment = state
        .stores
        .appointments
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Appointment not found by ID {}", id)))?;

    Ok(ApiResponse::ok(appointment.into()))
}

/// Update one appointment
#[utoipa::path(
    patch,
    path = "/appointment/{id}",
    tag = "Appointment",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Updated record", body = AppointmentView),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAppointmentRequest>,
) -> ApiResult<ApiResponse<AppointmentView>> {
    body.validate()?;

    let appointment = state
        .stores
        .appointments
        .update(
            id,
            AppointmentPatch {
                complaint: body.complaint,
                status: body.status,
            },
        )
        .await?;

    Ok(ApiResponse::ok(appointment.into()))
}

/// Delete one appointment
#[utoipa::path(
    delete,
    path = "/appointment/{id}",
    tag = "Appointment",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    state.stores.appointments.delete(id).await?;
    Ok(ApiResponse::ok(empty()))
}
