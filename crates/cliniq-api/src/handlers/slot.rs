//! Schedule slot handlers
//!
//! Slots are readable by anyone; mutation requires doctor-level access plus
//! the ownership check on the route id.

use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use cliniq_auth::{guard, GuardStep};
use cliniq_db::{NewSlot, SlotPatch};

use crate::dto::{empty, ApiResponse, CreateSlotRequest, SlotView, UpdateSlotRequest};
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Create a slot (doctor-level route)
#[utoipa::path(
    post,
    path = "/slot",
    tag = "Slot",
    request_body = CreateSlotRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 201, description = "Slot created", body = SlotView),
        (status = 400, description = "Invalid fields or unknown doctor"),
        (status = 401, description = "Not doctor-level")
    )
)]
pub async fn create_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(body): Json<CreateSlotRequest>,
) -> ApiResult<ApiResponse<SlotView>> {
    guard::evaluate(&[GuardStep::Doctor], &identity, None)?;
    body.validate()?;

    let slot = state
        .stores
        .slots
        .create(NewSlot {
            doctor_id: body.doctor_id,
            date: body.date,
            time: body.time,
            status: body.status,
        })
        .await?;

    Ok(ApiResponse::created(slot.into()))
}

/// List all slots (public)
#[utoipa::path(
    get,
    path = "/slot",
    tag = "Slot",
    responses((status = 200, description = "All slot records", body = [SlotView]))
)]
pub async fn list_slots(
    State(state): State<Arc<AppState>>,
) -> ApiResult<ApiResponse<Vec<SlotView>>> {
    let slots = state.stores.slots.list().await?;
    Ok(ApiResponse::ok(slots.into_iter().map(Into::into).collect()))
}

/// Fetch one slot (public)
#[utoipa::path(
    get,
    path = "/slot/{id}",
    tag = "Slot",
    params(("id" = Uuid, Path, description = "Slot id")),
    responses(
        (status = 200, description = "Slot record", body = SlotView),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_slot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<SlotView>> {
    let slot = state
        .stores
        .slots
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Slot not found by ID {}", id)))?;

    Ok(ApiResponse::ok(slot.into()))
}

/// Update one slot (doctor-level plus ownership of the route id)
#[utoipa::path(
    patch,
    path = "/slot/{id}",
    tag = "Slot",
    params(("id" = Uuid, Path, description = "Slot id")),
    request_body = UpdateSlotRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Updated record", body = SlotView),
        (status = 401, description = "Guard chain rejected the caller"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSlotRequest>,
) -> ApiResult<ApiResponse<SlotView>> {
    guard::evaluate(&[GuardStep::Doctor, GuardStep::SelfOnly], &identity, Some(id))?;
    body.validate()?;

    let slot = state
        .stores
        .slots
        .update(
            id,
            SlotPatch {
                date: body.date,
                time: body.time,
                status: body.status,
            },
        )
        .await?;

    Ok(ApiResponse::ok(slot.into()))
}

/// Delete one slot (doctor-level plus ownership of the route id)
#[utoipa::path(
    delete,
    path = "/slot/{id}",
    tag = "Slot",
    params(("id" = Uuid, Path, description = "Slot id")),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Guard chain rejected the caller"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    guard::evaluate(&[GuardStep::Doctor, GuardStep::SelfOnly], &identity, Some(id))?;

    state.stores.slots.delete(id).await?;
    Ok(ApiResponse::ok(empty()))
}
