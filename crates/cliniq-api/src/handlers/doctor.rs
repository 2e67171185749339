//! Doctor handlers
//!
//! Doctors have no password: signin looks up the phone number and returns a
//! short-lived OTP in the response body (there is no out-of-band channel for
//! this role). Confirmation mints tokens whose claims carry the `is_doctor`
//! flag instead of a role.

use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use cliniq_auth::{guard, CookieChannel, GuardStep, Identity, TokenKind};
use cliniq_db::{DoctorPatch, NewDoctor};

use crate::dto::{
    empty, ApiResponse, ConfirmDoctorSigninRequest, CreateDoctorRequest, DoctorSigninRequest,
    DoctorView, UpdateDoctorRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Register a doctor (admin-level route)
#[utoipa::path(
    post,
    path = "/doctor",
    tag = "Doctor",
    request_body = CreateDoctorRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 201, description = "Doctor created", body = DoctorView),
        (status = 401, description = "Not admin-level"),
        (status = 409, description = "Phone number taken")
    )
)]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(body): Json<CreateDoctorRequest>,
) -> ApiResult<ApiResponse<DoctorView>> {
    guard::evaluate(&[GuardStep::Admin], &identity, None)?;
    body.validate()?;

    if state
        .stores
        .doctors
        .find_by_phone(&body.phone_number)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Phone number already exists".to_string()));
    }

    let doctor = state
        .stores
        .doctors
        .create(NewDoctor {
            phone_number: body.phone_number,
            full_name: body.full_name,
            specialty: body.specialty,
        })
        .await?;

    Ok(ApiResponse::created(doctor.into()))
}

/// First signin step: phone lookup, OTP echoed in the body
#[utoipa::path(
    post,
    path = "/doctor/signin",
    tag = "Doctor",
    request_body = DoctorSigninRequest,
    responses(
        (status = 200, description = "OTP in data"),
        (status = 404, description = "Unknown phone number")
    )
)]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DoctorSigninRequest>,
) -> ApiResult<ApiResponse<String>> {
    let doctor = state
        .stores
        .doctors
        .find_by_phone(&body.phone_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("Doctor not found".to_string()))?;

    let code = state.auth.otp.issue(&doctor.phone_number);
    Ok(ApiResponse::ok(code))
}

/// Second signin step: OTP confirmation and token issuance
#[utoipa::path(
    post,
    path = "/doctor/confirm-signin",
    tag = "Doctor",
    request_body = ConfirmDoctorSigninRequest,
    responses(
        (status = 200, description = "Access token in data, refresh cookie set"),
        (status = 401, description = "OTP incorrect or expired"),
        (status = 404, description = "Unknown phone number")
    )
)]
pub async fn confirm_signin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<ConfirmDoctorSigninRequest>,
) -> ApiResult<(CookieJar, ApiResponse<String>)> {
    let doctor = state
        .stores
        .doctors
        .find_by_phone(&body.phone_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("Doctor not found".to_string()))?;

    state.auth.verify_challenge(&body.phone_number, &body.otp)?;

    let identity = Identity::doctor(doctor.id);
    let access = state.auth.tokens.issue_access(&identity)?;
    let refresh = state.auth.tokens.issue_refresh(&identity)?;
    let cookie = state.auth.cookies.issue(CookieChannel::Doctor, &refresh);

    Ok((jar.add(cookie), ApiResponse::ok(access)))
}

/// Mint a fresh access token from the doctor refresh cookie
#[utoipa::path(
    post,
    path = "/doctor/token",
    tag = "Doctor",
    responses(
        (status = 200, description = "Access token in data"),
        (status = 401, description = "Refresh cookie missing or invalid")
    )
)]
pub async fn get_access_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> ApiResult<ApiResponse<String>> {
    let refresh = jar
        .get(CookieChannel::Doctor.cookie_name())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token not found".to_string()))?;

    let access = state.auth.tokens.refresh_access(refresh.value())?;
    Ok(ApiResponse::ok(access))
}

/// Clear the doctor refresh cookie
#[utoipa::path(
    post,
    path = "/doctor/signout",
    tag = "Doctor",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Refresh cookie missing or invalid")
    )
)]
pub async fn signout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, ApiResponse<serde_json::Value>)> {
    let refresh = jar
        .get(CookieChannel::Doctor.cookie_name())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token not found".to_string()))?;

    state.auth.tokens.verify(refresh.value(), TokenKind::Refresh)?;

    let cleared = state.auth.cookies.clear(CookieChannel::Doctor);
    Ok((jar.add(cleared), ApiResponse::ok(empty())))
}

/// List all doctors (public)
#[utoipa::path(
    get,
    path = "/doctor",
    tag = "Doctor",
    responses((status = 200, description = "All doctor records", body = [DoctorView]))
)]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> ApiResult<ApiResponse<Vec<DoctorView>>> {
    let doctors = state.stores.doctors.list().await?;
    Ok(ApiResponse::ok(doctors.into_iter().map(Into::into).collect()))
}

/// Fetch one doctor (public)
#[utoipa::path(
    get,
    path = "/doctor/{id}",
    tag = "Doctor",
    params(("id" = Uuid, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor record", body = DoctorView),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<DoctorView>> {
    let doctor = state
        .stores
        .doctors
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Doctor not found by ID {}", id)))?;

    Ok(ApiResponse::ok(doctor.into()))
}

/// Update one doctor (the record itself or the superadmin)
#[utoipa::path(
    patch,
    path = "/doctor/{id}",
    tag = "Doctor",
    params(("id" = Uuid, Path, description = "Doctor id")),
    request_body = UpdateDoctorRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Updated record", body = DoctorView),
        (status = 401, description = "Not the record owner"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateDoctorRequest>,
) -> ApiResult<ApiResponse<DoctorView>> {
    guard::evaluate(&[GuardStep::SelfOnly], &identity, Some(id))?;
    body.validate()?;

    let doctor = state
        .stores
        .doctors
        .update(
            id,
            DoctorPatch {
                phone_number: body.phone_number,
                full_name: body.full_name,
                specialty: body.specialty,
            },
        )
        .await?;

    Ok(ApiResponse::ok(doctor.into()))
}

/// Delete one doctor (admin-level route)
#[utoipa::path(
    delete,
    path = "/doctor/{id}",
    tag = "Doctor",
    params(("id" = Uuid, Path, description = "Doctor id")),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Not admin-level"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    guard::evaluate(&[GuardStep::Admin], &identity, None)?;

    state.stores.doctors.delete(id).await?;
    Ok(ApiResponse::ok(empty()))
}
