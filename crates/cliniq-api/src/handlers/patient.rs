//! Patient handlers
//!
//! Patient auth is single-step: signup and signin both verify credentials and
//! immediately mint the token pair. There is no OTP for this role.

use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use cliniq_auth::{guard, CookieChannel, GuardStep, Identity, TokenKind};
use cliniq_db::{NewPatient, PatientPatch};

use crate::dto::{
    empty, ApiResponse, PatientSigninRequest, PatientView, SignupPatientRequest,
    UpdatePatientRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Register a patient and sign them in immediately
#[utoipa::path(
    post,
    path = "/patient/signup",
    tag = "Patient",
    request_body = SignupPatientRequest,
    responses(
        (status = 201, description = "Access token in data, refresh cookie set"),
        (status = 400, description = "Invalid fields"),
        (status = 409, description = "Phone number taken")
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SignupPatientRequest>,
) -> ApiResult<(CookieJar, ApiResponse<String>)> {
    body.validate()?;

    if state
        .stores
        .patients
        .find_by_phone(&body.phone_number)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Phone number already exists".to_string()));
    }

    let password_hash = state.auth.password.hash(&body.password)?;
    let patient = state
        .stores
        .patients
        .create(NewPatient {
            phone_number: body.phone_number,
            full_name: body.full_name,
            password_hash,
            address: body.address,
            age: body.age,
            gender: body.gender,
        })
        .await?;

    let identity = Identity::patient(patient.id);
    let access = state.auth.tokens.issue_access(&identity)?;
    let refresh = state.auth.tokens.issue_refresh(&identity)?;
    let cookie = state.auth.cookies.issue(CookieChannel::Patient, &refresh);

    Ok((jar.add(cookie), ApiResponse::created(access)))
}

/// Single-step signin: phone plus password
#[utoipa::path(
    post,
    path = "/patient/signin",
    tag = "Patient",
    request_body = PatientSigninRequest,
    responses(
        (status = 200, description = "Access token in data, refresh cookie set"),
        (status = 401, description = "Phone number or password incorrect")
    )
)]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<PatientSigninRequest>,
) -> ApiResult<(CookieJar, ApiResponse<String>)> {
    // Unknown phone and wrong password collapse into one message so the
    // endpoint cannot be used to probe which phone numbers are registered.
    let patient = state
        .stores
        .patients
        .find_by_phone(&body.phone_number)
        .await?
        .filter(|p| {
            state
                .auth
                .password
                .verify(&body.password, &p.password_hash)
                .is_ok()
        })
        .ok_or_else(|| {
            ApiError::Unauthorized("Phone number or password incorrect".to_string())
        })?;

    let identity = Identity::patient(patient.id);
    let access = state.auth.tokens.issue_access(&identity)?;
    let refresh = state.auth.tokens.issue_refresh(&identity)?;
    let cookie = state.auth.cookies.issue(CookieChannel::Patient, &refresh);

    Ok((jar.add(cookie), ApiResponse::ok(access)))
}

/// Mint a fresh access token from the patient refresh cookie
#[utoipa::path(
    post,
    path = "/patient/token",
    tag = "Patient",
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
        .get(CookieChannel::Patient.cookie_name())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token not found".to_string()))?;

    let access = state.auth.tokens.refresh_access(refresh.value())?;
    Ok(ApiResponse::ok(access))
}

/// Clear the patient refresh cookie
#[utoipa::path(
    post,
    path = "/patient/signout",
    tag = "Patient",
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
        .get(CookieChannel::Patient.cookie_name())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token not found".to_string()))?;

    state.auth.tokens.verify(refresh.value(), TokenKind::Refresh)?;

    let cleared = state.auth.cookies.clear(CookieChannel::Patient);
    Ok((jar.add(cleared), ApiResponse::ok(empty())))
}

/// List all patients (doctor-level route)
#[utoipa::path(
    get,
    path = "/patient",
    tag = "Patient",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "All patient records", body = [PatientView]),
        (status = 401, description = "Not doctor-level")
    )
)]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> ApiResult<ApiResponse<Vec<PatientView>>> {
    guard::evaluate(&[GuardStep::Doctor], &identity, None)?;

    let patients = state.stores.patients.list().await?;
    Ok(ApiResponse::ok(patients.into_iter().map(Into::into).collect()))
}

/// Fetch one patient (staff or the patient themself)
#[utoipa::path(
    get,
    path = "/patient/{id}",
    tag = "Patient",
    params(("id" = Uuid, Path, description = "Patient id")),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Patient record", body = PatientView),
        (status = 401, description = "Not staff or the record owner"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<PatientView>> {
    guard::evaluate(&[GuardStep::SelfPatient], &identity, Some(id))?;

    let patient = state
        .stores
        .patients
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Patient not found".to_string()))?;

    Ok(ApiResponse::ok(patient.into()))
}

/// Update one patient (the record itself or the superadmin)
#[utoipa::path(
    patch,
    path = "/patient/{id}",
    tag = "Patient",
    params(("id" = Uuid, Path, description = "Patient id")),
    request_body = UpdatePatientRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Updated record", body = PatientView),
        (status = 401, description = "Not the record owner"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePatientRequest>,
) -> ApiResult<ApiResponse<PatientView>> {
    guard::evaluate(&[GuardStep::SelfOnly], &identity, Some(id))?;
    body.validate()?;

    let password_hash = match &body.password {
        Some(password) => Some(state.auth.password.hash(password)?),
        None => None,
    };

    let patient = state
        .stores
        .patients
        .update(
            id,
            PatientPatch {
                phone_number: body.phone_number,
                full_name: body.full_name,
                password_hash,
                address: body.address,
                age: body.age,
                gender: body.gender,
            },
        )
        .await?;

    Ok(ApiResponse::ok(patient.into()))
}

/// Delete one patient (the record itself or the superadmin)
#[utoipa::path(
    delete,
    path = "/patient/{id}",
    tag = "Patient",
    params(("id" = Uuid, Path, description = "Patient id")),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Not the record owner"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    guard::evaluate(&[GuardStep::SelfOnly], &identity, Some(id))?;

    state.stores.patients.delete(id).await?;
    Ok(ApiResponse::ok(empty()))
}
