//! Admin handlers
//!
//! Admin authentication is a two-step OTP flow: `signin` checks the password
//! and dispatches a code out of band, `confirm-signin` checks the code and
//! mints the token pair. The code is never echoed in a response body.

use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use cliniq_auth::{guard, CookieChannel, GuardStep, Identity, Role, TokenKind};
use cliniq_db::{AdminPatch, NewAdmin};

use crate::dto::{
    empty, AdminSigninRequest, AdminView, ApiResponse, ConfirmAdminSigninRequest,
    CreateAdminRequest, UpdateAdminRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Bootstrap the single superadmin account
#[utoipa::path(
    post,
    path = "/admin/superadmin",
    tag = "Admin",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Superadmin created"),
        (status = 409, description = "Superadmin already exists")
    )
)]
pub async fn create_superadmin(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateAdminRequest>,
) -> ApiResult<ApiResponse<AdminView>> {
    if state.stores.admins.find_superadmin().await?.is_some() {
        return Err(ApiError::Conflict("Super admin already exists".to_string()));
    }
    body.validate()?;

    let password_hash = state.auth.password.hash(&body.password)?;
    let admin = state
        .stores
        .admins
        .create(NewAdmin {
            username: body.username,
            password_hash,
            role: Role::Superadmin.as_str().to_string(),
        })
        .await?;

    Ok(ApiResponse::created(admin.into()))
}

/// Create an admin account (superadmin only)
#[utoipa::path(
    post,
    path = "/admin",
    tag = "Admin",
    request_body = CreateAdminRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 201, description = "Admin created"),
        (status = 401, description = "Not a superadmin"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(body): Json<CreateAdminRequest>,
) -> ApiResult<ApiResponse<AdminView>> {
    guard::evaluate(&[GuardStep::SuperAdmin], &identity, None)?;
    body.validate()?;

    let password_hash = state.auth.password.hash(&body.password)?;
    let admin = state
        .stores
        .admins
        .create(NewAdmin {
            username: body.username.clone(),
            password_hash,
            role: Role::Admin.as_str().to_string(),
        })
        .await?;

    tracing::info!(username = %body.username, "New admin created");
    Ok(ApiResponse::created(admin.into()))
}

/// First signin step: password check, then OTP dispatch
#[utoipa::path(
    post,
    path = "/admin/signin",
    tag = "Admin",
    request_body = AdminSigninRequest,
    responses(
        (status = 200, description = "OTP dispatched"),
        (status = 401, description = "Invalid password"),
        (status = 404, description = "Unknown username")
    )
)]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AdminSigninRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let admin = state
        .stores
        .admins
        .find_by_username(&body.username)
        .await?
        .ok_or_else(|| ApiError::NotFound("Admin not found".to_string()))?;

    state
        .auth
        .password
        .verify(&body.password, &admin.password_hash)
        .map_err(|_| ApiError::Unauthorized("Invalid password".to_string()))?;

    // The challenge is cached before dispatch, so a delivery failure leaves
    // it verifiable and the error tells the client dispatch went wrong.
    state
        .auth
        .issue_challenge(&admin.username, &admin.username)
        .await?;

    Ok(ApiResponse::ok(empty()))
}

/// Second signin step: OTP confirmation and token issuance
#[utoipa::path(
    post,
    path = "/admin/confirm-signin",
    tag = "Admin",
    request_body = ConfirmAdminSigninRequest,
    responses(
        (status = 200, description = "Access token in data, refresh cookie set"),
        (status = 401, description = "OTP incorrect or expired"),
        (status = 404, description = "Unknown username")
    )
)]
pub async fn confirm_signin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<ConfirmAdminSigninRequest>,
) -> ApiResult<(CookieJar, ApiResponse<String>)> {
    let admin = state
        .stores
        .admins
        .find_by_username(&body.username)
        .await?
        .ok_or_else(|| ApiError::NotFound("Username not found".to_string()))?;

    state.auth.verify_challenge(&body.username, &body.otp)?;

    let role: Role = admin
        .role
        .parse()
        .map_err(|_| ApiError::Internal(format!("Unknown stored role: {}", admin.role)))?;
    let identity = Identity::admin(admin.id, role);

    let access = state.auth.tokens.issue_access(&identity)?;
    let refresh = state.auth.tokens.issue_refresh(&identity)?;
    let cookie = state.auth.cookies.issue(CookieChannel::Admin, &refresh);

    Ok((jar.add(cookie), ApiResponse::ok(access)))
}

/// Mint a fresh access token from the admin refresh cookie
#[utoipa::path(
    post,
    path = "/admin/token",
    tag = "Admin",
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
        .get(CookieChannel::Admin.cookie_name())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token not found".to_string()))?;

    let access = state.auth.tokens.refresh_access(refresh.value())?;
    Ok(ApiResponse::ok(access))
}

/// Clear the admin refresh cookie
#[utoipa::path(
    post,
    path = "/admin/signout",
    tag = "Admin",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Refresh cookie missing or invalid")
    )
)]
pub async fn signout(
    State(state): State<Arc<AppState>>,
    AuthUser(_identity): AuthUser,
    jar: CookieJar,
) -> ApiResult<(CookieJar, ApiResponse<serde_json::Value>)> {
    let refresh = jar
        .get(CookieChannel::Admin.cookie_name())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token not found".to_string()))?;

    // An expired session cannot be explicitly signed out, only left to expire.
    state.auth.tokens.verify(refresh.value(), TokenKind::Refresh)?;

    let cleared = state.auth.cookies.clear(CookieChannel::Admin);
    Ok((jar.add(cleared), ApiResponse::ok(empty())))
}

/// List all admins (superadmin only)
#[utoipa::path(
    get,
    path = "/admin",
    tag = "Admin",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "All admin records", body = [AdminView]),
        (status = 401, description = "Not a superadmin")
    )
)]
pub async fn list_admins(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> ApiResult<ApiResponse<Vec<AdminView>>> {
    guard::evaluate(&[GuardStep::SuperAdmin], &identity, None)?;

    let admins = state.stores.admins.list().await?;
    Ok(ApiResponse::ok(admins.into_iter().map(Into::into).collect()))
}

/// Fetch one admin (the record itself or the superadmin)
#[utoipa::path(
    get,
    path = "/admin/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Admin id")),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Admin record", body = AdminView),
        (status = 401, description = "Not the record owner"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_admin(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<AdminView>> {
    guard::evaluate(&[GuardStep::SelfOnly], &identity, Some(id))?;

    let admin = state
        .stores
        .admins
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Admin not found by ID {}", id)))?;

    Ok(ApiResponse::ok(admin.into()))
}

/// Update one admin (the record itself or the superadmin)
#[utoipa::path(
    patch,
    path = "/admin/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Admin id")),
    request_body = UpdateAdminRequest,
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Updated record", body = AdminView),
        (status = 401, description = "Not the record owner"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_admin(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAdminRequest>,
) -> ApiResult<ApiResponse<AdminView>> {
    guard::evaluate(&[GuardStep::SelfOnly], &identity, Some(id))?;
    body.validate()?;

    let password_hash = match &body.password {
        Some(password) => Some(state.auth.password.hash(password)?),
        None => None,
    };

    let admin = state
        .stores
        .admins
        .update(
            id,
            AdminPatch {
                username: body.username,
                password_hash,
            },
        )
        .await?;

    Ok(ApiResponse::ok(admin.into()))
}

/// Delete one admin (superadmin only; the superadmin record is undeletable)
#[utoipa::path(
    delete,
    path = "/admin/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Admin id")),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Not a superadmin"),
        (status = 404, description = "Unknown id"),
        (status = 409, description = "Superadmin record cannot be deleted")
    )
)]
pub async fn delete_admin(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    guard::evaluate(&[GuardStep::SuperAdmin], &identity, None)?;

    let admin = state
        .stores
        .admins
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Admin not found by ID {}", id)))?;

    if admin.role == Role::Superadmin.as_str() {
        return Err(ApiError::Conflict(
            "Super admin cannot be deleted".to_string(),
        ));
    }

    state.stores.admins.delete(id).await?;
    Ok(ApiResponse::ok(empty()))
}
