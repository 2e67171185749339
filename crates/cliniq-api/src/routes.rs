//! API routes
//!
//! Route-level guards live inside the handlers as explicit guard chains; the
//! router only wires paths to handlers.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// All resource routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/admin", admin_routes())
        .nest("/doctor", doctor_routes())
        .nest("/patient", patient_routes())
        .nest("/slot", slot_routes())
        .nest("/appointment", appointment_routes())
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/superadmin", post(handlers::admin::create_superadmin))
        .route("/", post(handlers::admin::create_admin))
        .route("/signin", post(handlers::admin::signin))
        .route("/confirm-signin", post(handlers::admin::confirm_signin))
        .route("/token", post(handlers::admin::get_access_token))
        .route("/signout", post(handlers::admin::signout))
        .route("/", get(handlers::admin::list_admins))
        .route("/:id", get(handlers::admin::get_admin))
        .route("/:id", patch(handlers::admin::update_admin))
        .route("/:id", delete(handlers::admin::delete_admin))
}

fn doctor_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::doctor::create_doctor))
        .route("/signin", post(handlers::doctor::signin))
        .route("/confirm-signin", post(handlers::doctor::confirm_signin))
        .route("/token", post(handlers::doctor::get_access_token))
        .route("/signout", post(handlers::doctor::signout))
        .route("/", get(handlers::doctor::list_doctors))
        .route("/:id", get(handlers::doctor::get_doctor))
        .route("/:id", patch(handlers::doctor::update_doctor))
        .route("/:id", delete(handlers::doctor::delete_doctor))
}

fn patient_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(handlers::patient::signup))
        .route("/signin", post(handlers::patient::signin))
        .route("/token", post(handlers::patient::get_access_token))
        .route("/signout", post(handlers::patient::signout))
        .route("/", get(handlers::patient::list_patients))
        .route("/:id", get(handlers::patient::get_patient))
        .route("/:id", patch(handlers::patient::update_patient))
        .route("/:id", delete(handlers::patient::delete_patient))
}

fn slot_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::slot::create_slot))
        .route("/", get(handlers::slot::list_slots))
        .route("/:id", get(handlers::slot::get_slot))
        .route("/:id", patch(handlers::slot::update_slot))
        .route("/:id", delete(handlers::slot::delete_slot))
}

fn appointment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::appointment::create_appointment))
        .route("/", get(handlers::appointment::list_appointments))
        .route("/:id", get(handlers::appointment::get_appointment))
        .route("/:id", patch(handlers::appointment::update_appointment))
        .route("/:id", delete(handlers::appointment::delete_appointment))
}

/// Swagger UI routes
pub fn swagger_routes() -> Router<Arc<AppState>> {
    use crate::openapi::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
