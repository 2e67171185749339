//! Auth flow integration tests
//!
//! Drives the full request/response cycle over the in-memory stores: OTP
//! signin machines, token refresh via cookies, and guard chains per route.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use cliniq_api::{create_test_router, AppState};
use cliniq_auth::{AuthConfig, AuthService, MemoryNotifier};
use cliniq_db::Stores;

fn test_state() -> (Arc<AppState>, Arc<MemoryNotifier>) {
    let mut config = AuthConfig::default();
    config.tokens.access_secret = "access-secret-key-min-32-bytes-long!!".to_string();
    config.tokens.refresh_secret = "refresh-secret-key-min-32-bytes-long!".to_string();

    let notifier = Arc::new(MemoryNotifier::new());
    let auth = AuthService::new(&config, notifier.clone());
    let state = Arc::new(AppState::new(Stores::memory(), auth));
    (state, notifier)
}

struct TestResponse {
    status: StatusCode,
    set_cookie: Option<String>,
    body: Value,
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
    cookie: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie.to_string());
    }

    let body = match body {
        Some(json_body) => Body::from(serde_json::to_vec(&json_body).unwrap()),
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(json!(null));

    TestResponse {
        status,
        set_cookie,
        body,
    }
}

/// The `name=value` pair from a Set-Cookie header, for replay
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string()
}

async fn bootstrap_superadmin(router: &Router) {
    let response = send(
        router,
        "POST",
        "/admin/superadmin",
        Some(json!({"username": "root", "password": "P@ssw0rd1"})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

/// Run the admin two-step flow and return (access token, refresh cookie pair)
async fn signin_superadmin(router: &Router, notifier: &MemoryNotifier) -> (String, String) {
    let response = send(
        router,
        "POST",
        "/admin/signin",
        Some(json!({"username": "root", "password": "P@ssw0rd1"})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    // The admin OTP never travels in the body.
    assert_eq!(response.body["data"], json!({}));

    let otp = notifier.last_code_for("root").expect("OTP dispatched");
    let response = send(
        router,
        "POST",
        "/admin/confirm-signin",
        Some(json!({"username": "root", "otp": otp})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let access = response.body["data"].as_str().expect("token in data").to_string();
    let set_cookie = response.set_cookie.expect("refresh cookie set");
    assert!(set_cookie.starts_with("refreshTokenAdmin="));
    assert!(set_cookie.contains("HttpOnly"));
    (access, cookie_pair(&set_cookie))
}

#[tokio::test]
async fn test_superadmin_bootstrap_is_idempotent_conflict() {
    let (state, _) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;

    let response = send(
        &router,
        "POST",
        "/admin/superadmin",
        Some(json!({"username": "other", "password": "P@ssw0rd2"})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["statusCode"], 409);
    assert_eq!(response.body["message"], "Super admin already exists");
}

#[tokio::test]
async fn test_admin_two_step_signin_and_protected_route() {
    let (state, notifier) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;
    let (access, _) = signin_superadmin(&router, &notifier).await;

    // Superadmin-only listing accepts the minted token.
    let response = send(&router, "GET", "/admin", None, Some(&access), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);

    // And rejects no token at all.
    let response = send(&router, "GET", "/admin", None, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Token not found");
}

#[tokio::test]
async fn test_admin_signin_wrong_password_sends_nothing() {
    let (state, notifier) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;

    let response = send(
        &router,
        "POST",
        "/admin/signin",
        Some(json!({"username": "root", "password": "WrongP@ss1"})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_admin_confirm_with_wrong_otp_rejected() {
    let (state, notifier) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;
    let response = send(
        &router,
        "POST",
        "/admin/signin",
        Some(json!({"username": "root", "password": "P@ssw0rd1"})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let otp = notifier.last_code_for("root").unwrap();
    let wrong = if otp == "000000" { "000001" } else { "000000" };
    let response = send(
        &router,
        "POST",
        "/admin/confirm-signin",
        Some(json!({"username": "root", "otp": wrong})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "OTP is incorrect or expired");
}

#[tokio::test]
async fn test_admin_token_refresh_via_cookie() {
    let (state, notifier) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;
    let (_, cookie) = signin_superadmin(&router, &notifier).await;

    let response = send(&router, "POST", "/admin/token", None, None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    // The fresh access token works against a protected route.
    let access = response.body["data"].as_str().unwrap().to_string();
    let response = send(&router, "GET", "/admin", None, Some(&access), None).await;
    assert_eq!(response.status, StatusCode::OK);

    // Without the cookie the endpoint refuses.
    let response = send(&router, "POST", "/admin/token", None, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Refresh token not found");
}

#[tokio::test]
async fn test_admin_signout_clears_cookie() {
    let (state, notifier) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;
    let (access, cookie) = signin_superadmin(&router, &notifier).await;

    let response = send(
        &router,
        "POST",
        "/admin/signout",
        None,
        Some(&access),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let cleared = response.set_cookie.unwrap();
    assert!(cleared.starts_with("refreshTokenAdmin="));
    assert!(cleared.contains("Max-Age=0"));

    // Signout with no cookie fails before any verification happens.
    let response = send(&router, "POST", "/admin/signout", None, Some(&access), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_superadmin_record_cannot_be_deleted() {
    let (state, notifier) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;
    let (access, _) = signin_superadmin(&router, &notifier).await;

    let response = send(&router, "GET", "/admin", None, Some(&access), None).await;
    let root_id = response.body["data"][0]["id"].as_str().unwrap().to_string();

    // Even the superadmin's own token cannot delete the superadmin record.
    let response = send(
        &router,
        "DELETE",
        &format!("/admin/{}", root_id),
        None,
        Some(&access),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["statusCode"], 409);
    assert_eq!(response.body["message"], "Super admin cannot be deleted");

    // Ordinary admin records delete normally through the same route.
    let response = send(
        &router,
        "POST",
        "/admin",
        Some(json!({"username": "staff", "password": "P@ssw0rd2"})),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let staff_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = send(
        &router,
        "DELETE",
        &format!("/admin/{}", staff_id),
        None,
        Some(&access),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(&router, "GET", "/admin", None, Some(&access), None).await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_doctor_otp_flow_echoes_code_in_body() {
    let (state, notifier) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;
    let (admin_access, _) = signin_superadmin(&router, &notifier).await;

    let response = send(
        &router,
        "POST",
        "/doctor",
        Some(json!({
            "phoneNumber": "+998901234567",
            "fullName": "Aziz Rahimov",
            "specialty": "cardiology"
        })),
        Some(&admin_access),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);

    // The doctor OTP comes back in-band, no delivery channel involved.
    let response = send(
        &router,
        "POST",
        "/doctor/signin",
        Some(json!({"phoneNumber": "+998901234567"})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let otp = response.body["data"].as_str().unwrap().to_string();
    assert_eq!(otp.len(), 6);

    let response = send(
        &router,
        "POST",
        "/doctor/confirm-signin",
        Some(json!({"phoneNumber": "+998901234567", "otp": otp})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].is_string());
    assert!(response
        .set_cookie
        .unwrap()
        .starts_with("refreshTokenDoctor="));

    // A wrong code is rejected.
    let response = send(
        &router,
        "POST",
        "/doctor/confirm-signin",
        Some(json!({"phoneNumber": "+998901234567", "otp": "999999x"})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_doctor_creation_requires_admin_level() {
    let (state, _) = test_state();
    let router = create_test_router(state.clone());

    // Sign up a patient and try to create a doctor with their token.
    let response = send(
        &router,
        "POST",
        "/patient/signup",
        Some(json!({
            "phoneNumber": "+998901234567",
            "fullName": "A A",
            "password": "secret1",
            "address": "X",
            "age": 30,
            "gender": "male"
        })),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let patient_access = response.body["data"].as_str().unwrap().to_string();

    let response = send(
        &router,
        "POST",
        "/doctor",
        Some(json!({
            "phoneNumber": "+998909876543",
            "fullName": "B B",
            "specialty": "dermatology"
        })),
        Some(&patient_access),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Forbidden user");
}

#[tokio::test]
async fn test_patient_signup_signs_in_immediately() {
    let (state, _) = test_state();
    let router = create_test_router(state);

    let response = send(
        &router,
        "POST",
        "/patient/signup",
        Some(json!({
            "phoneNumber": "+998901234567",
            "fullName": "A A",
            "password": "secret1",
            "address": "X",
            "age": 30,
            "gender": "male"
        })),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["statusCode"], 201);
    assert!(response.body["data"].is_string());
    let set_cookie = response.set_cookie.unwrap();
    assert!(set_cookie.starts_with("refreshTokenPatient="));

    // The refresh cookie mints new access tokens.
    let cookie = cookie_pair(&set_cookie);
    let response = send(&router, "POST", "/patient/token", None, None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    // Duplicate phone number conflicts.
    let response = send(
        &router,
        "POST",
        "/patient/signup",
        Some(json!({
            "phoneNumber": "+998901234567",
            "fullName": "B B",
            "password": "secret2",
            "address": "Y",
            "age": 40,
            "gender": "female"
        })),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_patient_signin_combines_unknown_and_wrong_password() {
    let (state, _) = test_state();
    let router = create_test_router(state);

    send(
        &router,
        "POST",
        "/patient/signup",
        Some(json!({
            "phoneNumber": "+998901234567",
            "fullName": "A A",
            "password": "secret1",
            "address": "X",
            "age": 30,
            "gender": "male"
        })),
        None,
        None,
    )
    .await;

    for body in [
        json!({"phoneNumber": "+998901234567", "password": "wrong!!"}),
        json!({"phoneNumber": "+998900000000", "password": "secret1"}),
    ] {
        let response = send(&router, "POST", "/patient/signin", Some(body), None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Phone number or password incorrect");
    }
}

#[tokio::test]
async fn test_patient_listing_is_doctor_level() {
    let (state, _) = test_state();
    let router = create_test_router(state);

    let response = send(
        &router,
        "POST",
        "/patient/signup",
        Some(json!({
            "phoneNumber": "+998901234567",
            "fullName": "A A",
            "password": "secret1",
            "address": "X",
            "age": 30,
            "gender": "male"
        })),
        None,
        None,
    )
    .await;
    let patient_access = response.body["data"].as_str().unwrap().to_string();

    // A patient token fails the doctor-level listing guard.
    let response = send(&router, "GET", "/patient", None, Some(&patient_access), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // But the patient can read their own record.
    let response = send(&router, "POST", "/patient/signin", Some(json!({
        "phoneNumber": "+998901234567", "password": "secret1"
    })), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_validation_errors_use_envelope() {
    let (state, _) = test_state();
    let router = create_test_router(state);

    let response = send(
        &router,
        "POST",
        "/patient/signup",
        Some(json!({
            "phoneNumber": "12345",
            "fullName": "A A",
            "password": "secret1",
            "address": "X",
            "age": 30,
            "gender": "male"
        })),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["statusCode"], 400);
    assert!(response.body["message"].as_str().unwrap().contains("phone_number"));
}

#[tokio::test]
async fn test_slot_mutation_guard_chain() {
    let (state, notifier) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;
    let (admin_access, _) = signin_superadmin(&router, &notifier).await;

    // Create a doctor and a slot for them.
    let response = send(
        &router,
        "POST",
        "/doctor",
        Some(json!({
            "phoneNumber": "+998901234567",
            "fullName": "Aziz Rahimov",
            "specialty": "cardiology"
        })),
        Some(&admin_access),
        None,
    )
    .await;
    let doctor_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = send(
        &router,
        "POST",
        "/slot",
        Some(json!({
            "doctorId": doctor_id,
            "date": "2026-09-01",
            "time": "09:30",
            "status": "free"
        })),
        Some(&admin_access),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let slot_id = response.body["data"]["id"].as_str().unwrap().to_string();

    // Slots are publicly readable.
    let response = send(&router, "GET", "/slot", None, None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);

    // The superadmin passes both Doctor and Self steps on mutation.
    let response = send(
        &router,
        "PATCH",
        &format!("/slot/{}", slot_id),
        Some(json!({"status": "busy"})),
        Some(&admin_access),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "busy");

    // A doctor who is not the route resource fails the Self step.
    let response = send(
        &router,
        "POST",
        "/doctor/signin",
        Some(json!({"phoneNumber": "+998901234567"})),
        None,
        None,
    )
    .await;
    let otp = response.body["data"].as_str().unwrap().to_string();
    let response = send(
        &router,
        "POST",
        "/doctor/confirm-signin",
        Some(json!({"phoneNumber": "+998901234567", "otp": otp})),
        None,
        None,
    )
    .await;
    let doctor_access = response.body["data"].as_str().unwrap().to_string();

    let response = send(
        &router,
        "DELETE",
        &format!("/slot/{}", slot_id),
        None,
        Some(&doctor_access),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_appointment_crud_round_trip() {
    let (state, notifier) = test_state();
    let router = create_test_router(state);

    bootstrap_superadmin(&router).await;
    let (admin_access, _) = signin_superadmin(&router, &notifier).await;

    let response = send(
        &router,
        "POST",
        "/doctor",
        Some(json!({
            "phoneNumber": "+998901234567",
            "fullName": "Aziz Rahimov",
            "specialty": "cardiology"
        })),
        Some(&admin_access),
        None,
    )
    .await;
    let doctor_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = send(
        &router,
        "POST",
        "/slot",
        Some(json!({
            "doctorId": doctor_id,
            "date": "2026-09-01",
            "time": "09:30",
            "status": "free"
        })),
        Some(&admin_access),
        None,
    )
    .await;
    let slot_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = send(
        &router,
        "POST",
        "/patient/signup",
        Some(json!({
            "phoneNumber": "+998909876543",
            "fullName": "A A",
            "password": "secret1",
            "address": "X",
            "age": 30,
            "gender": "male"
        })),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);

    // Need the patient id for the booking; read it via the admin token.
    let response = send(&router, "GET", "/patient", None, Some(&admin_access), None).await;
    let patient_id = response.body["data"][0]["id"].as_str().unwrap().to_string();

    let response = send(
        &router,
        "POST",
        "/appointment",
        Some(json!({
            "patientId": patient_id,
            "slotId": slot_id,
            "complaint": "headache",
            "status": "pending"
        })),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let appointment_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = send(
        &router,
        "PATCH",
        &format!("/appointment/{}", appointment_id),
        Some(json!({"status": "completed"})),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "completed");

    let response = send(
        &router,
        "DELETE",
        &format!("/appointment/{}", appointment_id),
        None,
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(
        &router,
        "GET",
        &format!("/appointment/{}", appointment_id),
        None,
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_unknown_slot_rejected() {
    let (state, _) = test_state();
    let router = create_test_router(state);

    let response = send(
        &router,
        "POST",
        "/appointment",
        Some(json!({
            "patientId": uuid::Uuid::new_v4(),
            "slotId": uuid::Uuid::new_v4(),
            "complaint": "headache",
            "status": "pending"
        })),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
