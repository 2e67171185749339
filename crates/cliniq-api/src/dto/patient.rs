//! Patient DTOs

use chrono::{DateTime, Utc};
use cliniq_db::DbPatient;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{validate_gender, PHONE_RE};

/// Signup body; a successful signup also signs the patient in
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPatientRequest {
    #[validate(regex(path = *PHONE_RE, message = "must be a valid Uzbek phone number"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub full_name: String,
    #[validate(length(min = 6, max = 30, message = "must be 6 to 30 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub address: String,
    #[validate(range(min = 1, max = 150, message = "must be a plausible age"))]
    pub age: i32,
    #[validate(custom(function = validate_gender))]
    pub gender: String,
}

/// Single-step signin: phone plus password, no OTP
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSigninRequest {
    pub phone_number: String,
    pub password: String,
}

/// Profile patch; absent fields keep their value
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    #[validate(regex(path = *PHONE_RE, message = "must be a valid Uzbek phone number"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 6, max = 30, message = "must be 6 to 30 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub address: Option<String>,
    #[validate(range(min = 1, max = 150, message = "must be a plausible age"))]
    pub age: Option<i32>,
    #[validate(custom(function = validate_gender))]
    pub gender: Option<String>,
}

/// Patient record as exposed to clients. The password hash never leaves the
/// server.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientView {
    pub id: Uuid,
    pub phone_number: String,
    pub full_name: String,
    pub address: String,
    pub age: i32,
    pub gender: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbPatient> for PatientView {
    fn from(patient: DbPatient) -> Self {
        Self {
            id: patient.id,
            phone_number: patient.phone_number,
            full_name: patient.full_name,
            address: patient.address,
            age: patient.age,
            gender: patient.gender,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}
