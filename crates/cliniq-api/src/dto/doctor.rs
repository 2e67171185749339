//! Doctor DTOs

use chrono::{DateTime, Utc};
use cliniq_db::DbDoctor;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::PHONE_RE;

/// Body for doctor creation (admin-only route)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    #[validate(regex(path = *PHONE_RE, message = "must be a valid Uzbek phone number"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub specialty: String,
}

/// First signin step: OTP issuance by phone lookup, no password
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSigninRequest {
    pub phone_number: String,
}

/// Second signin step: OTP confirmation
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDoctorSigninRequest {
    pub phone_number: String,
    pub otp: String,
}

/// Profile patch; absent fields keep their value
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    #[validate(regex(path = *PHONE_RE, message = "must be a valid Uzbek phone number"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub specialty: Option<String>,
}

/// Doctor record as exposed to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorView {
    pub id: Uuid,
    pub phone_number: String,
    pub full_name: String,
    pub specialty: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbDoctor> for DoctorView {
    fn from(doctor: DbDoctor) -> Self {
        Self {
            id: doctor.id,
            phone_number: doctor.phone_number,
            full_name: doctor.full_name,
            specialty: doctor.specialty,
            created_at: doctor.created_at,
            updated_at: doctor.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateDoctorRequest {
            phone_number: "+998901234567".to_string(),
            full_name: "Aziz Rahimov".to_string(),
            specialty: "cardiology".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_phone = CreateDoctorRequest {
            phone_number: "12345".to_string(),
            full_name: "Aziz Rahimov".to_string(),
            specialty: "cardiology".to_string(),
        };
        assert!(bad_phone.validate().is_err());
    }
}
