//! Admin DTOs

use chrono::{DateTime, Utc};
use cliniq_db::DbAdmin;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_password_strength;

/// Body for superadmin bootstrap and admin creation
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    #[validate(length(min = 4, max = 20, message = "must be 4 to 20 characters"))]
    pub username: String,
    #[validate(custom(function = validate_password_strength))]
    pub password: String,
}

/// First signin step: password check, OTP dispatch
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSigninRequest {
    pub username: String,
    pub password: String,
}

/// Second signin step: OTP confirmation
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmAdminSigninRequest {
    pub username: String,
    pub otp: String,
}

/// Profile patch; absent fields keep their value
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    #[validate(length(min = 4, max = 20, message = "must be 4 to 20 characters"))]
    pub username: Option<String>,
    #[validate(custom(function = validate_password_strength))]
    pub password: Option<String>,
}

/// Admin record as exposed to clients. The password hash never leaves the
/// server.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminView {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbAdmin> for AdminView {
    fn from(admin: DbAdmin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            role: admin.role,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateAdminRequest {
            username: "root".to_string(),
            password: "P@ssw0rd1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_name = CreateAdminRequest {
            username: "ab".to_string(),
            password: "P@ssw0rd1".to_string(),
        };
        assert!(short_name.validate().is_err());

        let weak_password = CreateAdminRequest {
            username: "root".to_string(),
            password: "password".to_string(),
        };
        assert!(weak_password.validate().is_err());
    }

    #[test]
    fn test_view_omits_hash() {
        let admin = DbAdmin {
            id: Uuid::new_v4(),
            username: "root".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "superadmin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(AdminView::from(admin)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "superadmin");
    }
}
