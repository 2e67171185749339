//! Shared authentication types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Admin role. Doctors and patients carry no role; they are marked by the
/// `is_doctor` / `is_patient` claims instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Self::Superadmin),
            "admin" => Ok(Self::Admin),
            other => Err(AuthError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Which signing key and lifetime a token was minted with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload. Access and refresh tokens carry the same shape; only the
/// signing secret and lifetime differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject id
    pub sub: String,
    /// Admin role, absent for doctors and patients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Doctor marker
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_doctor: bool,
    /// Patient marker
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_patient: bool,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Verified caller identity extracted from an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Subject id
    pub subject: Uuid,
    /// Admin role, if any
    pub role: Option<Role>,
    /// Doctor marker
    pub is_doctor: bool,
    /// Patient marker
    pub is_patient: bool,
}

impl Identity {
    pub fn admin(subject: Uuid, role: Role) -> Self {
        Self {
            subject,
            role: Some(role),
            is_doctor: false,
            is_patient: false,
        }
    }

    pub fn doctor(subject: Uuid) -> Self {
        Self {
            subject,
            role: None,
            is_doctor: true,
            is_patient: false,
        }
    }

    pub fn patient(subject: Uuid) -> Self {
        Self {
            subject,
            role: None,
            is_doctor: false,
            is_patient: true,
        }
    }

    /// Build an identity from verified claims
    pub fn from_claims(claims: &TokenClaims) -> AuthResult<Self> {
        let subject = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(Self {
            subject,
            role: claims.role,
            is_doctor: claims.is_doctor,
            is_patient: claims.is_patient,
        })
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == Some(Role::Superadmin)
    }

    /// Admin or superadmin
    pub fn is_admin_level(&self) -> bool {
        matches!(self.role, Some(Role::Superadmin) | Some(Role::Admin))
    }

    /// Admin-level or a doctor
    pub fn is_doctor_level(&self) -> bool {
        self.is_admin_level() || self.is_doctor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_skip_absent_markers() {
        let claims = TokenClaims {
            sub: Uuid::new_v4().to_string(),
            role: Some(Role::Admin),
            is_doctor: false,
            is_patient: false,
            iat: 0,
            exp: 0,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("is_doctor").is_none());
        assert!(json.get("is_patient").is_none());
    }

    #[test]
    fn test_doctor_claims_roundtrip() {
        let id = Uuid::new_v4();
        let claims = TokenClaims {
            sub: id.to_string(),
            role: None,
            is_doctor: true,
            is_patient: false,
            iat: 0,
            exp: 0,
        };
        let json = serde_json::to_string(&claims).unwrap();
        let parsed: TokenClaims = serde_json::from_str(&json).unwrap();
        let identity = Identity::from_claims(&parsed).unwrap();
        assert_eq!(identity, Identity::doctor(id));
        assert!(identity.is_doctor_level());
        assert!(!identity.is_admin_level());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("superadmin".parse::<Role>().unwrap(), Role::Superadmin);
        assert!("patient".parse::<Role>().is_err());
    }
}
