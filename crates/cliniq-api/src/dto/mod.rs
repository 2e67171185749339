//! Request/response DTOs
//!
//! All bodies use the `{statusCode, message, data}` envelope from
//! [`common::ApiResponse`]. Request DTOs carry their own validation rules.

pub mod admin;
pub mod appointment;
pub mod common;
pub mod doctor;
pub mod patient;
pub mod slot;

pub use admin::*;
pub use appointment::*;
pub use common::*;
pub use doctor::*;
pub use patient::*;
pub use slot::*;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Uzbek mobile numbers: +998 or 998 prefix followed by a valid operator code
pub(crate) static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+998|998)(9[0-9]|3[3]|8[8])[0-9]{7}$").expect("valid phone regex")
});

/// 24-hour HH:MM
pub(crate) static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"));

/// Admin passwords need a lowercase, an uppercase, a digit and a symbol, and
/// at least 8 characters.
pub(crate) fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if password.len() >= 8 && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(
            "must be at least 8 characters with lower, upper, digit and symbol".into(),
        ))
    }
}

pub(crate) fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    match gender {
        "male" | "female" => Ok(()),
        _ => Err(ValidationError::new("gender").with_message("must be male or female".into())),
    }
}

pub(crate) fn validate_slot_status(status: &str) -> Result<(), ValidationError> {
    match status {
        "free" | "busy" => Ok(()),
        _ => Err(ValidationError::new("slot_status").with_message("must be free or busy".into())),
    }
}

pub(crate) fn validate_appointment_status(status: &str) -> Result<(), ValidationError> {
    match status {
        "pending" | "completed" | "rejected" => Ok(()),
        _ => Err(ValidationError::new("appointment_status")
            .with_message("must be pending, completed or rejected".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_pattern() {
        assert!(PHONE_RE.is_match("+998901234567"));
        assert!(PHONE_RE.is_match("998331234567"));
        assert!(!PHONE_RE.is_match("+998121234567"));
        assert!(!PHONE_RE.is_match("+99890123456"));
        assert!(!PHONE_RE.is_match("901234567"));
    }

    #[test]
    fn test_time_pattern() {
        assert!(TIME_RE.is_match("09:30"));
        assert!(TIME_RE.is_match("23:59"));
        assert!(!TIME_RE.is_match("24:00"));
        assert!(!TIME_RE.is_match("9:30"));
        assert!(!TIME_RE.is_match("09:60"));
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("P@ssw0rd1").is_ok());
        assert!(validate_password_strength("password").is_err());
        assert!(validate_password_strength("P@s1").is_err());
        assert!(validate_password_strength("PASSW0RD!").is_err());
    }

    #[test]
    fn test_status_values() {
        assert!(validate_slot_status("free").is_ok());
        assert!(validate_slot_status("taken").is_err());
        assert!(validate_appointment_status("completed").is_ok());
        assert!(validate_appointment_status("done").is_err());
    }
}
