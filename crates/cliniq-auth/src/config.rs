//! Authentication configuration
//!
//! Access and refresh tokens are signed with independent secrets so a leaked
//! access key cannot mint refresh tokens.

use std::time::Duration;

/// Main authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token signing configuration
    pub tokens: TokenConfig,
    /// OTP challenge configuration
    pub otp: OtpConfig,
    /// Password hashing configuration
    pub password: PasswordConfig,
    /// Refresh cookie configuration
    pub cookie: CookieConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            tokens: TokenConfig::default(),
            otp: OtpConfig::default(),
            password: PasswordConfig::default(),
            cookie: CookieConfig::default(),
        }
    }
}

/// JWT token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret for signing access tokens
    pub access_secret: String,
    /// Secret for signing refresh tokens
    pub refresh_secret: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime (must not be shorter than access)
    pub refresh_ttl: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(), // Must be set in production
            refresh_secret: String::new(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

/// OTP challenge configuration
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Number of digits in the code
    pub digits: u32,
    /// Challenge lifetime
    pub ttl: Duration,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            digits: 6,
            ttl: Duration::from_secs(300),
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Minimum password length
    pub min_password_length: usize,
    /// Maximum password length (to prevent DoS)
    pub max_password_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            max_password_length: 128,
        }
    }
}

/// Refresh cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Mark cookies as Secure
    pub secure: bool,
    /// Cookie lifetime
    pub max_age: Duration,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            max_age: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

impl AuthConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(secret) = std::env::var("ACCESS_TOKEN_KEY") {
            config.tokens.access_secret = secret;
        }
        if let Ok(secret) = std::env::var("REFRESH_TOKEN_KEY") {
            config.tokens.refresh_secret = secret;
        }
        if let Some(ttl) = std::env::var("ACCESS_TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.tokens.access_ttl = Duration::from_secs(ttl);
        }
        if let Some(ttl) = std::env::var("REFRESH_TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.tokens.refresh_ttl = Duration::from_secs(ttl);
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.tokens.access_secret.is_empty() {
            errors.push("Access token secret must be set".to_string());
        } else if self.tokens.access_secret.len() < 32 {
            errors.push("Access token secret should be at least 32 bytes".to_string());
        }

        if self.tokens.refresh_secret.is_empty() {
            errors.push("Refresh token secret must be set".to_string());
        } else if self.tokens.refresh_secret.len() < 32 {
            errors.push("Refresh token secret should be at least 32 bytes".to_string());
        }

        if self.tokens.refresh_ttl < self.tokens.access_ttl {
            errors.push("Refresh token lifetime must not be shorter than access".to_string());
        }

        if self.otp.digits == 0 || self.otp.digits > 9 {
            errors.push("OTP digits must be between 1 and 9".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.otp.ttl, Duration::from_secs(300));
        assert_eq!(config.otp.digits, 6);
        assert_eq!(config.cookie.max_age, Duration::from_secs(30 * 24 * 60 * 60));
    }

    #[test]
    fn test_config_validation_missing_secrets() {
        let config = AuthConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_valid() {
        let mut config = AuthConfig::default();
        config.tokens.access_secret = "a".repeat(32);
        config.tokens.refresh_secret = "b".repeat(32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_refresh_shorter_than_access_rejected() {
        let mut config = AuthConfig::default();
        config.tokens.access_secret = "a".repeat(32);
        config.tokens.refresh_secret = "b".repeat(32);
        config.tokens.access_ttl = Duration::from_secs(600);
        config.tokens.refresh_ttl = Duration::from_secs(60);
        assert!(config.validate().is_err());
    }
}
