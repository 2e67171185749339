//! # Cliniq Auth
//!
//! Authentication and authorization for the clinic booking service:
//!
//! - Dual-token JWTs: short-lived access tokens and 30-day refresh tokens
//!   signed with independent secrets
//! - OTP challenges cached in-process and delivered out of band
//! - Argon2id password hashing
//! - Role-scoped refresh cookies (one per admin/doctor/patient channel)
//! - Composable per-route guard chains
//!
//! This crate knows nothing about storage or HTTP routing; it exposes the
//! primitives the API layer composes into signin flows.

pub mod config;
pub mod cookie;
pub mod error;
pub mod guard;
pub mod jwt;
pub mod notify;
pub mod otp;
pub mod password;
pub mod types;

pub use config::{AuthConfig, CookieConfig, OtpConfig, PasswordConfig, TokenConfig};
pub use cookie::{CookieChannel, SessionCookieWriter};
pub use error::{AuthError, AuthResult};
pub use guard::{evaluate, GuardStep};
pub use jwt::TokenIssuer;
pub use notify::{LogNotifier, MemoryNotifier, OtpNotifier, SmtpConfig, SmtpNotifier};
pub use otp::{Clock, ManualClock, OtpCache, SystemClock};
pub use password::PasswordService;
pub use types::{Identity, Role, TokenClaims, TokenKind};

use std::sync::Arc;

/// Bundled authentication services shared across the API layer
pub struct AuthService {
    /// Token issuance and verification
    pub tokens: TokenIssuer,
    /// Live OTP challenges
    pub otp: OtpCache,
    /// Password hashing
    pub password: PasswordService,
    /// Refresh cookie builder
    pub cookies: SessionCookieWriter,
    /// OTP delivery channel
    pub notifier: Arc<dyn OtpNotifier>,
}

impl AuthService {
    /// Assemble the service from configuration and a delivery channel
    pub fn new(config: &AuthConfig, notifier: Arc<dyn OtpNotifier>) -> Self {
        Self {
            tokens: TokenIssuer::new(&config.tokens),
            otp: OtpCache::new(&config.otp),
            password: PasswordService::new(&config.password),
            cookies: SessionCookieWriter::new(&config.cookie),
            notifier,
        }
    }

    /// Assemble the service with an explicit clock for the OTP cache
    pub fn with_clock(
        config: &AuthConfig,
        notifier: Arc<dyn OtpNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tokens: TokenIssuer::new(&config.tokens),
            otp: OtpCache::with_clock(&config.otp, clock),
            password: PasswordService::new(&config.password),
            cookies: SessionCookieWriter::new(&config.cookie),
            notifier,
        }
    }

    /// Generate a challenge for `key`, cache it, then attempt delivery to
    /// `recipient`. Caching happens first: a delivery failure surfaces as an
    /// error but the cached code stays verifiable for its full TTL.
    pub async fn issue_challenge(&self, key: &str, recipient: &str) -> AuthResult<String> {
        let code = self.otp.issue(key);
        self.notifier.send_code(recipient, &code).await?;
        Ok(code)
    }

    /// Check a submitted code against the live challenge for `key`. The
    /// challenge is not consumed on success; it expires by TTL only.
    pub fn verify_challenge(&self, key: &str, code: &str) -> AuthResult<()> {
        if self.otp.matches(key, code) {
            Ok(())
        } else {
            Err(AuthError::OtpMismatch)
        }
    }
}
