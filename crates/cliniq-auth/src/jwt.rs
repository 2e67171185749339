//! Token issuer
//!
//! Dual-token JWT issuance: short-lived access tokens and long-lived refresh
//! tokens signed with independent secrets. Verification is purely
//! cryptographic; there is no revocation list. Refreshing re-mints an access
//! token from the refresh claims and never rotates the refresh token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::TokenConfig;
use crate::error::{AuthError, AuthResult};
use crate::types::{Identity, TokenClaims, TokenKind};

/// JWT issuance and verification service
#[derive(Clone)]
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::from_std(config.access_ttl)
                .unwrap_or_else(|_| Duration::minutes(15)),
            refresh_ttl: Duration::from_std(config.refresh_ttl)
                .unwrap_or_else(|_| Duration::days(30)),
        }
    }

    /// Issue a short-lived access token
    pub fn issue_access(&self, identity: &Identity) -> AuthResult<String> {
        let claims = self.claims_for(identity, self.access_ttl);
        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to encode access token: {}", e)))
    }

    /// Issue a long-lived refresh token
    pub fn issue_refresh(&self, identity: &Identity) -> AuthResult<String> {
        let claims = self.claims_for(identity, self.refresh_ttl);
        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to encode refresh token: {}", e)))
    }

    /// Verify a token against the secret for `kind` and return its claims.
    /// Expired tokens map to [`AuthError::TokenExpired`], everything else to
    /// [`AuthError::InvalidToken`].
    pub fn verify(&self, token: &str, kind: TokenKind) -> AuthResult<TokenClaims> {
        let decoding_key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };

        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<TokenClaims>(token, decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Mint a fresh access token from a valid refresh token. The subject and
    /// role claims are carried over unchanged; the refresh token stays valid.
    pub fn refresh_access(&self, refresh_token: &str) -> AuthResult<String> {
        let claims = self.verify(refresh_token, TokenKind::Refresh)?;
        let identity = Identity::from_claims(&claims)?;
        self.issue_access(&identity)
    }

    fn claims_for(&self, identity: &Identity, ttl: Duration) -> TokenClaims {
        let now = Utc::now();
        TokenClaims {
            sub: identity.subject.to_string(),
            role: identity.role,
            is_doctor: identity.is_doctor,
            is_patient: identity.is_patient,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}
