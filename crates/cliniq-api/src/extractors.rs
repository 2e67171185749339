//! Custom Axum extractors

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use cliniq_auth::{Identity, TokenKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Verified caller extracted from the Authorization header.
///
/// This is the mandatory entry step of every guard chain: it pulls the bearer
/// token, verifies it as an access token, and exposes the decoded identity.
/// Downstream guard steps run inside the handler against this identity.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Token not found".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Token not found".to_string()))?;

        let claims = state.auth.tokens.verify(token, TokenKind::Access)?;
        let identity = Identity::from_claims(&claims)?;

        Ok(AuthUser(identity))
    }
}
