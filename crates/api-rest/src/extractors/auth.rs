//! Bearer-token sessions.
//!
//! Tokens are HS256 JWTs minted by the login provider (or by the
//! `issue-token` command in development) and carry the username plus the
//! session they belong to.

use crate::{error::ApiError, state::AppState};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use leaderboard_application::SessionContext;
use leaderboard_domain::{AuthorizationError, LoginProvider, SessionId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Clock skew tolerated when checking `exp`, in seconds
pub const TOKEN_LEEWAY_SECS: u64 = 60;

/// Claims stored in JWT token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Session the token belongs to
    pub sid: String,

    /// Issued at (as UTC timestamp)
    pub iat: usize,

    /// Expiration time (as UTC timestamp)
    pub exp: usize,
}

impl Claims {
    /// Claims for `username` valid for `ttl` from now
    pub fn new(username: impl Into<String>, session_id: SessionId, ttl: Duration) -> Self {
        let now = Utc::now().timestamp().max(0) as usize;
        Self {
            sub: username.into(),
            sid: session_id.to_string(),
            iat: now,
            exp: now.saturating_add(ttl.as_secs() as usize),
        }
    }

    /// Get session ID from claims
    pub fn session_id(&self) -> Result<SessionId, AuthorizationError> {
        self.sid
            .parse()
            .map_err(|_| AuthorizationError::InvalidToken("Invalid session ID in token".to_string()))
    }
}

/// Sign claims with the shared secret
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, ApiError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to create token: {}", e)))
}

/// Verify a token and return its claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthorizationError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = TOKEN_LEEWAY_SECS;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
    .map(|data| data.claims)
    .map_err(|e| AuthorizationError::InvalidToken(format!("Token validation failed: {}", e)))
}

/// What a verified bearer token says about the caller
#[derive(Debug, Clone)]
pub struct TokenLogin {
    claims: Option<Claims>,
    signed_out: bool,
}

impl TokenLogin {
    /// A caller without a token
    pub fn anonymous() -> Self {
        Self {
            claims: None,
            signed_out: false,
        }
    }

    pub fn verified(claims: Claims, signed_out: bool) -> Self {
        Self {
            claims: Some(claims),
            signed_out,
        }
    }
}

impl LoginProvider for TokenLogin {
    fn is_access_allowed(&self) -> bool {
        self.claims.is_some()
    }

    fn get_username(&self) -> Option<String> {
        self.claims.as_ref().map(|claims| claims.sub.clone())
    }

    fn has_signed_out(&self) -> bool {
        self.signed_out
    }
}

/// Session of the caller; anonymous when no bearer token is sent
#[derive(Debug, Clone)]
pub struct Session(pub SessionContext);

/// Session of a caller that presented a valid bearer token, with its claims
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub ctx: SessionContext,
    pub claims: Claims,
}

/// Resolve the caller's session, returning the claims when a token was sent
fn resolve_session(
    parts: &Parts,
    state: &AppState,
) -> Result<(SessionContext, Option<Claims>), ApiError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        let ctx = SessionContext::from_login(
            SessionId::new(),
            &TokenLogin::anonymous(),
            state.admin_username(),
        );
        return Ok((ctx, None));
    };

    // Extract token from "Bearer <token>"
    let token = auth_header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AuthorizationError::InvalidToken("Invalid authorization header format".to_string())
        })?;

    let claims = decode_token(token, state.jwt_secret())?;
    let session_id = claims.session_id()?;
    let login = TokenLogin::verified(claims.clone(), state.has_signed_out(&session_id));
    let ctx = SessionContext::from_login(session_id, &login, state.admin_username());
    Ok((ctx, Some(claims)))
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (ctx, _) = resolve_session(parts, state)?;
        Ok(Self(ctx))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SignedIn {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_session(parts, state)? {
            (ctx, Some(claims)) => Ok(Self { ctx, claims }),
            (_, None) => Err(AuthorizationError::InvalidToken(
                "Missing bearer token".to_string(),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough";

    #[test]
    fn test_token_round_trip() {
        let session_id = SessionId::new();
        let claims = Claims::new("alice", session_id, Duration::from_secs(60));
        let token = issue_token(&claims, SECRET).unwrap();

        let decoded = decode_token(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.session_id().unwrap(), session_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new("alice", SessionId::new(), Duration::from_secs(60));
        let token = issue_token(&claims, SECRET).unwrap();
        assert!(matches!(
            decode_token(&token, "another-secret-key-that-is-long-enough"),
            Err(AuthorizationError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut claims = Claims::new("alice", SessionId::new(), Duration::from_secs(60));
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = issue_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_token_login_reports_sign_out() {
        let claims = Claims::new("alice", SessionId::new(), Duration::from_secs(60));
        let login = TokenLogin::verified(claims.clone(), true);
        assert!(login.is_access_allowed());
        assert!(login.has_signed_out());
        assert_eq!(login.get_username().as_deref(), Some("alice"));

        let anonymous = TokenLogin::anonymous();
        assert!(!anonymous.is_access_allowed());
        assert_eq!(anonymous.get_username(), None);
    }
}
