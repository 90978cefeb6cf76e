//! Authentication middleware
//!
//! Sessions are issued by the external identity provider. This middleware
//! only verifies the provider's bearer JWT (HS256, shared secret, expected
//! audience) and exposes the caller's identity to handlers.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Settings;
use crate::schemas::analysis::ErrorBody;

// ============================================================================
// Caller Identity
// ============================================================================

/// Verified caller, injected into request extensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Subject claim of the session token
    pub user_id: String,
    pub email: Option<String>,
    /// True when verification is disabled
    pub anonymous: bool,
}

impl CallerIdentity {
    pub fn anonymous() -> Self {
        Self {
            user_id: "anonymous".to_string(),
            email: None,
            anonymous: true,
        }
    }
}

/// Claims read from the identity provider's token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// ============================================================================
// Authentication Errors
// ============================================================================

/// Authentication error types
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token in the request
    MissingToken,
    /// Signature, audience or format check failed
    InvalidToken,
    /// Token was valid but has expired
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Autenticação necessária",
            AuthError::InvalidToken => "Sessão inválida",
            AuthError::ExpiredToken => "Sessão expirada. Faça login novamente.",
        };

        (StatusCode::UNAUTHORIZED, Json(ErrorBody::new(message))).into_response()
    }
}

// ============================================================================
// Authentication Middleware
// ============================================================================

/// Authentication state required by the middleware
#[derive(Clone)]
pub struct AuthState {
    pub settings: Arc<Settings>,
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl AuthState {
    pub fn new(settings: Arc<Settings>) -> Self {
        let decoding_key = settings
            .auth
            .jwt_secret
            .as_deref()
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()));

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[settings.auth.audience.as_str()]);

        Self {
            settings,
            decoding_key,
            validation,
        }
    }

    /// Verify a raw bearer token
    pub fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let Some(key) = self.decoding_key.as_ref() else {
            tracing::error!("Session verification enabled without a secret");
            return Err(AuthError::InvalidToken);
        };

        let data = decode::<SessionClaims>(token, key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => {
                    tracing::debug!(error = %e, "Session token rejected");
                    AuthError::InvalidToken
                }
            }
        })?;

        Ok(CallerIdentity {
            user_id: data.claims.sub,
            email: data.claims.email,
            anonymous: false,
        })
    }
}

/// Middleware to require a verified session
///
/// # Errors
/// - 401 Unauthorized: missing, invalid or expired token
pub async fn require_session(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    if !auth_state.settings.auth.require_auth {
        request.extensions_mut().insert(CallerIdentity::anonymous());
        return Ok(next.run(request).await);
    }

    let Some(token) = extract_bearer_token(&request) else {
        tracing::warn!("Request missing Authorization: Bearer token");
        return Err(AuthError::MissingToken);
    };

    let identity = auth_state.verify(&token).inspect_err(|e| {
        tracing::warn!(reason = ?e, "Session verification failed");
    })?;

    tracing::debug!(user_id = %identity.user_id, "Session verified");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token<B>(request: &Request<B>) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Tests
// ============================================================================
