//! # Access Gate
//!
//! HTTP Basic authentication in front of every protected route.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Request                                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Authorization header? ── missing ──────────────► 401 (no lookup)      │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  "Basic base64(login:password)"? ── malformed ──► 401 (no lookup)      │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  AuthService::authenticate ── failed ──────────► 401                   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  extensions += AuthenticatedUser(user) ──► handler                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every 401 carries `WWW-Authenticate: Basic realm="farmacia"`.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::ApiError;
use crate::services::{AuthService, ServiceError};
use crate::AppState;
use farmacia_core::{CoreError, User};

/// The user admitted by the gate, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Builds the `Authorization` value for a login/password pair.
pub fn basic_token(login: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{login}:{password}")))
}

/// Splits a `Basic` header value into `(login, password)`.
///
/// The scheme is matched case-insensitively. The password is everything
/// after the first `:`, so it may itself contain colons.
pub fn parse_basic_credentials(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (login, password) = decoded.split_once(':')?;

    Some((login.to_string(), password.to_string()))
}

/// Decides whether a request carrying `authorization` may proceed.
///
/// Missing or malformed headers are rejected before the service is called.
/// Storage failures during the lookup surface as their own (5xx) errors.
pub async fn admit(
    service: &AuthService,
    authorization: Option<&HeaderValue>,
) -> Result<User, ApiError> {
    let Some(value) = authorization else {
        debug!("Rejected request without Authorization header");
        return Err(ApiError::unauthorized());
    };

    let credentials = value.to_str().ok().and_then(parse_basic_credentials);
    let Some((login, password)) = credentials else {
        debug!("Rejected malformed Authorization header");
        return Err(ApiError::unauthorized());
    };

    match service.authenticate(&login, &password).await {
        Ok(session) => Ok(session.user),
        Err(ServiceError::Core(CoreError::AuthenticationFailed)) => Err(ApiError::unauthorized()),
        Err(other) => Err(other.into()),
    }
}

/// Middleware guarding the protected routes.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = request.headers().get(header::AUTHORIZATION).cloned();
    let user = admit(&state.users, authorization.as_ref()).await?;

    debug!(user_id = user.id, "Request admitted");
    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

// =============================================================================
// Unit Tests
// =============================================================================
