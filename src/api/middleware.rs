//! API middleware
//!
//! Contains middleware for:
//! - Authentication (session cookie validation)
//!
//! Every route under `/notes` goes through [`require_session`]; handlers then
//! read the caller's identity from [`AuthenticatedUser`] in the request
//! extensions.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::auth::{validate_session, IdentityVerifier};
use crate::config::AuthConfig;
use crate::db::repositories::NoteRepository;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: crate::db::DynDatabasePool,
    pub notes: Arc<dyn NoteRepository>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub auth: Arc<AuthConfig>,
}

/// Authenticated user extracted from request
///
/// Wraps the stable user identifier assigned by the identity provider.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

/// Error response for API errors
///
/// The code drives the status mapping and stays server-side; the wire body
/// is the flat `{"error": "<message>"}` shape clients already parse.
#[derive(Debug)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

/// Extract the session cookie value from a request
fn extract_session_cookie(request: &Request) -> Option<String> {
    if let Some(cookie_header) = request.headers().get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(value) = cookie.strip_prefix("session=") {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}

/// Authentication middleware
///
/// Rejects with 401 when the session cookie is missing, malformed, or
/// expired. The three cases are indistinguishable to the caller.
pub async fn require_session(
    State(_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie = extract_session_cookie(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing session cookie"))?;

    let user_id = validate_session(&cookie, Utc::now().timestamp()).map_err(|e| {
        tracing::debug!("session rejected: {}", e);
        ApiError::unauthorized("Invalid or expired session")
    })?;

    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}

// Extractor for AuthenticatedUser from request extensions
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
