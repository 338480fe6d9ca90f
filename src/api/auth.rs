//! Authentication API endpoints
//!
//! Handles HTTP requests for session establishment:
//! - POST /auth - Exchange an identity token for a session cookie
//!
//! The flow is fail-closed: any verification failure answers 401 with no
//! cookie, never 500. The cause is logged server-side only.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::auth::encode_session;

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "idToken")]
    pub id_token: String,
}

/// Response for successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
}

/// Build the Set-Cookie value for a freshly issued session
fn session_cookie(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!("session={}; Path=/; HttpOnly; Max-Age={}", value, max_age);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// POST /auth - Exchange an identity token for a session cookie
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = state.verifier.verify(&body.id_token).await.map_err(|e| {
        tracing::warn!("identity verification failed: {}", e);
        ApiError::unauthorized("Unauthorized")
    })?;

    let value = encode_session(&user_id, state.auth.session_ttl_seconds);
    let cookie = session_cookie(&value, state.auth.session_ttl_seconds, state.auth.secure_cookies);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| {
            tracing::warn!("failed to build session cookie: {}", e);
            ApiError::unauthorized("Unauthorized")
        })?,
    );

    tracing::info!(user_id = %user_id, "session issued");

    Ok((headers, Json(LoginResponse { status: "success" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{test_server, StubVerifier};
    use crate::auth::decode_session;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let server = test_server(StubVerifier::ok("uid-42")).await;

        let response = server.post("/auth").json(&json!({"idToken": "tok"})).await;
        response.assert_status_ok();
        response.assert_json(&json!({"status": "success"}));

        let set_cookie = response
            .headers()
            .get("set-cookie")
            .expect("login should set a cookie")
            .to_str()
            .unwrap()
            .to_string();

        assert!(set_cookie.starts_with("session="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("Max-Age=432000"));
        assert!(!set_cookie.contains("Secure"));

        let value = set_cookie
            .trim_start_matches("session=")
            .split(';')
            .next()
            .unwrap();
        let claims = decode_session(value).expect("cookie should decode");
        assert_eq!(claims.user_id, "uid-42");
    }

    #[tokio::test]
    async fn test_login_rejected_token_returns_401_without_cookie() {
        let server = test_server(StubVerifier::rejected()).await;

        let response = server.post("/auth").json(&json!({"idToken": "bad"})).await;
        response.assert_status_unauthorized();
        response.assert_json(&json!({"error": "Unauthorized"}));
        assert!(response.headers().get("set-cookie").is_none());
    }

    #[tokio::test]
    async fn test_login_no_matched_user_returns_401() {
        let server = test_server(StubVerifier::no_user()).await;

        let response = server.post("/auth").json(&json!({"idToken": "tok"})).await;
        response.assert_status_unauthorized();
        assert!(response.headers().get("set-cookie").is_none());
    }

    #[test]
    fn test_session_cookie_format() {
        let cookie = session_cookie("abc", 432000, false);
        assert_eq!(cookie, "session=abc; Path=/; HttpOnly; Max-Age=432000");
    }

    #[test]
    fn test_session_cookie_secure_flag() {
        let cookie = session_cookie("abc", 60, true);
        assert_eq!(cookie, "session=abc; Path=/; HttpOnly; Max-Age=60; Secure");
    }
}
