//! Session codec
//!
//! Turns a user identifier plus expiry into an opaque cookie value and back.
//! The encoding is base64 over a small JSON payload. It is reversible and NOT
//! signed: anyone who knows the scheme can mint a session. This is a known
//! weakness kept for compatibility with cookies already in circulation;
//! replacing it with an HMAC-signed token or a server-side session table
//! changes the trust model and is left to an explicit follow-up.
//!
//! Malformed input and expired sessions are distinct error variants so tests
//! can tell them apart, but both collapse to a single 401 at the HTTP layer.

use chrono::Utc;
use data_encoding::BASE64;

use crate::models::SessionClaims;

/// Error type for session decoding and validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Cookie value is not valid base64(JSON) claims
    #[error("malformed session cookie")]
    Malformed,
    /// Claims decoded fine but the expiry has passed
    #[error("session expired")]
    Expired,
}

/// Encode claims into an opaque cookie value
pub fn encode_claims(claims: &SessionClaims) -> String {
    let json = serde_json::to_vec(claims).unwrap_or_default();
    BASE64.encode(&json)
}

/// Build a session for `user_id` expiring `ttl_seconds` from now and encode it
pub fn encode_session(user_id: &str, ttl_seconds: i64) -> String {
    let claims = SessionClaims {
        user_id: user_id.to_string(),
        exp: Utc::now().timestamp() + ttl_seconds,
    };
    encode_claims(&claims)
}

/// Decode an opaque cookie value back into claims.
///
/// Does not check expiry; use [`validate_session`] for that.
pub fn decode_session(value: &str) -> Result<SessionClaims, SessionError> {
    let bytes = BASE64
        .decode(value.as_bytes())
        .map_err(|_| SessionError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| SessionError::Malformed)
}

/// Decode a cookie value and check its expiry against `now` (unix seconds).
///
/// Returns the authenticated user identifier on success.
pub fn validate_session(value: &str, now: i64) -> Result<String, SessionError> {
    let claims = decode_session(value)?;
    if claims.is_expired(now) {
        return Err(SessionError::Expired);
    }
    Ok(claims.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let cookie = encode_session("user-123", 3600);
        let claims = decode_session(&cookie).expect("decode should succeed");
        assert_eq!(claims.user_id, "user-123");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_validate_fresh_session() {
        let cookie = encode_session("user-123", 3600);
        let user_id =
            validate_session(&cookie, Utc::now().timestamp()).expect("session should be valid");
        assert_eq!(user_id, "user-123");
    }

    #[test]
    fn test_validate_expired_session() {
        let cookie = encode_session("user-123", -10);
        let err = validate_session(&cookie, Utc::now().timestamp()).unwrap_err();
        assert_eq!(err, SessionError::Expired);
    }

    #[test]
    fn test_expired_rejected_regardless_of_user() {
        for user in ["a", "another-user", "admin"] {
            let cookie = encode_claims(&SessionClaims {
                user_id: user.to_string(),
                exp: 0,
            });
            assert_eq!(
                validate_session(&cookie, Utc::now().timestamp()),
                Err(SessionError::Expired)
            );
        }
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert_eq!(decode_session("not base64!!!"), Err(SessionError::Malformed));
    }

    #[test]
    fn test_decode_valid_base64_invalid_json() {
        let cookie = BASE64.encode(b"not json at all");
        assert_eq!(decode_session(&cookie), Err(SessionError::Malformed));
    }

    #[test]
    fn test_decode_empty_value() {
        assert_eq!(decode_session(""), Err(SessionError::Malformed));
    }

    #[test]
    fn test_decode_legacy_cookie() {
        // base64 of {"userId":"firebase-uid-123","exp":9999999999}, as a
        // previously issued cookie would carry it
        let cookie = "eyJ1c2VySWQiOiJmaXJlYmFzZS11aWQtMTIzIiwiZXhwIjo5OTk5OTk5OTk5fQ==";
        let claims = decode_session(cookie).expect("legacy cookie should decode");
        assert_eq!(claims.user_id, "firebase-uid-123");
        assert_eq!(claims.exp, 9_999_999_999);
    }

    #[test]
    fn test_malformed_and_expired_are_distinct() {
        let expired = encode_session("u", -1);
        assert_eq!(
            validate_session(&expired, Utc::now().timestamp()),
            Err(SessionError::Expired)
        );
        assert_eq!(
            validate_session("garbage", Utc::now().timestamp()),
            Err(SessionError::Malformed)
        );
    }
}
