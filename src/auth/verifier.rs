//! Identity token verification
//!
//! The login flow exchanges a third-party identity token for a session. The
//! token itself is opaque to this service: it is forwarded to an external
//! Firebase-style `accounts:lookup` endpoint, and the stable user identifier
//! comes back in the response. One outbound call per verification, no retries;
//! a transport error is a final failure for that request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for identity verification
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The verification request could not be completed
    #[error("verification request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The verification endpoint returned a non-success status
    #[error("verification endpoint rejected the token (status {0})")]
    Rejected(u16),

    /// The response carried no matched user record
    #[error("no user record matched the token")]
    NoUser,
}

/// Verifies a third-party identity token and resolves the user identifier
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `id_token`, returning the stable user identifier on success
    async fn verify(&self, id_token: &str) -> Result<String, VerifyError>;
}

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    #[serde(rename = "idToken")]
    id_token: &'a str,
}

/// Response from the `accounts:lookup` endpoint.
///
/// Only the matched-user list is read; audience and issuer fields are not
/// checked. Any 2xx response carrying a user record is accepted.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct LookupUser {
    #[serde(rename = "localId")]
    local_id: String,
}

/// HTTP-backed identity verifier
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    verify_url: String,
    api_key: String,
}

impl HttpIdentityVerifier {
    /// Create a verifier for the given endpoint and API key
    pub fn new(verify_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url: verify_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, id_token: &str) -> Result<String, VerifyError> {
        let response = self
            .client
            .post(&self.verify_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&LookupRequest { id_token })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VerifyError::Rejected(response.status().as_u16()));
        }

        let body: LookupResponse = response.json().await?;

        body.users
            .into_iter()
            .next()
            .map(|u| u.local_id)
            .ok_or(VerifyError::NoUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_response_parsing() {
        let body = r#"{"kind":"identitytoolkit#GetAccountInfoResponse","users":[{"localId":"uid-1","email":"a@example.com"}]}"#;
        let parsed: LookupResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.users.len(), 1);
        assert_eq!(parsed.users[0].local_id, "uid-1");
    }

    #[test]
    fn test_lookup_response_missing_users() {
        let parsed: LookupResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.users.is_empty());
    }

    #[test]
    fn test_lookup_request_wire_shape() {
        let json = serde_json::to_string(&LookupRequest { id_token: "tok" }).unwrap();
        assert_eq!(json, r#"{"idToken":"tok"}"#);
    }
}
