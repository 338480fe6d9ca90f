//! Session claims model

use serde::{Deserialize, Serialize};

/// Claims carried by the session cookie.
///
/// Serialized as `{"userId": ..., "exp": ...}` to stay wire-compatible with
/// cookies issued by earlier deployments of this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Authenticated user identifier
    pub user_id: String,
    /// Expiry as unix seconds
    pub exp: i64,
}

impl SessionClaims {
    /// Check if the session has expired relative to `now` (unix seconds)
    pub fn is_expired(&self, now: i64) -> bool {
        self.exp < now
    }
}
