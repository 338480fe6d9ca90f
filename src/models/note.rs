//! Note model
//!
//! This module provides:
//! - `Note` entity representing a single note owned by one user
//!
//! The `user_id` is set from the authenticated session at creation time and
//! is never writable by the client. Every store query filters on it, so
//! cross-user access is structurally impossible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier (store-assigned)
    pub id: i64,
    /// Owning user identifier (immutable after creation)
    pub user_id: String,
    /// Note title
    pub title: String,
    /// Note body
    pub content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_snake_case_columns() {
        let now = Utc::now();
        let note = Note {
            id: 1,
            user_id: "user-1".to_string(),
            title: "t".to_string(),
            content: "c".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["user_id"], "user-1");
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());
    }
}
