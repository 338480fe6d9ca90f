//! Note repository
//!
//! Database operations for user notes.
//!
//! This module provides:
//! - `NoteRepository` trait defining the interface for note data access
//! - `SqlxNoteRepository` implementing the trait for SQLite and PostgreSQL
//!
//! Every query carries the owning `user_id` in its WHERE clause. Update and
//! delete report whether a row matched `(id, user_id)` so callers can answer
//! 404 without distinguishing "absent" from "owned by someone else".

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Note;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, SqlitePool};
use std::sync::Arc;

/// Note repository trait
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List all notes owned by `user_id`, newest update first
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Note>>;

    /// Insert a new note owned by `user_id` and return the persisted row
    async fn create(&self, user_id: &str, title: &str, content: &str) -> Result<Note>;

    /// Update the note matching `(id, user_id)`, refreshing `updated_at`.
    ///
    /// Returns `None` when no row matched.
    async fn update(
        &self,
        user_id: &str,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>>;

    /// Delete the note matching `(id, user_id)`.
    ///
    /// Returns `false` when no row matched.
    async fn delete(&self, user_id: &str, id: i64) -> Result<bool>;
}

/// SQLx-based note repository implementation
///
/// Supports both SQLite and PostgreSQL databases.
pub struct SqlxNoteRepository {
    pool: DynDatabasePool,
}

impl SqlxNoteRepository {
    /// Create a new SQLx note repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NoteRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NoteRepository for SqlxNoteRepository {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Note>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_notes_sqlite(self.pool.as_sqlite().unwrap(), user_id).await
            }
            DatabaseDriver::Postgres => {
                list_notes_postgres(self.pool.as_postgres().unwrap(), user_id).await
            }
        }
    }

    async fn create(&self, user_id: &str, title: &str, content: &str) -> Result<Note> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_note_sqlite(self.pool.as_sqlite().unwrap(), user_id, title, content).await
            }
            DatabaseDriver::Postgres => {
                create_note_postgres(self.pool.as_postgres().unwrap(), user_id, title, content)
                    .await
            }
        }
    }

    async fn update(
        &self,
        user_id: &str,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_note_sqlite(self.pool.as_sqlite().unwrap(), user_id, id, title, content)
                    .await
            }
            DatabaseDriver::Postgres => {
                update_note_postgres(self.pool.as_postgres().unwrap(), user_id, id, title, content)
                    .await
            }
        }
    }

    async fn delete(&self, user_id: &str, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_note_sqlite(self.pool.as_sqlite().unwrap(), user_id, id).await
            }
            DatabaseDriver::Postgres => {
                delete_note_postgres(self.pool.as_postgres().unwrap(), user_id, id).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn list_notes_sqlite(pool: &SqlitePool, user_id: &str) -> Result<Vec<Note>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, title, content, created_at, updated_at
        FROM notes
        WHERE user_id = ?
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list notes")?;

    rows.iter().map(row_to_note_sqlite).collect()
}

async fn create_note_sqlite(
    pool: &SqlitePool,
    user_id: &str,
    title: &str,
    content: &str,
) -> Result<Note> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO notes (user_id, title, content, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create note")?;

    Ok(Note {
        id: result.last_insert_rowid(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    })
}

async fn update_note_sqlite(
    pool: &SqlitePool,
    user_id: &str,
    id: i64,
    title: &str,
    content: &str,
) -> Result<Option<Note>> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        UPDATE notes
        SET title = ?, content = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(now)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await
    .context("Failed to update note")?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    let row = sqlx::query(
        r#"
        SELECT id, user_id, title, content, created_at, updated_at
        FROM notes
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .context("Failed to reload updated note")?;

    Ok(Some(row_to_note_sqlite(&row)?))
}

async fn delete_note_sqlite(pool: &SqlitePool, user_id: &str, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete note")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_note_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Note> {
    Ok(Note {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn list_notes_postgres(pool: &PgPool, user_id: &str) -> Result<Vec<Note>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, title, content, created_at, updated_at
        FROM notes
        WHERE user_id = $1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list notes")?;

    rows.iter().map(row_to_note_postgres).collect()
}

async fn create_note_postgres(
    pool: &PgPool,
    user_id: &str,
    title: &str,
    content: &str,
) -> Result<Note> {
    let now = Utc::now();
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO notes (user_id, title, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("Failed to create note")?;

    Ok(Note {
        id,
        user_id: user_id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    })
}

async fn update_note_postgres(
    pool: &PgPool,
    user_id: &str,
    id: i64,
    title: &str,
    content: &str,
) -> Result<Option<Note>> {
    let now = Utc::now();
    let row = sqlx::query(
        r#"
        UPDATE notes
        SET title = $1, content = $2, updated_at = $3
        WHERE id = $4 AND user_id = $5
        RETURNING id, user_id, title, content, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(now)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to update note")?;

    match row {
        Some(row) => Ok(Some(row_to_note_postgres(&row)?)),
        None => Ok(None),
    }
}

async fn delete_note_postgres(pool: &PgPool, user_id: &str, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete note")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_note_postgres(row: &sqlx::postgres::PgRow) -> Result<Note> {
    Ok(Note {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxNoteRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxNoteRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_note() {
        let repo = setup_test_repo().await;

        let note = repo
            .create("user-a", "First", "Hello")
            .await
            .expect("Failed to create note");

        assert!(note.id > 0);
        assert_eq!(note.user_id, "user-a");
        assert_eq!(note.title, "First");
        assert_eq!(note.content, "Hello");
        assert_eq!(note.created_at, note.updated_at);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let repo = setup_test_repo().await;

        let notes = repo.list_by_user("user-a").await.expect("Failed to list");
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_list_ordered_by_updated_at_desc() {
        let repo = setup_test_repo().await;

        let first = repo.create("user-a", "first", "1").await.unwrap();
        let second = repo.create("user-a", "second", "2").await.unwrap();

        let notes = repo.list_by_user("user-a").await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, second.id);
        assert_eq!(notes[1].id, first.id);

        // Updating the older note moves it to the front
        repo.update("user-a", first.id, "first!", "1!")
            .await
            .unwrap()
            .expect("update should match");

        let notes = repo.list_by_user("user-a").await.unwrap();
        assert_eq!(notes[0].id, first.id);
        assert_eq!(notes[0].title, "first!");
    }

    #[tokio::test]
    async fn test_list_scoped_to_user() {
        let repo = setup_test_repo().await;

        repo.create("user-a", "mine", "a").await.unwrap();
        repo.create("user-b", "theirs", "b").await.unwrap();

        let notes = repo.list_by_user("user-a").await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "mine");
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let repo = setup_test_repo().await;

        let note = repo.create("user-a", "t", "c").await.unwrap();
        let updated = repo
            .update("user-a", note.id, "t2", "c2")
            .await
            .unwrap()
            .expect("update should match");

        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "t2");
        assert_eq!(updated.content, "c2");
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at > note.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_matches_nothing() {
        let repo = setup_test_repo().await;

        let result = repo.update("user-a", 9999, "t", "c").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_other_users_note_matches_nothing() {
        let repo = setup_test_repo().await;

        let note = repo.create("user-a", "original", "body").await.unwrap();

        let result = repo.update("user-b", note.id, "hijack", "x").await.unwrap();
        assert!(result.is_none());

        // Owner's note is unchanged
        let notes = repo.list_by_user("user-a").await.unwrap();
        assert_eq!(notes[0].title, "original");
        assert_eq!(notes[0].content, "body");
    }

    #[tokio::test]
    async fn test_delete_note() {
        let repo = setup_test_repo().await;

        let note = repo.create("user-a", "t", "c").await.unwrap();
        assert!(repo.delete("user-a", note.id).await.unwrap());

        let notes = repo.list_by_user("user-a").await.unwrap();
        assert!(notes.is_empty());

        // Second delete matches nothing
        assert!(!repo.delete("user-a", note.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_other_users_note_matches_nothing() {
        let repo = setup_test_repo().await;

        let note = repo.create("user-a", "t", "c").await.unwrap();
        assert!(!repo.delete("user-b", note.id).await.unwrap());

        // Still present for the owner
        let notes = repo.list_by_user("user-a").await.unwrap();
        assert_eq!(notes.len(), 1);
    }
}
