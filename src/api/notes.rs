//! Notes API endpoints
//!
//! Handles HTTP requests for the caller's notes:
//! - GET /notes - List notes, newest update first
//! - POST /notes - Create a note
//! - PUT /notes - Update a note
//! - DELETE /notes - Delete a note
//!
//! All routes run behind the session guard; handlers receive the owner
//! identity from [`AuthenticatedUser`] and never touch another user's rows.
//! Update and delete target the note by id from the request body, matching
//! only rows the caller owns; a miss answers 404 whether the note is absent
//! or owned by someone else.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::Note;

/// Request body for creating a note
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

/// Request body for updating a note
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Request body for deleting a note
#[derive(Debug, Deserialize)]
pub struct DeleteNoteRequest {
    pub id: i64,
}

/// GET /notes - List the caller's notes ordered by last update
pub async fn list_notes(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.notes.list_by_user(&user.0).await.map_err(|e| {
        tracing::error!("failed to list notes: {:#}", e);
        ApiError::internal_error("Internal server error")
    })?;

    Ok(Json(notes))
}

/// POST /notes - Create a note owned by the caller
pub async fn create_note(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = state
        .notes
        .create(&user.0, &body.title, &body.content)
        .await
        .map_err(|e| {
            tracing::error!("failed to create note: {:#}", e);
            ApiError::internal_error("Internal server error")
        })?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /notes - Update one of the caller's notes
pub async fn update_note(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    let note = state
        .notes
        .update(&user.0, body.id, &body.title, &body.content)
        .await
        .map_err(|e| {
            tracing::error!("failed to update note: {:#}", e);
            ApiError::internal_error("Internal server error")
        })?
        .ok_or_else(|| ApiError::not_found(format!("Note not found: {}", body.id)))?;

    Ok(Json(note))
}

/// DELETE /notes - Delete one of the caller's notes
pub async fn delete_note(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<DeleteNoteRequest>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.notes.delete(&user.0, body.id).await.map_err(|e| {
        tracing::error!("failed to delete note: {:#}", e);
        ApiError::internal_error("Internal server error")
    })?;

    if !deleted {
        return Err(ApiError::not_found(format!("Note not found: {}", body.id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
