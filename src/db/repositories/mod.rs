//! Repository layer
//!
//! Data access behind traits so handlers stay driver-agnostic.

pub mod note;

pub use note::{NoteRepository, SqlxNoteRepository};
