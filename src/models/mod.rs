//! Data models

pub mod note;
pub mod session;

pub use note::Note;
pub use session::SessionClaims;
