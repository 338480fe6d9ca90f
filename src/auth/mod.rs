//! Authentication primitives
//!
//! Session codec (cookie value encoding/validation) and identity token
//! verification against the external provider.

pub mod session;
pub mod verifier;

pub use session::{decode_session, encode_session, validate_session, SessionError};
pub use verifier::{HttpIdentityVerifier, IdentityVerifier, VerifyError};
