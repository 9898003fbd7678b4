//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- Session tokens, their digests, and the session cookie.

pub mod password;
pub mod session;
