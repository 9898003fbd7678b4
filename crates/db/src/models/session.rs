//! Login session DTOs.

use civic_core::types::{DbId, Timestamp};

/// DTO for persisting a new session. Only the token digest is stored.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
