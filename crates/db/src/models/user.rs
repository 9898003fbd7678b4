//! User entity model and DTOs.

use civic_core::contract::User;
use civic_core::policy::Requester;
use civic_core::roles::Role;
use civic_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::error::StoreError;

/// Raw row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub name: String,
    pub created_at: Timestamp,
}

/// A stored user with its role decoded.
///
/// Contains the password hash -- NEVER serialize this to API responses.
/// Use [`UserRecord::to_public`] for external-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub created_at: Timestamp,
}

impl UserRecord {
    /// The client-facing view of this user.
    pub fn to_public(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            name: self.name.clone(),
        }
    }

    /// The identity the access policy reasons about.
    pub fn requester(&self) -> Requester {
        Requester {
            id: self.id,
            role: self.role,
        }
    }
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("users.id={}: {e}", row.id)))?;
        Ok(UserRecord {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role,
            name: row.name,
            created_at: row.created_at,
        })
    }
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
}
