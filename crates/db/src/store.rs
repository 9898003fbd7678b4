//! The storage seam handlers are written against.

use async_trait::async_trait;
use civic_core::contract::{NewIssue, UpdateIssue};
use civic_core::issue::{Issue, IssueStats};
use civic_core::policy::Requester;
use civic_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::session::NewSession;
use crate::models::user::{NewUser, UserRecord};

/// Durable storage for users, issues and sessions.
///
/// Implementations enforce only referential and uniqueness invariants.
/// Who may call what is decided by `civic_core::policy` before any of these
/// methods run; the one exception is [`Store::list_issues`], which applies
/// the role-based filter inside the query.
#[async_trait]
pub trait Store: Send + Sync {
    /// Confirm the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    async fn get_user(&self, id: DbId) -> Result<Option<UserRecord>, StoreError>;

    /// Case-sensitive lookup by login name.
    async fn get_user_by_username(&self, username: &str)
        -> Result<Option<UserRecord>, StoreError>;

    /// Insert a user. A taken username yields [`StoreError::Conflict`].
    async fn create_user(&self, input: &NewUser) -> Result<UserRecord, StoreError>;

    /// Every issue for admins, only their own for everyone else.
    /// Newest first, ties broken by descending id.
    async fn list_issues(&self, requester: &Requester) -> Result<Vec<Issue>, StoreError>;

    async fn get_issue(&self, id: DbId) -> Result<Option<Issue>, StoreError>;

    /// Insert an issue stamped with the current time.
    async fn create_issue(&self, input: &NewIssue) -> Result<Issue, StoreError>;

    /// Merge the present fields of `input` onto the stored issue.
    /// Returns `None` when the id does not exist.
    async fn update_issue(
        &self,
        id: DbId,
        input: &UpdateIssue,
    ) -> Result<Option<Issue>, StoreError>;

    /// Permanently delete an issue. Deleting a missing id is not an error;
    /// the return value says whether anything was removed.
    async fn delete_issue(&self, id: DbId) -> Result<bool, StoreError>;

    /// Status counts over every stored issue, computed fresh on each call.
    async fn issue_stats(&self) -> Result<IssueStats, StoreError>;

    async fn create_session(&self, input: &NewSession) -> Result<(), StoreError>;

    /// Resolve a token digest to its user id if the session has not expired.
    async fn find_session_user(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<DbId>, StoreError>;

    async fn delete_session(&self, token_hash: &str) -> Result<bool, StoreError>;

    /// Drop sessions that expired at or before `now`, returning how many.
    async fn purge_expired_sessions(&self, now: Timestamp) -> Result<u64, StoreError>;
}
