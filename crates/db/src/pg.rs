//! PostgreSQL-backed [`Store`].

use async_trait::async_trait;
use civic_core::contract::{NewIssue, UpdateIssue};
use civic_core::issue::{Issue, IssueStats, IssueStatus};
use civic_core::policy::Requester;
use civic_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::issue::IssueRow;
use crate::models::session::NewSession;
use crate::models::user::{NewUser, UserRecord};
use crate::repositories::{IssueRepo, SessionRepo, UserRepo};
use crate::store::Store;
use crate::DbPool;

/// [`Store`] over a sqlx connection pool, delegating to the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode_issues(rows: Vec<IssueRow>) -> Result<Vec<Issue>, StoreError> {
    rows.into_iter().map(Issue::try_from).collect()
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn get_user(&self, id: DbId) -> Result<Option<UserRecord>, StoreError> {
        UserRepo::find_by_id(&self.pool, id)
            .await?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        UserRepo::find_by_username(&self.pool, username)
            .await?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn create_user(&self, input: &NewUser) -> Result<UserRecord, StoreError> {
        let row = UserRepo::create(&self.pool, input)
            .await
            .map_err(StoreError::from_sqlx)?;
        tracing::debug!(user_id = row.id, username = %row.username, "User created");
        UserRecord::try_from(row)
    }

    async fn list_issues(&self, requester: &Requester) -> Result<Vec<Issue>, StoreError> {
        let rows = if requester.is_admin() {
            IssueRepo::list_all(&self.pool).await?
        } else {
            IssueRepo::list_by_user(&self.pool, requester.id).await?
        };
        decode_issues(rows)
    }

    async fn get_issue(&self, id: DbId) -> Result<Option<Issue>, StoreError> {
        IssueRepo::find_by_id(&self.pool, id)
            .await?
            .map(Issue::try_from)
            .transpose()
    }

    async fn create_issue(&self, input: &NewIssue) -> Result<Issue, StoreError> {
        let row = IssueRepo::create(&self.pool, input)
            .await
            .map_err(StoreError::from_sqlx)?;
        Issue::try_from(row)
    }

    async fn update_issue(
        &self,
        id: DbId,
        input: &UpdateIssue,
    ) -> Result<Option<Issue>, StoreError> {
        IssueRepo::update(&self.pool, id, input)
            .await?
            .map(Issue::try_from)
            .transpose()
    }

    async fn delete_issue(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(IssueRepo::delete(&self.pool, id).await?)
    }

    async fn issue_stats(&self) -> Result<IssueStats, StoreError> {
        let mut stats = IssueStats::default();
        for (status, count) in IssueRepo::count_by_status(&self.pool).await? {
            let status: IssueStatus = status
                .parse()
                .map_err(|e| StoreError::Corrupt(format!("issues.status: {e}")))?;
            stats.total += count;
            match status {
                IssueStatus::Pending => stats.pending += count,
                IssueStatus::InProgress => stats.in_progress += count,
                IssueStatus::Resolved => stats.resolved += count,
            }
        }
        Ok(stats)
    }

    async fn create_session(&self, input: &NewSession) -> Result<(), StoreError> {
        SessionRepo::create(&self.pool, input)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_session_user(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<DbId>, StoreError> {
        Ok(SessionRepo::find_active_user_id(&self.pool, token_hash, now).await?)
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        Ok(SessionRepo::delete_by_token_hash(&self.pool, token_hash).await?)
    }

    async fn purge_expired_sessions(&self, now: Timestamp) -> Result<u64, StoreError> {
        Ok(SessionRepo::delete_expired(&self.pool, now).await?)
    }
}
