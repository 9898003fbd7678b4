//! In-process [`Store`] used by tests and by local runs without `DATABASE_URL`.
//!
//! Mirrors the PostgreSQL backend's observable behaviour: monotonically
//! increasing ids, unique usernames, owner foreign keys, newest-first
//! ordering with id as tie-breaker. Nothing survives a restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use civic_core::contract::{NewIssue, UpdateIssue};
use civic_core::issue::{Issue, IssueStats};
use civic_core::policy::Requester;
use civic_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::session::NewSession;
use crate::models::user::{NewUser, UserRecord};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    users: BTreeMap<DbId, UserRecord>,
    issues: BTreeMap<DbId, Issue>,
    /// token digest -> (user id, expiry)
    sessions: HashMap<String, (DbId, Timestamp)>,
    last_user_id: DbId,
    last_issue_id: DbId,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(issues: &mut [Issue]) {
    issues.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_user(&self, id: DbId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, input: &NewUser) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::Conflict(
                "Duplicate value violates unique constraint: uq_users_username".into(),
            ));
        }
        tables.last_user_id += 1;
        let user = UserRecord {
            id: tables.last_user_id,
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            name: input.name.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        tracing::debug!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    async fn list_issues(&self, requester: &Requester) -> Result<Vec<Issue>, StoreError> {
        let tables = self.tables.read().await;
        let mut issues: Vec<Issue> = tables
            .issues
            .values()
            .filter(|i| requester.is_admin() || i.user_id == requester.id)
            .cloned()
            .collect();
        newest_first(&mut issues);
        Ok(issues)
    }

    async fn get_issue(&self, id: DbId) -> Result<Option<Issue>, StoreError> {
        Ok(self.tables.read().await.issues.get(&id).cloned())
    }

    async fn create_issue(&self, input: &NewIssue) -> Result<Issue, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&input.user_id) {
            return Err(StoreError::InvalidReference(format!(
                "Foreign key constraint failed: issues.user_id={}",
                input.user_id
            )));
        }
        tables.last_issue_id += 1;
        let issue = Issue {
            id: tables.last_issue_id,
            title: input.title.clone(),
            description: input.description.clone(),
            category: input.category,
            image: input.image.clone(),
            location: input.location.clone(),
            status: input.status,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        tables.issues.insert(issue.id, issue.clone());
        Ok(issue)
    }

    async fn update_issue(
        &self,
        id: DbId,
        input: &UpdateIssue,
    ) -> Result<Option<Issue>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(issue) = tables.issues.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &input.title {
            issue.title = title.clone();
        }
        if let Some(description) = &input.description {
            issue.description = description.clone();
        }
        if let Some(category) = input.category {
            issue.category = category;
        }
        if let Some(image) = &input.image {
            issue.image = Some(image.clone());
        }
        if let Some(location) = &input.location {
            issue.location = location.clone();
        }
        if let Some(status) = input.status {
            issue.status = status;
        }
        Ok(Some(issue.clone()))
    }

    async fn delete_issue(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.issues.remove(&id).is_some())
    }

    async fn issue_stats(&self) -> Result<IssueStats, StoreError> {
        let tables = self.tables.read().await;
        Ok(IssueStats::tally(tables.issues.values().map(|i| i.status)))
    }

    async fn create_session(&self, input: &NewSession) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&input.user_id) {
            return Err(StoreError::InvalidReference(format!(
                "Foreign key constraint failed: sessions.user_id={}",
                input.user_id
            )));
        }
        if tables.sessions.contains_key(&input.token_hash) {
            return Err(StoreError::Conflict(
                "Duplicate value violates unique constraint: uq_sessions_token_hash".into(),
            ));
        }
        tables
            .sessions
            .insert(input.token_hash.clone(), (input.user_id, input.expires_at));
        Ok(())
    }

    async fn find_session_user(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<DbId>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .get(token_hash)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(user_id, _)| *user_id))
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .write()
            .await
            .sessions
            .remove(token_hash)
            .is_some())
    }

    async fn purge_expired_sessions(&self, now: Timestamp) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, (_, expires_at)| *expires_at > now);
        Ok((before - tables.sessions.len()) as u64)
    }
}
