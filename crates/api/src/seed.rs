//! First-run demo data.

use civic_core::contract::NewIssue;
use civic_core::issue::{IssueCategory, IssueStatus};
use civic_core::roles::Role;
use civic_core::types::DbId;
use civic_db::models::user::NewUser;
use civic_db::Store;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Username whose presence marks the store as already seeded.
pub const SEED_ADMIN_USERNAME: &str = "admin";

/// Create the demo admin, a demo citizen and two sample issues, unless a
/// user named `admin` already exists.
///
/// Returns whether anything was created. Safe to call on every start.
pub async fn ensure_seed_data(store: &dyn Store) -> AppResult<bool> {
    if store
        .get_user_by_username(SEED_ADMIN_USERNAME)
        .await?
        .is_some()
    {
        tracing::debug!("Seed data already present");
        return Ok(false);
    }

    create_user(store, SEED_ADMIN_USERNAME, "admin123", Role::Admin, "System Admin").await?;
    let citizen = create_user(store, "user", "user123", Role::User, "John Doe").await?;

    let samples = [
        (
            "Pothole on Main St",
            "Large pothole causing traffic issues",
            IssueCategory::Road,
            "Downtown",
            IssueStatus::Pending,
        ),
        (
            "Leaking Pipe",
            "Water leaking from main pipe",
            IssueCategory::Water,
            "Suburbia",
            IssueStatus::Resolved,
        ),
    ];

    for (title, description, category, location, status) in samples {
        store
            .create_issue(&NewIssue {
                title: title.into(),
                description: description.into(),
                category,
                image: None,
                location: location.into(),
                status,
                user_id: citizen,
            })
            .await?;
    }

    tracing::info!("Seeded demo users and issues");
    Ok(true)
}

async fn create_user(
    store: &dyn Store,
    username: &str,
    password: &str,
    role: Role,
    name: &str,
) -> AppResult<DbId> {
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let user = store
        .create_user(&NewUser {
            username: username.into(),
            password_hash,
            role,
            name: name.into(),
        })
        .await?;
    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use civic_core::policy::Requester;
    use civic_db::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn seeding_runs_once() {
        let store = MemoryStore::new();

        assert!(ensure_seed_data(&store).await.unwrap());
        assert!(!ensure_seed_data(&store).await.unwrap());

        let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.name, "System Admin");

        let stats = store.issue_stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.resolved, 1);
    }

    #[tokio::test]
    async fn sample_issues_belong_to_demo_citizen() {
        let store = MemoryStore::new();
        ensure_seed_data(&store).await.unwrap();

        let citizen = store.get_user_by_username("user").await.unwrap().unwrap();
        let issues = store.list_issues(&citizen.requester()).await.unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.user_id == citizen.id));

        let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
        let admin_view: Vec<_> = store
            .list_issues(&Requester {
                id: admin.id,
                role: Role::Admin,
            })
            .await
            .unwrap();
        assert_eq!(admin_view.len(), 2);
    }
}
