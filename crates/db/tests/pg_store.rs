//! Integration tests for `PgStore` against a real database.
//!
//! Ignored by default; run with `DATABASE_URL` set and `--ignored`.

use assert_matches::assert_matches;
use civic_core::contract::{InsertIssue, UpdateIssue};
use civic_core::issue::{IssueCategory, IssueStatus};
use civic_core::roles::Role;
use civic_db::models::user::{NewUser, UserRecord};
use civic_db::{PgStore, Store, StoreError};
use sqlx::PgPool;

async fn create_user(store: &PgStore, username: &str, role: Role) -> UserRecord {
    store
        .create_user(&NewUser {
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role,
            name: username.to_uppercase(),
        })
        .await
        .expect("user creation should succeed")
}

fn pothole() -> InsertIssue {
    InsertIssue {
        title: "Pothole".into(),
        description: "Big one".into(),
        category: Some(IssueCategory::Road),
        image: None,
        location: "5th Ave".into(),
        status: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_username_is_conflict(pool: PgPool) {
    let store = PgStore::new(pool);
    create_user(&store, "admin", Role::Admin).await;

    let result = store
        .create_user(&NewUser {
            username: "admin".into(),
            password_hash: "x".into(),
            role: Role::User,
            name: "Again".into(),
        })
        .await;
    assert_matches!(result, Err(StoreError::Conflict(msg)) if msg.contains("uq_users_username"));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn listing_is_filtered_in_the_query(pool: PgPool) {
    let store = PgStore::new(pool);
    let admin = create_user(&store, "admin", Role::Admin).await;
    let alice = create_user(&store, "alice", Role::User).await;
    let bob = create_user(&store, "bob", Role::User).await;

    let mine = store
        .create_issue(&pothole().into_new_issue(alice.id).unwrap())
        .await
        .unwrap();
    store
        .create_issue(&pothole().into_new_issue(bob.id).unwrap())
        .await
        .unwrap();

    let alices = store.list_issues(&alice.requester()).await.unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].id, mine.id);
    assert_eq!(alices[0].status, IssueStatus::Pending);

    assert_eq!(store.list_issues(&admin.requester()).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn update_coalesces_and_stats_add_up(pool: PgPool) {
    let store = PgStore::new(pool);
    let alice = create_user(&store, "alice", Role::User).await;
    let issue = store
        .create_issue(&pothole().into_new_issue(alice.id).unwrap())
        .await
        .unwrap();

    let updated = store
        .update_issue(
            issue.id,
            &UpdateIssue {
                status: Some(IssueStatus::Resolved),
                ..UpdateIssue::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, IssueStatus::Resolved);
    assert_eq!(updated.title, issue.title);

    let stats = store.issue_stats().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.resolved, 1);
    assert!(stats.is_consistent());

    assert!(store.delete_issue(issue.id).await.unwrap());
    assert!(!store.delete_issue(issue.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn issue_for_unknown_owner_is_invalid_reference(pool: PgPool) {
    let store = PgStore::new(pool);
    let result = store
        .create_issue(&pothole().into_new_issue(12345).unwrap())
        .await;
    assert_matches!(result, Err(StoreError::InvalidReference(_)));
}
