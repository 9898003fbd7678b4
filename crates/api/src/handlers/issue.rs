//! Handlers for the `/issues` resource.
//!
//! Every handler resolves the caller, consults the access policy and only
//! then parses the body, so an anonymous caller with a malformed body sees
//! 401 and not 400. The same holds for a malformed `{id}` in the path.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use civic_core::contract::{InsertIssue, UpdateIssue};
use civic_core::error::CoreError;
use civic_core::issue::Issue;
use civic_core::policy::{self, Operation, Target, ISSUE_ENTITY};
use civic_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac;
use crate::state::AppState;

/// GET /api/issues
///
/// Admins see every issue, citizens only their own. Newest first.
pub async fn list_issues(
    State(state): State<AppState>,
    session: Option<AuthUser>,
) -> AppResult<Json<Vec<Issue>>> {
    let user = rbac::authorize(Operation::ListIssues, session.as_ref(), Target::Collection)?;
    let issues = state.store.list_issues(&user.requester).await?;
    Ok(Json(issues))
}

/// POST /api/issues
///
/// The owner is always the caller; any `userId` in the body is ignored.
pub async fn create_issue(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    payload: Result<Json<InsertIssue>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Issue>)> {
    let user = rbac::authorize(Operation::CreateIssue, session.as_ref(), Target::Collection)?;

    let Json(input) = payload?;
    let new_issue = input.into_new_issue(user.user_id())?;

    let issue = state.store.create_issue(&new_issue).await?;

    tracing::info!(
        issue_id = issue.id,
        user_id = user.user_id(),
        category = %issue.category,
        "Issue reported"
    );

    Ok((StatusCode::CREATED, Json(issue)))
}

/// GET /api/issues/{id}
pub async fn get_issue(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<Issue>> {
    let id = issue_id(Operation::ReadIssue, session.as_ref(), path)?;
    let found = state.store.get_issue(id).await?;
    rbac::authorize(
        Operation::ReadIssue,
        session.as_ref(),
        Target::issue(id, found.as_ref()),
    )?;
    found.map(Json).ok_or_else(|| not_found(id))
}

/// PUT /api/issues/{id}
///
/// Admin only. Absent fields keep their stored values and any status
/// transition is accepted.
pub async fn update_issue(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateIssue>, JsonRejection>,
) -> AppResult<Json<Issue>> {
    let id = issue_id(Operation::UpdateIssue, session.as_ref(), path)?;
    let found = state.store.get_issue(id).await?;
    let user = rbac::authorize(
        Operation::UpdateIssue,
        session.as_ref(),
        Target::issue(id, found.as_ref()),
    )?;

    let Json(input) = payload?;
    let input = input.into_validated()?;

    if input.is_empty() {
        return found.map(Json).ok_or_else(|| not_found(id));
    }

    // Deleted between the lookup and the write.
    let issue = state
        .store
        .update_issue(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        issue_id = id,
        admin_id = user.user_id(),
        status = %issue.status,
        "Issue updated"
    );

    Ok(Json(issue))
}

/// DELETE /api/issues/{id}
///
/// Admin only. Responds 204 with no body.
pub async fn delete_issue(
    State(state): State<AppState>,
    session: Option<AuthUser>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = issue_id(Operation::DeleteIssue, session.as_ref(), path)?;
    let found = state.store.get_issue(id).await?;
    let user = rbac::authorize(
        Operation::DeleteIssue,
        session.as_ref(),
        Target::issue(id, found.as_ref()),
    )?;

    let deleted = state.store.delete_issue(id).await?;
    tracing::info!(issue_id = id, admin_id = user.user_id(), deleted, "Issue deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// The issue id from the path. A malformed id is a 400, but only once the
/// caller is known to be authenticated.
fn issue_id(
    operation: Operation,
    session: Option<&AuthUser>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<DbId> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            if session.is_none() {
                policy::authorize(operation, None, Target::Collection)?;
            }
            Err(rejection.into())
        }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: ISSUE_ENTITY,
        id,
    })
}
