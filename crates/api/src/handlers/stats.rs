//! Handler for issue statistics.

use axum::extract::State;
use axum::Json;
use civic_core::issue::IssueStats;
use civic_core::policy::{Operation, Target};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac;
use crate::state::AppState;

/// GET /api/stats
///
/// Admin only; other callers get 401. Counts are computed on every request.
pub async fn get_stats(
    State(state): State<AppState>,
    session: Option<AuthUser>,
) -> AppResult<Json<IssueStats>> {
    rbac::authorize(Operation::ReadStats, session.as_ref(), Target::Collection)?;
    let stats = state.store.issue_stats().await?;
    Ok(Json(stats))
}
