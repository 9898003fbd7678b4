//! Route definitions for the `/issues` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::issue;
use crate::state::AppState;

/// Routes mounted at `/issues`.
///
/// ```text
/// GET    /        -> list_issues
/// POST   /        -> create_issue
/// GET    /{id}    -> get_issue
/// PUT    /{id}    -> update_issue (admin)
/// DELETE /{id}    -> delete_issue (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(issue::list_issues).post(issue::create_issue))
        .route(
            "/{id}",
            get(issue::get_issue)
                .put(issue::update_issue)
                .delete(issue::delete_issue),
        )
}
