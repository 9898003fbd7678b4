use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes merged at `/api`.
///
/// ```text
/// GET /stats -> get_stats (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats::get_stats))
}
