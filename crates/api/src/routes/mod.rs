pub mod auth;
pub mod health;
pub mod issue;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register                  create account (public)
/// /login                     login (public)
/// /logout                    logout (public)
/// /user                      current user
///
/// /issues                    list, create
/// /issues/{id}               get, update, delete (update/delete admin only)
///
/// /stats                     status counts (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/issues", issue::router())
        .merge(stats::router())
}
