//! Session-based authentication extractor for Axum handlers.

use axum::extract::OptionalFromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use civic_core::contract::User;
use civic_core::policy::Requester;
use civic_core::types::DbId;

use crate::auth::session::{hash_session_token, token_from_headers};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the session token.
///
/// Extract it as `Option<AuthUser>`: a request without a valid session is
/// not rejected here but passed on as `None`, so the access policy decides
/// what an anonymous caller may do.
///
/// ```ignore
/// async fn my_handler(session: Option<AuthUser>) -> AppResult<Json<()>> {
///     let user = rbac::authorize(Operation::ListIssues, session.as_ref(), Target::Collection)?;
///     tracing::info!(user_id = user.user_id(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity and role as seen by the access policy.
    pub requester: Requester,
    pub username: String,
    pub name: String,
    /// Digest of the token that authenticated this request.
    pub token_hash: String,
}

impl AuthUser {
    pub fn user_id(&self) -> DbId {
        self.requester.id
    }

    /// The client-facing view of this user.
    pub fn to_public(&self) -> User {
        User {
            id: self.requester.id,
            username: self.username.clone(),
            role: self.requester.role,
            name: self.name.clone(),
        }
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = token_from_headers(&parts.headers) else {
            return Ok(None);
        };
        let token_hash = hash_session_token(&token);

        let Some(user_id) = state
            .store
            .find_session_user(&token_hash, Utc::now())
            .await?
        else {
            tracing::debug!("Session token unknown or expired");
            return Ok(None);
        };

        let Some(user) = state.store.get_user(user_id).await? else {
            tracing::warn!(user_id, "Session refers to a missing user");
            return Ok(None);
        };

        Ok(Some(AuthUser {
            requester: user.requester(),
            username: user.username,
            name: user.name,
            token_hash,
        }))
    }
}
