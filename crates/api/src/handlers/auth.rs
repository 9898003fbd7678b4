//! Handlers for registration, login, logout and the current user.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use chrono::Utc;
use civic_core::contract::{validate_payload, InsertUser, LoginRequest, User};
use civic_core::error::{CoreError, FieldError};
use civic_core::policy::{self, Operation, Target};
use civic_core::types::DbId;
use civic_db::models::session::NewSession;
use civic_db::models::user::NewUser;
use civic_db::StoreError;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{clear_session_cookie, generate_session_token, session_cookie};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// POST /api/register
///
/// Create an account and sign it in. Responds 201 with the new user and a
/// session cookie. A taken username is a 400 on the `username` field, or a
/// 409 if a concurrent registration claims it between check and insert.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<InsertUser>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    policy::authorize(Operation::Register, None, Target::Collection)?;

    let Json(input) = payload?;
    validate_payload(&input)?;

    if state
        .store
        .get_user_by_username(&input.username)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::InvalidFields(vec![
            FieldError::new("username", "Username already exists"),
        ])));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .store
        .create_user(&NewUser {
            username: input.username,
            password_hash,
            role: input.role,
            name: input.name,
        })
        .await
        .map_err(|e| match e {
            // Another registration took the name after the pre-check.
            StoreError::Conflict(_) => {
                AppError::Core(CoreError::Conflict("Username already exists".into()))
            }
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User registered");

    let cookie = start_session(&state, user.id).await?;
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(user.to_public()),
    ))
}

/// POST /api/login
///
/// Check username and password and open a session. Unknown usernames and
/// wrong passwords get the same 401.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    policy::authorize(Operation::Login, None, Target::Collection)?;

    let Json(input) = payload?;
    validate_payload(&input)?;

    let user = state
        .store
        .get_user_by_username(&input.username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(username = %input.username, "Login rejected: wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    tracing::info!(user_id = user.id, "User logged in");

    let cookie = start_session(&state, user.id).await?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(user.to_public())))
}

/// POST /api/logout
///
/// Revoke the current session if there is one and clear the cookie.
/// Always 200, so a stale cookie can still be cleared.
pub async fn logout(
    State(state): State<AppState>,
    session: Option<AuthUser>,
) -> AppResult<impl IntoResponse> {
    policy::authorize(
        Operation::Logout,
        session.as_ref().map(|s| &s.requester),
        Target::Collection,
    )?;

    if let Some(session) = &session {
        state.store.delete_session(&session.token_hash).await?;
        tracing::info!(user_id = session.user_id(), "User logged out");
    }

    Ok((
        StatusCode::OK,
        AppendHeaders([(SET_COOKIE, clear_session_cookie(&state.config.session))]),
    ))
}

/// GET /api/user
pub async fn current_user(session: Option<AuthUser>) -> AppResult<Json<User>> {
    let user = rbac::authorize(Operation::ReadCurrentUser, session.as_ref(), Target::Collection)?;
    Ok(Json(user.to_public()))
}

/// Persist a fresh session for `user_id` and return its `Set-Cookie` value.
async fn start_session(state: &AppState, user_id: DbId) -> AppResult<String> {
    let config = &state.config.session;
    let (token, token_hash) = generate_session_token();
    let expires_at = Utc::now() + chrono::Duration::hours(config.ttl_hours);

    state
        .store
        .create_session(&NewSession {
            user_id,
            token_hash,
            expires_at,
        })
        .await?;

    Ok(session_cookie(&token, config))
}
