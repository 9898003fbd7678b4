//! Access-policy enforcement for handlers.
//!
//! Wraps [`civic_core::policy::authorize`] so a handler gets the
//! authenticated user back when the policy allows the operation.

use civic_core::error::CoreError;
use civic_core::policy::{self, Operation, Target};

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};

/// Consult the access policy for `operation` on `target`.
///
/// Returns the authenticated user on `Allow`. Denials become the matching
/// [`CoreError`] (401, 403 or 404).
///
/// Only for operations that need a session; public operations have no
/// user to hand back.
pub fn authorize<'a>(
    operation: Operation,
    session: Option<&'a AuthUser>,
    target: Target,
) -> AppResult<&'a AuthUser> {
    policy::authorize(operation, session.map(|s| &s.requester), target)?;
    session.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Authentication required".into()))
    })
}
