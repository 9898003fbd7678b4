//! Request identity and authorization helpers.
//!
//! - [`auth::AuthUser`] -- The user behind the session cookie or bearer token.
//! - [`rbac::authorize`] -- Runs the access policy and yields the authenticated user.

pub mod auth;
pub mod rbac;
