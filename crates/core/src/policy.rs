//! Access control policy.
//!
//! [`decide`] is a pure function from (operation, requester, target) to a
//! [`Decision`]. Handlers call it before touching storage. Rules apply in
//! this order and the first match wins:
//!
//! 1. No identity: deny as unauthenticated, except register, login, logout.
//! 2. Listing and creating issues: any authenticated identity.
//! 3. Reading one issue: admin, or the issue's owner.
//! 4. Updating or deleting an issue: admin only. Owning the issue is not enough.
//! 5. Reading stats: admin only, denied as unauthorized (401) rather than forbidden.
//!
//! For single-issue operations a missing target is reported as not found
//! before the role is checked, so a citizen probing an unknown id sees 404
//! and not 403.

use crate::error::CoreError;
use crate::issue::Issue;
use crate::roles::Role;
use crate::types::DbId;

/// Entity name used in not-found errors.
pub const ISSUE_ENTITY: &str = "Issue";

/// Everything a request may ask to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    Login,
    Logout,
    ReadCurrentUser,
    ListIssues,
    CreateIssue,
    ReadIssue,
    UpdateIssue,
    DeleteIssue,
    ReadStats,
}

impl Operation {
    fn is_public(self) -> bool {
        matches!(
            self,
            Operation::Register | Operation::Login | Operation::Logout
        )
    }

    fn targets_single_issue(self) -> bool {
        matches!(
            self,
            Operation::ReadIssue | Operation::UpdateIssue | Operation::DeleteIssue
        )
    }
}

/// The authenticated identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: DbId,
    pub role: Role,
}

impl Requester {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// The resource an operation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// No specific resource (listing, creating, stats, auth).
    Collection,
    /// A specific issue id that does not exist.
    Missing(DbId),
    /// An existing issue and its owner.
    Issue { id: DbId, owner_id: DbId },
}

impl Target {
    /// Build a target from an issue lookup.
    pub fn issue(id: DbId, found: Option<&Issue>) -> Self {
        match found {
            Some(issue) => Target::Issue {
                id: issue.id,
                owner_id: issue.user_id,
            },
            None => Target::Missing(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No valid session.
    Unauthenticated,
    /// Valid session, insufficient privilege.
    Forbidden,
    /// The targeted resource does not exist.
    NotFound(DbId),
    /// Valid session but the operation is admin-only and answered with 401.
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Decide whether `requester` may perform `operation` on `target`.
pub fn decide(operation: Operation, requester: Option<&Requester>, target: Target) -> Decision {
    if operation.is_public() {
        return Decision::Allow;
    }

    let Some(requester) = requester else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    if operation.targets_single_issue() {
        let owner_id = match target {
            Target::Missing(id) => return Decision::Deny(DenyReason::NotFound(id)),
            Target::Issue { owner_id, .. } => owner_id,
            // A single-issue operation without an issue is a caller bug; fail closed.
            Target::Collection => return Decision::Deny(DenyReason::Forbidden),
        };

        let allowed = match operation {
            Operation::ReadIssue => requester.is_admin() || requester.id == owner_id,
            _ => requester.is_admin(),
        };
        return if allowed {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::Forbidden)
        };
    }

    match operation {
        Operation::ReadStats if !requester.is_admin() => {
            Decision::Deny(DenyReason::Unauthorized)
        }
        _ => Decision::Allow,
    }
}

/// [`decide`], converted into a `Result` carrying a client-facing message.
pub fn authorize(
    operation: Operation,
    requester: Option<&Requester>,
    target: Target,
) -> Result<(), CoreError> {
    match decide(operation, requester, target) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(deny_error(operation, reason)),
    }
}

fn deny_error(operation: Operation, reason: DenyReason) -> CoreError {
    match reason {
        DenyReason::Unauthenticated => CoreError::Unauthorized("Authentication required".into()),
        DenyReason::Unauthorized => CoreError::Unauthorized("Admin access required".into()),
        DenyReason::NotFound(id) => CoreError::NotFound {
            entity: ISSUE_ENTITY,
            id,
        },
        DenyReason::Forbidden => CoreError::Forbidden(
            match operation {
                Operation::UpdateIssue => "Only admins can update issues",
                Operation::DeleteIssue => "Only admins can delete issues",
                _ => "You do not have access to this issue",
            }
            .into(),
        ),
    }
}
