//! Wire contract shared by the server and the browser client.
//!
//! Request payloads are validated with `validator` and every type here is
//! exported to TypeScript through `ts-rs`, so the client never restates a
//! field name by hand. [`Endpoint`] is the table of routes: method, path,
//! session requirement and success status for each operation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidationErrors};

use crate::error::{CoreError, FieldError};
use crate::issue::{IssueCategory, IssueStatus};
use crate::policy::Operation;
use crate::roles::Role;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Request body for `POST /api/register`.
///
/// Required strings default to empty when missing so that validation can
/// report them per field instead of failing deserialization as a whole.
#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export)]
pub struct InsertUser {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Client-facing user. Deliberately has no password field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    #[ts(type = "number")]
    pub id: DbId,
    pub username: String,
    pub role: Role,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// Request body for `POST /api/issues`.
#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export)]
pub struct InsertIssue {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(required(message = "Category is required"))]
    pub category: Option<IssueCategory>,
    pub image: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub status: Option<IssueStatus>,
}

/// Request body for `PUT /api/issues/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, TS)]
#[ts(export)]
pub struct UpdateIssue {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
    pub category: Option<IssueCategory>,
    pub image: Option<String>,
    #[validate(length(min = 1, message = "Location must not be empty"))]
    pub location: Option<String>,
    pub status: Option<IssueStatus>,
}

/// A validated issue ready to be persisted for a specific owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub image: Option<String>,
    pub location: String,
    pub status: IssueStatus,
    pub user_id: DbId,
}

impl InsertIssue {
    /// Validate the payload and bind it to its owner.
    ///
    /// A blank `image` is treated as no image and a missing `status`
    /// becomes [`IssueStatus::Pending`].
    pub fn into_new_issue(self, owner_id: DbId) -> Result<NewIssue, CoreError> {
        validate_payload(&self)?;
        let category = self.category.ok_or_else(|| {
            CoreError::InvalidFields(vec![FieldError::new("category", "Category is required")])
        })?;
        Ok(NewIssue {
            title: self.title,
            description: self.description,
            category,
            image: normalize_image(self.image),
            location: self.location,
            status: self.status.unwrap_or_default(),
            user_id: owner_id,
        })
    }
}

impl UpdateIssue {
    /// Validate the payload, normalizing a blank `image` to absent.
    pub fn into_validated(self) -> Result<UpdateIssue, CoreError> {
        validate_payload(&self)?;
        Ok(UpdateIssue {
            image: normalize_image(self.image),
            ..self
        })
    }

    /// True when the payload would not change any field.
    pub fn is_empty(&self) -> bool {
        *self == UpdateIssue::default()
    }
}

fn normalize_image(image: Option<String>) -> Option<String> {
    image.filter(|url| !url.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Run `validator` rules and convert failures into [`CoreError::InvalidFields`].
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), CoreError> {
    payload
        .validate()
        .map_err(|errors| CoreError::InvalidFields(field_errors(&errors)))
}

/// Flatten validator output into one entry per failed rule, sorted by field.
fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

// ---------------------------------------------------------------------------
// Endpoint table
// ---------------------------------------------------------------------------

/// Every HTTP operation the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Register,
    Login,
    Logout,
    CurrentUser,
    ListIssues,
    CreateIssue,
    GetIssue,
    UpdateIssue,
    DeleteIssue,
    Stats,
}

impl Endpoint {
    pub const ALL: &'static [Endpoint] = &[
        Endpoint::Register,
        Endpoint::Login,
        Endpoint::Logout,
        Endpoint::CurrentUser,
        Endpoint::ListIssues,
        Endpoint::CreateIssue,
        Endpoint::GetIssue,
        Endpoint::UpdateIssue,
        Endpoint::DeleteIssue,
        Endpoint::Stats,
    ];

    pub fn method(self) -> &'static str {
        match self {
            Endpoint::Register
            | Endpoint::Login
            | Endpoint::Logout
            | Endpoint::CreateIssue => "POST",
            Endpoint::CurrentUser
            | Endpoint::ListIssues
            | Endpoint::GetIssue
            | Endpoint::Stats => "GET",
            Endpoint::UpdateIssue => "PUT",
            Endpoint::DeleteIssue => "DELETE",
        }
    }

    /// Route path in router syntax (`{id}` placeholders).
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Register => "/api/register",
            Endpoint::Login => "/api/login",
            Endpoint::Logout => "/api/logout",
            Endpoint::CurrentUser => "/api/user",
            Endpoint::ListIssues | Endpoint::CreateIssue => "/api/issues",
            Endpoint::GetIssue | Endpoint::UpdateIssue | Endpoint::DeleteIssue => {
                "/api/issues/{id}"
            }
            Endpoint::Stats => "/api/stats",
        }
    }

    /// Concrete URL with the `{id}` placeholder filled in, if the path has one.
    pub fn url(self, id: DbId) -> String {
        self.path().replace("{id}", &id.to_string())
    }

    /// Whether a request without a session is turned away.
    pub fn requires_session(self) -> bool {
        !matches!(
            self,
            Endpoint::Register | Endpoint::Login | Endpoint::Logout
        )
    }

    /// HTTP status code of a successful response.
    pub fn success_status(self) -> u16 {
        match self {
            Endpoint::Register | Endpoint::CreateIssue => 201,
            Endpoint::DeleteIssue => 204,
            _ => 200,
        }
    }

    /// The policy operation guarding this endpoint.
    pub fn operation(self) -> Operation {
        match self {
            Endpoint::Register => Operation::Register,
            Endpoint::Login => Operation::Login,
            Endpoint::Logout => Operation::Logout,
            Endpoint::CurrentUser => Operation::ReadCurrentUser,
            Endpoint::ListIssues => Operation::ListIssues,
            Endpoint::CreateIssue => Operation::CreateIssue,
            Endpoint::GetIssue => Operation::ReadIssue,
            Endpoint::UpdateIssue => Operation::UpdateIssue,
            Endpoint::DeleteIssue => Operation::DeleteIssue,
            Endpoint::Stats => Operation::ReadStats,
        }
    }
}
