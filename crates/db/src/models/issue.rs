//! Issue row model.

use civic_core::issue::Issue;
use civic_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::error::StoreError;

/// Raw row from the `issues` table. `category` and `status` are unchecked text.
#[derive(Debug, Clone, FromRow)]
pub struct IssueRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image: Option<String>,
    pub location: String,
    pub status: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

impl TryFrom<IssueRow> for Issue {
    type Error = StoreError;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        let corrupt = |e: String| StoreError::Corrupt(format!("issues.id={}: {e}", row.id));
        let category = row.category.parse().map_err(corrupt)?;
        let status = row.status.parse().map_err(corrupt)?;
        Ok(Issue {
            id: row.id,
            title: row.title,
            description: row.description,
            category,
            image: row.image,
            location: row.location,
            status,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}
