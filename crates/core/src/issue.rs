//! Issue entity, its enumerated fields, and the status tally.
//!
//! `category` and `status` are stored as free text. Here they are sum types,
//! so any value read back from storage goes through [`FromStr`] again and an
//! unexpected string is caught instead of being passed on to clients.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{DbId, Timestamp};

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
        #[ts(export)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The text stored in the database and sent over the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        $label,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

define_text_enum! {
    /// Triage state of a report. Any state may move to any other.
    IssueStatus ("status") {
        Pending = "pending",
        InProgress = "in_progress",
        Resolved = "resolved",
    }
}

define_text_enum! {
    /// Infrastructure area a report belongs to.
    IssueCategory ("category") {
        Road = "Road",
        Water = "Water",
        Electricity = "Electricity",
        Garbage = "Garbage",
    }
}

impl Default for IssueStatus {
    fn default() -> Self {
        IssueStatus::Pending
    }
}

/// A citizen report as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Issue {
    #[ts(type = "number")]
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub image: Option<String>,
    pub location: String,
    pub status: IssueStatus,
    /// Owner. Never changes after creation.
    #[ts(type = "number")]
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// Aggregate counts across every stored issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IssueStats {
    #[ts(type = "number")]
    pub total: i64,
    #[ts(type = "number")]
    pub pending: i64,
    #[ts(type = "number")]
    pub in_progress: i64,
    #[ts(type = "number")]
    pub resolved: i64,
}

impl IssueStats {
    /// Count a sequence of statuses.
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = IssueStatus>,
    {
        statuses
            .into_iter()
            .fold(IssueStats::default(), |mut stats, status| {
                stats.total += 1;
                match status {
                    IssueStatus::Pending => stats.pending += 1,
                    IssueStatus::InProgress => stats.in_progress += 1,
                    IssueStatus::Resolved => stats.resolved += 1,
                }
                stats
            })
    }

    /// The per-status counts add up to the total.
    pub fn is_consistent(&self) -> bool {
        self.pending + self.in_progress + self.resolved == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_matches_storage_values() {
        assert_eq!(IssueStatus::Pending.as_str(), "pending");
        assert_eq!(IssueStatus::InProgress.as_str(), "in_progress");
        assert_eq!(IssueStatus::Resolved.as_str(), "resolved");
        assert_eq!(IssueStatus::default(), IssueStatus::Pending);
    }

    #[test]
    fn status_parse_is_exact() {
        assert_eq!(
            "in_progress".parse::<IssueStatus>().unwrap(),
            IssueStatus::InProgress
        );
        let err = "done".parse::<IssueStatus>().unwrap_err();
        assert!(err.contains("Invalid status 'done'"));
        assert!(err.contains("pending, in_progress, resolved"));
    }

    #[test]
    fn category_is_case_sensitive() {
        assert_eq!("Road".parse::<IssueCategory>().unwrap(), IssueCategory::Road);
        assert!("road".parse::<IssueCategory>().is_err());
        assert_eq!(IssueCategory::ALL.len(), 4);
    }

    #[test]
    fn issue_serializes_camel_case() {
        let issue = Issue {
            id: 7,
            title: "Pothole".into(),
            description: "Big one".into(),
            category: IssueCategory::Road,
            image: None,
            location: "5th Ave".into(),
            status: IssueStatus::InProgress,
            user_id: 3,
            created_at: chrono::DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["category"], "Road");
        assert!(json["image"].is_null());
        assert!(json["createdAt"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
    }

    #[test]
    fn tally_counts_each_status() {
        let stats = IssueStats::tally([
            IssueStatus::Pending,
            IssueStatus::Resolved,
            IssueStatus::Pending,
            IssueStatus::InProgress,
        ]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.resolved, 1);
        assert!(stats.is_consistent());
    }

    #[test]
    fn tally_of_nothing_is_zero() {
        let stats = IssueStats::tally(std::iter::empty());
        assert_eq!(stats, IssueStats::default());
        assert!(stats.is_consistent());
    }
}
