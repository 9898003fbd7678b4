//! Repository layer: one zero-sized struct per table, each method takes a pool.

pub mod issue_repo;
pub mod session_repo;
pub mod user_repo;

pub use issue_repo::IssueRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
