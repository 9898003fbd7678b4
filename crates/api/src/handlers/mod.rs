pub mod auth;
pub mod issue;
pub mod stats;
