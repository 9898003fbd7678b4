pub mod issue;
pub mod session;
pub mod user;
