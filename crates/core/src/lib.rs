//! Domain core for the civic issue tracker.
//!
//! Holds everything that both the server and the browser client must agree
//! on (entities, request payloads, the endpoint table) plus the pure access
//! control policy. Nothing in this crate performs I/O.

pub mod contract;
pub mod error;
pub mod issue;
pub mod policy;
pub mod roles;
pub mod types;
