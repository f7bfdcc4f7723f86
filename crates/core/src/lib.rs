//! Domain core for the Tashih review client.
//!
//! Everything here is I/O free: entity models as the remote service returns
//! them, the role/capability policy, the workflow guard, the review state
//! machine, and the dashboard view slicing. The `tashih-client` crate drives
//! these against the HTTP gateway.

pub mod dashboard;
pub mod error;
pub mod guard;
pub mod models;
pub mod review;
pub mod roles;
pub mod routes;
pub mod types;
