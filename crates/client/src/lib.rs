//! Tashih review client.
//!
//! Exposes the building blocks a host needs to drive the tashih workflow
//! against the remote service:
//!
//! - [`config`] -- environment-driven client configuration.
//! - [`session`] -- the bearer credential and the actor decoded from it.
//! - [`gateway`] -- typed HTTP client implementing [`api::TashihApi`].
//! - [`dashboard`] / [`review`] -- page controllers over the core state
//!   machines.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod review;
pub mod session;

pub use api::{SharedApi, TashihApi};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use gateway::TashihGateway;
pub use session::{Session, SessionConfig};
