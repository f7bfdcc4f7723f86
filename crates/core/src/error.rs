//! Domain error type shared by the core state machines and the client crate.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Rejected form input; the message is shown inline as is.
    #[error("{0}")]
    Validation(String),

    /// An operation that the current page state does not allow.
    #[error("Conflict: {0}")]
    Conflict(String),
}
