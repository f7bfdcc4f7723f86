//! Error type returned by every gateway call.

/// Failure of a call to the Tashih service.
///
/// `Http` displays only the server-supplied message (or `HTTP <status>`),
/// so it can be shown to the user as is.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// `detail` / `error` from the body, else `HTTP <status>`.
        message: String,
    },

    /// A 2xx body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The client could not be constructed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for gateway results.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
