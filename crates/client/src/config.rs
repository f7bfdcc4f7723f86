//! Client configuration.
//!
//! Everything is read from the environment once at startup; the binary may
//! override individual fields from its flags.

use std::path::PathBuf;

use tashih_core::models::ReviewerIdentity;

use crate::session::{Session, SessionConfig};

/// Default base URL of the Tashih service.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
/// Default HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local development backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, without a trailing slash.
    pub api_url: String,
    /// Bearer credential supplied directly.
    pub token: Option<String>,
    /// File the credential is read from and removed on logout.
    pub token_file: Option<PathBuf>,
    /// HS256 secret; when set, credential signatures are verified.
    pub jwt_secret: Option<String>,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Actor field matched against TaqrirJamai review entries.
    pub reviewer_identity: ReviewerIdentity,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            token_file: None,
            jwt_secret: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            reviewer_identity: ReviewerIdentity::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                        |
    /// |-------------------------------|--------------------------------|
    /// | `TASHIH_API_URL`              | `http://localhost:8000/api/v1` |
    /// | `TASHIH_TOKEN`                | --                             |
    /// | `TASHIH_TOKEN_FILE`           | --                             |
    /// | `TASHIH_JWT_SECRET`           | -- (signature not verified)    |
    /// | `TASHIH_REQUEST_TIMEOUT_SECS` | `30`                           |
    /// | `TASHIH_REVIEWER_IDENTITY`    | `username`                     |
    ///
    /// # Panics
    ///
    /// Panics if `TASHIH_REQUEST_TIMEOUT_SECS` or `TASHIH_REVIEWER_IDENTITY`
    /// hold invalid values.
    pub fn from_env() -> Self {
        let api_url = api_url_or_default(non_empty_var("TASHIH_API_URL"));

        let token = non_empty_var("TASHIH_TOKEN");
        let token_file = non_empty_var("TASHIH_TOKEN_FILE").map(PathBuf::from);
        let jwt_secret = non_empty_var("TASHIH_JWT_SECRET");

        let request_timeout_secs: u64 = std::env::var("TASHIH_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .expect("TASHIH_REQUEST_TIMEOUT_SECS must be a valid u64");

        let reviewer_identity: ReviewerIdentity = std::env::var("TASHIH_REVIEWER_IDENTITY")
            .unwrap_or_else(|_| "username".into())
            .parse()
            .expect("TASHIH_REVIEWER_IDENTITY must be one of: username, email, id");

        Self {
            api_url,
            token,
            token_file,
            jwt_secret,
            request_timeout_secs,
            reviewer_identity,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            jwt_secret: self.jwt_secret.clone(),
            ..SessionConfig::default()
        }
    }

    /// Build the session: an explicit token wins over the token file.
    pub fn build_session(&self) -> Session {
        let session = match &self.token_file {
            Some(path) => Session::from_token_file(self.session_config(), path.clone()),
            None => Session::new(self.session_config()),
        };
        if let Some(token) = &self.token {
            session.set_token(token.clone());
        }
        session
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalised base URL, or the default when unset or blank.
fn api_url_or_default(value: Option<String>) -> String {
    value
        .map(|url| normalize_base_url(&url))
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Trim whitespace and trailing slashes from a base URL.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
