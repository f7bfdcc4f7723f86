//! Bearer credential and the actor decoded from it.
//!
//! [`Session`] is passed explicitly to the gateway and the host; nothing
//! reads the credential from ambient state. Decoding failures never
//! surface as errors: a missing, malformed or expired token simply means
//! "no actor".

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tashih_core::models::Actor;
use tashih_core::routes::Route;
use tashih_core::types::Timestamp;

/// How credentials are decoded.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// HS256 secret. `None` decodes the payload without checking the
    /// signature, the way a browser-side decoder does.
    pub jwt_secret: Option<String>,
    /// Seconds of clock skew tolerated when checking `exp`.
    pub leeway_secs: u64,
}

/// Token payload: the actor fields plus the expiry.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(flatten)]
    actor: Actor,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decode a credential without judging its expiry.
fn decode_claims(
    token: &str,
    config: &SessionConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let key = match &config.jwt_secret {
        Some(secret) => DecodingKey::from_secret(secret.as_bytes()),
        None => {
            validation.insecure_disable_signature_validation();
            DecodingKey::from_secret(&[])
        }
    };

    Ok(decode::<TokenClaims>(token, &key, &validation)?.claims)
}

/// The current bearer credential.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    token: RwLock<Option<String>>,
    token_file: Option<PathBuf>,
}

impl Session {
    /// A session with no credential.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            token: RwLock::new(None),
            token_file: None,
        }
    }

    pub fn with_token(config: SessionConfig, token: impl Into<String>) -> Self {
        let session = Self::new(config);
        session.set_token(token);
        session
    }

    /// A session backed by a token file. A missing or unreadable file
    /// yields an empty session.
    pub fn from_token_file(config: SessionConfig, path: PathBuf) -> Self {
        let token = match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %err, "Failed to read token file");
                }
                None
            }
        };
        Self {
            config,
            token: RwLock::new(token),
            token_file: Some(path),
        }
    }

    pub fn token_file(&self) -> Option<&Path> {
        self.token_file.as_deref()
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the in-memory credential.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Replace the credential and write it to the token file, if any.
    pub fn store_token(&self, token: impl Into<String>) -> io::Result<()> {
        let token = token.into();
        if let Some(path) = &self.token_file {
            std::fs::write(path, &token)?;
        }
        self.set_token(token);
        Ok(())
    }

    /// `Authorization` header value; empty when there is no credential.
    pub fn authorization_header(&self) -> String {
        self.token()
            .map(|token| format!("Bearer {token}"))
            .unwrap_or_default()
    }

    /// Decode the credential into an actor. Does not check expiry.
    pub fn get_user(&self) -> Option<Actor> {
        let token = self.token()?;
        match decode_claims(&token, &self.config) {
            Ok(claims) => Some(claims.actor),
            Err(err) => {
                tracing::debug!(error = %err, "Credential could not be decoded");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(chrono::Utc::now())
    }

    /// True when a decodable credential has an `exp` later than `now`.
    pub fn is_authenticated_at(&self, now: Timestamp) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        let claims = match decode_claims(&token, &self.config) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(error = %err, "Credential could not be decoded");
                return false;
            }
        };
        match claims.exp {
            Some(exp) => {
                let leeway = i64::try_from(self.config.leeway_secs).unwrap_or(i64::MAX);
                let alive = exp.saturating_add(leeway) > now.timestamp();
                if !alive {
                    tracing::debug!(exp, "Credential expired");
                }
                alive
            }
            None => {
                tracing::debug!("Credential has no expiry claim");
                false
            }
        }
    }

    /// The actor the guard should see: `None` unless authenticated.
    pub fn current_actor(&self) -> Option<Actor> {
        if !self.is_authenticated() {
            return None;
        }
        self.get_user()
    }

    /// Drop the credential (and its file). The host must navigate to the
    /// returned route.
    pub fn logout(&self) -> Route {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(path) = &self.token_file {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Failed to remove token file");
                }
            }
        }
        tracing::info!("Logged out");
        Route::Login
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tashih_core::roles::Role;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn token_with(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    fn claims(exp: i64) -> serde_json::Value {
        serde_json::json!({
            "id": 9,
            "email": "yusuf@example.org",
            "name": "Yusuf",
            "role": "mushoheh",
            "username": "yusuf",
            "exp": exp,
        })
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn empty_session_is_anonymous() {
        let session = Session::new(SessionConfig::default());
        assert!(!session.is_authenticated());
        assert!(session.get_user().is_none());
        assert_eq!(session.authorization_header(), "");
    }

    #[test]
    fn decodes_actor_without_secret() {
        let session = Session::with_token(
            SessionConfig::default(),
            token_with(claims(future_exp()), "whatever"),
        );
        let actor = session.get_user().expect("actor should decode");
        assert_eq!(actor.id, "9");
        assert_eq!(actor.role, Role::Mushoheh);
        assert_eq!(actor.username.as_deref(), Some("yusuf"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn wrong_secret_degrades_to_anonymous() {
        let config = SessionConfig {
            jwt_secret: Some(SECRET.into()),
            leeway_secs: 0,
        };
        let session = Session::with_token(config, token_with(claims(future_exp()), "other"));
        assert!(session.get_user().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn matching_secret_verifies() {
        let config = SessionConfig {
            jwt_secret: Some(SECRET.into()),
            leeway_secs: 0,
        };
        let session = Session::with_token(config, token_with(claims(future_exp()), SECRET));
        assert!(session.current_actor().is_some());
    }

    #[test]
    fn malformed_token_is_not_an_error() {
        let session = Session::with_token(SessionConfig::default(), "not.a.jwt");
        assert!(session.get_user().is_none());
        assert!(!session.is_authenticated());
        assert_eq!(session.authorization_header(), "Bearer not.a.jwt");
    }

    #[test]
    fn expired_token_still_decodes_but_is_not_authenticated() {
        let exp = chrono::Utc::now().timestamp() - 300;
        let session = Session::with_token(SessionConfig::default(), token_with(claims(exp), SECRET));
        assert!(session.get_user().is_some());
        assert!(!session.is_authenticated());
        assert!(session.current_actor().is_none());
    }

    #[test]
    fn expiry_is_compared_against_given_time() {
        let session = Session::with_token(SessionConfig::default(), token_with(claims(1_000), SECRET));
        let before = chrono::DateTime::from_timestamp(999, 0).unwrap();
        let at = chrono::DateTime::from_timestamp(1_000, 0).unwrap();
        assert!(session.is_authenticated_at(before));
        assert!(!session.is_authenticated_at(at));
    }

    #[test]
    fn leeway_extends_expiry() {
        let config = SessionConfig {
            jwt_secret: None,
            leeway_secs: 60,
        };
        let session = Session::with_token(config, token_with(claims(1_000), SECRET));
        let now = chrono::DateTime::from_timestamp(1_030, 0).unwrap();
        assert!(session.is_authenticated_at(now));
    }

    #[test]
    fn missing_exp_is_not_authenticated() {
        let mut payload = claims(0);
        payload.as_object_mut().unwrap().remove("exp");
        let session = Session::with_token(SessionConfig::default(), token_with(payload, SECRET));
        assert!(session.get_user().is_some());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn logout_clears_token_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, format!("{}\n", token_with(claims(future_exp()), SECRET))).unwrap();

        let session = Session::from_token_file(SessionConfig::default(), path.clone());
        assert!(session.is_authenticated());

        assert_eq!(session.logout(), Route::Login);
        assert!(session.token().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn missing_token_file_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::from_token_file(SessionConfig::default(), dir.path().join("none"));
        assert!(session.token().is_none());
        // Logging out without a file on disk is fine.
        assert_eq!(session.logout(), Route::Login);
    }

    #[test]
    fn store_token_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let session = Session::from_token_file(SessionConfig::default(), path.clone());
        session.store_token("abc").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc");
        assert_eq!(session.token().as_deref(), Some("abc"));
    }
}
