//! Admin session: the bearer token used for backend calls

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::TierBackend;
use crate::error::{AdminError, Result};
use crate::models::LoginRequest;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    access_token: String,
    logged_in_at: DateTime<Utc>,
}

/// Bearer token holder. A session built with `load` persists its token to
/// disk; one built from a request header lives only for that request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    path: Option<PathBuf>,
}

impl Session {
    /// Load the session stored at `path`. A missing or unreadable file
    /// yields a logged-out session bound to that path.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<StoredSession>(&json) {
                Ok(stored) => Some(stored.access_token),
                Err(e) => {
                    warn!("Ignoring corrupt session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            token,
            path: Some(path),
        }
    }

    /// Request-scoped session from an `Authorization: Bearer` value
    pub fn from_bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            path: None,
        }
    }

    /// Exchange credentials for a token and keep it
    pub async fn login(&mut self, backend: &dyn TierBackend, credentials: &LoginRequest) -> Result<()> {
        let response = backend.login(credentials).await?;
        self.set_token(response.access_token)?;
        info!("Logged in as {}", credentials.id);
        Ok(())
    }

    pub fn set_token(&mut self, token: String) -> Result<()> {
        if let Some(path) = &self.path {
            write_stored(path, &token)?;
        }
        self.token = Some(token);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.token = None;
        if let Some(path) = &self.path {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    pub fn current_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AdminError::AuthenticationRequired)
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_token().is_ok()
    }
}

fn write_stored(path: &Path, token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let stored = StoredSession {
        access_token: token.to_string(),
        logged_in_at: Utc::now(),
    };
    std::fs::write(path, serde_json::to_string_pretty(&stored)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_persisted_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::load(&path);
        assert!(matches!(
            session.current_token(),
            Err(AdminError::AuthenticationRequired)
        ));

        session.set_token("abc".into()).unwrap();
        assert_eq!(Session::load(&path).current_token().unwrap(), "abc");

        session.logout().unwrap();
        assert!(!path.exists());
        assert!(!Session::load(&path).is_logged_in());
    }

    #[test]
    fn test_corrupt_file_is_logged_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(!Session::load(&path).is_logged_in());
    }

    #[test]
    fn test_bearer_session() {
        assert_eq!(Session::from_bearer("t").current_token().unwrap(), "t");
        assert!(!Session::from_bearer("").is_logged_in());
        let mut s = Session::from_bearer("t");
        s.logout().unwrap();
        assert!(!s.is_logged_in());
    }
}
