//! The signed-in user, persisted between runs.
//!
//! A [`Session`] is created once at startup from the session file and
//! passed to whatever needs to know who is signed in. It is cleared on
//! logout and whenever the backend answers 401.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lg_client::{AccountClient, ClientError};
use lg_protocol::{CardSlug, LoginResponse, User};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Features a session may use, gated by the card it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The concierge chat. Open to everyone.
    Chat,
    /// Opening preview links into detail panels.
    PreviewPanel,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// An empty session that will persist to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            token: None,
            user: None,
        }
    }

    /// Load the session stored at `path`. A missing or unreadable file
    /// yields a signed-out session.
    pub fn init(path: impl Into<PathBuf>) -> Self {
        let mut session = Self::new(path);
        match fs::read_to_string(&session.path) {
            Ok(contents) => match serde_json::from_str::<StoredSession>(&contents) {
                Ok(stored) => {
                    debug!(path = %session.path.display(), "loaded session");
                    session.token = Some(stored.token);
                    session.user = stored.user;
                }
                Err(e) => warn!(path = %session.path.display(), error = %e, "ignoring corrupt session file"),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %session.path.display(), error = %e, "cannot read session file"),
        }
        session
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Card held by the signed-in user.
    pub fn card(&self) -> Option<CardSlug> {
        self.user.as_ref().and_then(|u| u.current_card)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::Chat => true,
            Capability::PreviewPanel => self.card() == Some(CardSlug::Tribune),
        }
    }

    /// Store a successful login and persist it.
    pub fn sign_in(&mut self, response: LoginResponse) -> Result<(), SessionError> {
        info!(user = %response.user.username, "signed in");
        self.token = Some(response.access_token);
        self.user = Some(response.user);
        self.save()
    }

    /// Replace the cached profile, e.g. after a refresh or an application.
    pub fn set_user(&mut self, user: User) -> Result<(), SessionError> {
        self.user = Some(user);
        self.save()
    }

    /// Drop the token and profile, removing the session file.
    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "cannot remove session file"),
        }
    }

    /// Sign out when `error` says the token was rejected. Returns whether
    /// the session was cleared.
    pub fn handle_error(&mut self, error: &ClientError) -> bool {
        if error.is_unauthorized() && self.is_authenticated() {
            info!("token rejected, signing out");
            self.logout();
            return true;
        }
        false
    }

    /// Re-fetch the profile for the stored token.
    pub async fn refresh(&mut self, client: &AccountClient) -> Result<Option<&User>, ClientError> {
        let Some(token) = self.token.clone() else {
            return Ok(None);
        };
        match client.me(&token).await {
            Ok(user) => {
                if let Err(e) = self.set_user(user) {
                    warn!(error = %e, "cannot persist refreshed profile");
                }
                Ok(self.user.as_ref())
            }
            Err(e) => {
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    fn save(&self) -> Result<(), SessionError> {
        let Some(token) = self.token.clone() else {
            return Ok(());
        };
        let stored = StoredSession {
            token,
            user: self.user.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        let write = || -> io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, json)
        };
        write().map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(card: Option<&str>) -> User {
        serde_json::from_value(json!({
            "id": "u1",
            "username": "jdoe",
            "email": "j@example.com",
            "birthDate": "1985-03-10",
            "salary": 160000.0,
            "netWorth": 900000.0,
            "creditScore": 760,
            "address": {
                "street": "1 Via Appia",
                "city": "Rome",
                "state": "RM",
                "zipCode": "00100",
                "country": "IT"
            },
            "currentCard": card
        }))
        .unwrap()
    }

    fn login(card: Option<&str>) -> LoginResponse {
        LoginResponse {
            access_token: "tok-123".to_string(),
            token_type: "bearer".to_string(),
            user: user(card),
        }
    }

    #[test]
    fn missing_file_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::init(dir.path().join("session.json"));
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn sign_in_persists_across_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut session = Session::new(&path);
        session.sign_in(login(Some("tribune"))).unwrap();
        assert!(path.exists());

        let reloaded = Session::init(&path);
        assert_eq!(reloaded.token(), Some("tok-123"));
        assert_eq!(reloaded.card(), Some(CardSlug::Tribune));
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(!Session::init(&path).is_authenticated());
    }

    #[test]
    fn logout_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = Session::new(&path);
        session.sign_in(login(None)).unwrap();

        session.logout();
        assert!(!session.is_authenticated());
        assert!(!path.exists());
        session.logout();
    }

    #[test]
    fn unauthorized_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = Session::new(&path);
        session.sign_in(login(Some("legionnaire"))).unwrap();

        let other = ClientError::Api {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(!session.handle_error(&other));
        assert!(session.is_authenticated());

        assert!(session.handle_error(&ClientError::Unauthorized));
        assert!(!session.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn preview_panel_needs_tribune() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().join("s.json"));
        assert!(session.has_capability(Capability::Chat));
        assert!(!session.has_capability(Capability::PreviewPanel));

        session.sign_in(login(Some("legionnaire"))).unwrap();
        assert!(session.has_capability(Capability::Chat));
        assert!(!session.has_capability(Capability::PreviewPanel));

        session.set_user(user(Some("tribune"))).unwrap();
        assert!(session.has_capability(Capability::PreviewPanel));
    }
}
