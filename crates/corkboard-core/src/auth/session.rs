use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fixed identifier of the durable session slot.
pub const SESSION_SLOT: &str = "auth-storage";

/// Version tag written alongside the persisted state.
const SLOT_VERSION: u32 = 0;

/// Who the signed-in user is, as shown to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: Option<String>,
    pub display_name: Option<String>,
}

/// Credentials and identity of the current user.
///
/// Only `access_token` decides whether the user is authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub identity: Identity,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> Option<&str> {
        self.identity
            .display_name
            .as_deref()
            .or(self.identity.username.as_deref())
    }
}

/// On-disk shape of the session slot.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSlot {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    username: Option<String>,
    name: Option<String>,
}

impl From<PersistedState> for Session {
    fn from(state: PersistedState) -> Self {
        Self {
            access_token: state.access_token,
            refresh_token: state.refresh_token,
            identity: Identity {
                username: state.username,
                display_name: state.name,
            },
        }
    }
}

impl From<&Session> for PersistedState {
    fn from(session: &Session) -> Self {
        Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            username: session.identity.username.clone(),
            name: session.identity.display_name.clone(),
        }
    }
}

/// Persisted, shareable session state.
///
/// Cloning yields another handle to the same session. Each mutator replaces
/// the whole session and writes it through to the slot while holding the lock,
/// so the file always matches the last completed mutation.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Session>>,
    slot: Option<PathBuf>,
}

impl SessionStore {
    /// Open the store backed by `<dir>/auth-storage.json`, rehydrating any
    /// session found there. A missing or unreadable slot starts empty.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let slot = dir.as_ref().join(format!("{}.json", SESSION_SLOT));
        let session = match Self::load_slot(&slot) {
            Ok(Some(session)) => {
                debug!(path = %slot.display(), authenticated = session.is_authenticated(), "Session rehydrated");
                session
            }
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(path = %slot.display(), error = %e, "Discarding unreadable session slot");
                Session::default()
            }
        };

        Self {
            state: Arc::new(RwLock::new(session)),
            slot: Some(slot),
        }
    }

    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(RwLock::new(Session::default())),
            slot: None,
        }
    }

    /// Snapshot of the current session
    pub fn read(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    /// Replace the whole session with a freshly authenticated one.
    pub fn set_auth(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        username: Option<String>,
        display_name: Option<String>,
    ) {
        self.replace(Session {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            identity: Identity {
                username,
                display_name,
            },
        });
        debug!("Session credentials stored");
    }

    /// Clear every field of the session.
    pub fn logout(&self) {
        self.replace(Session::default());
        debug!("Session cleared");
    }

    fn replace(&self, session: Session) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.persist(&session) {
            warn!(error = %e, "Failed to save session");
        }
        *guard = session;
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let Some(ref path) = self.slot else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let slot = PersistedSlot {
            state: session.into(),
            version: SLOT_VERSION,
        };
        let contents = serde_json::to_string_pretty(&slot)?;
        std::fs::write(path, contents).context("Failed to write session slot")?;
        Ok(())
    }

    fn load_slot(path: &Path) -> Result<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).context("Failed to read session slot")?;
        let slot: PersistedSlot =
            serde_json::from_str(&contents).context("Failed to parse session slot")?;
        Ok(Some(slot.state.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot_path(dir: &Path) -> PathBuf {
        dir.join("auth-storage.json")
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = SessionStore::in_memory();
        assert_eq!(store.read(), Session::default());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_set_auth_last_write_wins() {
        let store = SessionStore::in_memory();
        store.set_auth("A1", "R1", Some("a@b.co".into()), Some("Alice".into()));
        store.set_auth("A2", "R2", Some("c@d.co".into()), None);

        let session = store.read();
        assert_eq!(session.access_token.as_deref(), Some("A2"));
        assert_eq!(session.refresh_token.as_deref(), Some("R2"));
        assert_eq!(session.identity.username.as_deref(), Some("c@d.co"));
        assert_eq!(session.identity.display_name, None);
    }

    #[test]
    fn test_set_auth_is_idempotent() {
        let store = SessionStore::in_memory();
        store.set_auth("A1", "R1", Some("a@b.co".into()), Some("Alice".into()));
        let first = store.read();
        store.set_auth("A1", "R1", Some("a@b.co".into()), Some("Alice".into()));
        assert_eq!(store.read(), first);
    }

    #[test]
    fn test_logout_clears_everything() {
        let store = SessionStore::in_memory();
        store.set_auth("A1", "R1", Some("a@b.co".into()), Some("Alice".into()));
        store.logout();
        assert_eq!(store.read(), Session::default());

        // Logging out of an empty session is harmless
        store.logout();
        assert_eq!(store.read(), Session::default());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.set_auth("A1", "R1", None, None);
        assert!(other.is_authenticated());
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut session = Session::default();
        assert_eq!(session.display_name(), None);
        session.identity.username = Some("a@b.co".into());
        assert_eq!(session.display_name(), Some("a@b.co"));
        session.identity.display_name = Some("Alice".into());
        assert_eq!(session.display_name(), Some("Alice"));
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::open(dir.path());
        store.set_auth("A1", "R1", Some("a@b.co".into()), Some("Alice".into()));

        let reopened = SessionStore::open(dir.path());
        assert_eq!(reopened.read(), store.read());
    }

    #[test]
    fn test_logout_is_persisted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::open(dir.path());
        store.set_auth("A1", "R1", None, None);
        store.logout();

        let reopened = SessionStore::open(dir.path());
        assert!(!reopened.is_authenticated());
    }

    #[test]
    fn test_slot_uses_camel_case_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::open(dir.path());
        store.set_auth("A1", "R1", Some("a@b.co".into()), Some("Alice".into()));

        let contents = std::fs::read_to_string(slot_path(dir.path())).expect("slot written");
        let json: serde_json::Value = serde_json::from_str(&contents).expect("valid json");
        assert_eq!(json["state"]["accessToken"], "A1");
        assert_eq!(json["state"]["refreshToken"], "R1");
        assert_eq!(json["state"]["username"], "a@b.co");
        assert_eq!(json["state"]["name"], "Alice");
        assert_eq!(json["version"], 0);
    }

    #[test]
    fn test_missing_slot_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::open(dir.path().join("not-created-yet"));
        assert_eq!(store.read(), Session::default());
    }

    #[test]
    fn test_corrupt_slot_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(slot_path(dir.path()), "{ not json").expect("write");

        let store = SessionStore::open(dir.path());
        assert_eq!(store.read(), Session::default());

        // The store still works and overwrites the bad slot
        store.set_auth("A1", "R1", None, None);
        assert!(SessionStore::open(dir.path()).is_authenticated());
    }

    #[test]
    fn test_rehydrates_slot_with_nulls() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            slot_path(dir.path()),
            r#"{"state":{"accessToken":null,"refreshToken":null,"username":null,"name":"Bob"},"version":0}"#,
        )
        .expect("write");

        let session = SessionStore::open(dir.path()).read();
        assert!(!session.is_authenticated());
        assert_eq!(session.identity.display_name.as_deref(), Some("Bob"));
    }
}
