//! Client-held authentication state and the forced-logout guard.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::User;

/// File name of the persisted auth slice inside the data directory
pub const AUTH_STORAGE_FILE: &str = "auth-storage.json";

/// Delay between clearing the session and redirecting
pub const REDIRECT_DELAY: Duration = Duration::from_millis(100);

/// How long the logout guard stays set after a forced logout
pub const LOGOUT_COOLDOWN: Duration = Duration::from_secs(1);

/// The auth slice: tokens, flag and current user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
    pub user: Option<User>,
}

#[derive(Debug)]
pub enum SessionError {
    ReadError(PathBuf, std::io::Error),
    WriteError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_json::Error),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::ReadError(path, e) => {
                write!(f, "Failed to read session '{}': {}", path.display(), e)
            }
            SessionError::WriteError(path, e) => {
                write!(f, "Failed to write session '{}': {}", path.display(), e)
            }
            SessionError::ParseError(path, e) => {
                write!(f, "Failed to parse session '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// JSON file holding the persisted auth slice.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage at `<data_dir>/auth-storage.json`
    pub fn in_dir(data_dir: &std::path::Path) -> Self {
        Self::new(data_dir.join(AUTH_STORAGE_FILE))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Reads the stored session; a missing file is an empty session.
    pub fn load(&self) -> Result<Session, SessionError> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| SessionError::ReadError(self.path.clone(), e))?;
        serde_json::from_str(&contents).map_err(|e| SessionError::ParseError(self.path.clone(), e))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::WriteError(self.path.clone(), e))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::ParseError(self.path.clone(), e))?;
        std::fs::write(&self.path, json).map_err(|e| SessionError::WriteError(self.path.clone(), e))
    }

    pub fn remove(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::WriteError(self.path.clone(), e)),
        }
    }
}

/// Shared session, read fresh by the HTTP layer on every request.
///
/// With storage attached, every change is written through to disk.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Option<SessionStorage>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a store backed by `storage`, loading what it holds.
    pub fn persistent(storage: SessionStorage) -> Result<Self, SessionError> {
        let session = storage.load()?;
        Ok(Self {
            state: RwLock::new(session),
            storage: Some(storage),
        })
    }

    pub fn snapshot(&self) -> Session {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.snapshot().access_token
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.snapshot().refresh_token
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated
    }

    /// Stores a new token pair and marks the session authenticated.
    pub fn set_tokens(&self, access_token: String, refresh_token: Option<String>) {
        self.modify(|s| {
            s.access_token = Some(access_token);
            if refresh_token.is_some() {
                s.refresh_token = refresh_token;
            }
            s.is_authenticated = true;
        });
    }

    pub fn set_user(&self, user: Option<User>) {
        self.modify(|s| s.user = user);
    }

    /// Drops tokens and user from memory and persists the empty session.
    pub fn clear(&self) {
        self.modify(|s| *s = Session::default());
    }

    /// Removes the persisted file entirely.
    pub fn clear_persisted(&self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.remove() {
                tracing::warn!(error = %e, "failed to remove persisted session");
            }
        }
    }

    fn modify<F: FnOnce(&mut Session)>(&self, f: F) {
        let snapshot = {
            let mut guard = match self.state.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            f(&mut guard);
            guard.clone()
        };
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(&snapshot) {
                tracing::warn!(error = %e, "failed to persist session");
            }
        }
    }
}

/// Where a forced logout sends the user.
pub trait Navigator: Send + Sync {
    fn redirect_to_root(&self);
}

/// Navigator that only records the event in the log.
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect_to_root(&self) {
        tracing::info!("session expired, returning to start");
    }
}

/// Re-entrancy guard around the forced logout triggered by a 401.
pub struct LogoutGuard {
    handling: Arc<AtomicBool>,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
    cooldown: Duration,
}

impl LogoutGuard {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self::with_timing(navigator, REDIRECT_DELAY, LOGOUT_COOLDOWN)
    }

    pub fn with_timing(
        navigator: Arc<dyn Navigator>,
        redirect_delay: Duration,
        cooldown: Duration,
    ) -> Self {
        Self {
            handling: Arc::new(AtomicBool::new(false)),
            navigator,
            redirect_delay,
            cooldown,
        }
    }

    pub fn is_handling(&self) -> bool {
        self.handling.load(Ordering::SeqCst)
    }

    /// Reacts to a 401 from `path`. `had_token` is whether the failing
    /// request carried a bearer token.
    ///
    /// Returns true when this call started a logout cycle. The session is
    /// cleared before returning; the redirect and the guard release happen
    /// on spawned tasks, so a tokio runtime must be running.
    pub fn handle_unauthorized(&self, session: &SessionStore, path: &str, had_token: bool) -> bool {
        if !had_token || path.contains("/auth/logout") || !session.is_authenticated() {
            return false;
        }
        if self
            .handling
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        tracing::info!(path, "unauthorized response, logging out");
        session.clear();
        session.clear_persisted();

        let navigator = Arc::clone(&self.navigator);
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.redirect_to_root();
        });

        let handling = Arc::clone(&self.handling);
        let cooldown = self.cooldown;
        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            handling.store(false, Ordering::SeqCst);
        });

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tempfile::tempdir;

    struct CountingNavigator(AtomicUsize);

    impl Navigator for CountingNavigator {
        fn redirect_to_root(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn logged_in() -> SessionStore {
        let store = SessionStore::in_memory();
        store.set_tokens("access".to_string(), Some("refresh".to_string()));
        store
    }

    #[test]
    fn test_set_tokens_marks_authenticated() {
        let store = logged_in();
        let session = store.snapshot();
        assert_eq!(session.access_token.as_deref(), Some("access"));
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
        assert!(session.is_authenticated);
    }

    #[test]
    fn test_set_tokens_keeps_refresh_when_not_rotated() {
        let store = logged_in();
        store.set_tokens("access2".to_string(), None);
        assert_eq!(store.refresh_token().as_deref(), Some("refresh"));
        assert_eq!(store.access_token().as_deref(), Some("access2"));
    }

    #[test]
    fn test_persistent_store_round_trips_through_file() {
        let temp_dir = tempdir().unwrap();
        let storage = SessionStorage::in_dir(temp_dir.path());

        let store = SessionStore::persistent(storage.clone()).unwrap();
        store.set_tokens("abc".to_string(), Some("def".to_string()));
        assert!(storage.path().exists());

        let reopened = SessionStore::persistent(storage.clone()).unwrap();
        assert_eq!(reopened.access_token().as_deref(), Some("abc"));
        assert!(reopened.is_authenticated());

        reopened.clear_persisted();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_corrupt_storage_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let storage = SessionStorage::in_dir(temp_dir.path());
        std::fs::write(storage.path(), "{not json").unwrap();

        let result = SessionStore::persistent(storage);
        assert!(matches!(result, Err(SessionError::ParseError(_, _))));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_once() {
        let navigator = Arc::new(CountingNavigator(AtomicUsize::new(0)));
        let guard = LogoutGuard::with_timing(
            navigator.clone(),
            Duration::from_millis(5),
            Duration::from_millis(50),
        );
        let store = logged_in();

        assert!(guard.handle_unauthorized(&store, "/pets", true));
        assert!(!store.is_authenticated());
        assert!(store.access_token().is_none());

        // Second 401 while the first is being handled does nothing
        store.set_tokens("again".to_string(), None);
        assert!(!guard.handle_unauthorized(&store, "/pets", true));
        assert!(store.is_authenticated());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(navigator.0.load(Ordering::SeqCst), 1);
        assert!(!guard.is_handling());
    }

    #[tokio::test]
    async fn test_logout_endpoint_and_missing_token_are_ignored() {
        let navigator = Arc::new(CountingNavigator(AtomicUsize::new(0)));
        let guard = LogoutGuard::new(navigator.clone());
        let store = logged_in();

        assert!(!guard.handle_unauthorized(&store, "/auth/logout", true));
        assert!(!guard.handle_unauthorized(&store, "/pets", false));
        assert!(store.is_authenticated());
        assert!(!guard.is_handling());
    }
}
