//! Session Store
//!
//! Holds the authenticated identity and its bearer/refresh credentials in
//! persistent key-value storage, mirrored in memory.
//!
//! ## Lifecycle
//!
//! 1. [`SessionStore::new`] starts in the *loading* state
//! 2. [`SessionStore::hydrate`] restores a persisted session once at startup
//! 3. [`SessionStore::login`] writes identity and both credentials together
//! 4. [`SessionStore::logout`] clears all three, also triggered by any 401
//!
//! The store does not validate tokens. The backend is the enforcer; the
//! client only reacts to its verdict through [`SessionStore::check_status`].

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ClientError, ClientResult};
use crate::model::{AuthResponse, User};
use crate::routes::Route;
use crate::storage::{KeyValueStore, StorageResult};

/// Storage key for the serialized identity
pub const KEY_USER: &str = "agenticaUser";
/// Storage key for the bearer credential
pub const KEY_ACCESS: &str = "agenticaAccessToken";
/// Storage key for the refresh credential. Persisted, never exchanged.
pub const KEY_REFRESH: &str = "agenticaRefreshToken";

const STATUS_UNAUTHORIZED: u16 = 401;

/// Credentials handed to [`SessionStore::login`]
pub type Credentials = AuthResponse;

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    hydrated: bool,
}

/// Process-wide session, owned by the composition root
pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Create an unhydrated store over `storage`
    pub fn new(storage: impl KeyValueStore + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            state: RwLock::new(SessionState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Restore the persisted session. Both the identity and the access
    /// credential must be present; anything else leaves the store logged out.
    pub fn hydrate(&self) {
        let user = match self.read_persisted_user() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Failed to read persisted session: {}", e);
                None
            }
        };

        let mut state = self.write();
        state.user = user;
        state.hydrated = true;

        match &state.user {
            Some(u) => tracing::info!(username = %u.username, "Session restored"),
            None => tracing::debug!("No persisted session"),
        }
    }

    fn read_persisted_user(&self) -> StorageResult<Option<User>> {
        let stored_user = self.storage.get(KEY_USER)?;
        let token = self.storage.get(KEY_ACCESS)?;

        let (Some(raw), Some(_)) = (stored_user, token) else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable persisted identity: {}", e);
                Ok(None)
            }
        }
    }

    /// Persist credentials and identity, then mark the session authenticated.
    /// If any key fails to persist, none of them stay behind and the session
    /// is left logged out.
    pub fn login(&self, credentials: &Credentials) -> ClientResult<()> {
        let user_json = serde_json::to_string(&credentials.user)?;

        if let Err(e) = self.persist(credentials, &user_json) {
            tracing::warn!("Failed to persist session, discarding partial write: {}", e);
            self.clear_persisted();
            self.write().user = None;
            return Err(e.into());
        }

        let mut state = self.write();
        state.user = Some(credentials.user.clone());
        state.hydrated = true;

        tracing::info!(username = %credentials.user.username, "Logged in");
        Ok(())
    }

    /// Clear the session. Safe to call when already logged out.
    ///
    /// Returns the screen the shell should navigate to.
    pub fn logout(&self) -> Route {
        self.clear_persisted();

        let previous = self.write().user.take();
        if let Some(u) = previous {
            tracing::info!(username = %u.username, "Logged out");
        }

        Route::Login
    }

    fn persist(&self, credentials: &Credentials, user_json: &str) -> StorageResult<()> {
        self.storage.set(KEY_ACCESS, &credentials.access)?;
        self.storage.set(KEY_REFRESH, &credentials.refresh)?;
        self.storage.set(KEY_USER, user_json)
    }

    fn clear_persisted(&self) {
        for key in [KEY_ACCESS, KEY_REFRESH, KEY_USER] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, "Failed to clear persisted session key: {}", e);
            }
        }
    }

    /// True until [`hydrate`](Self::hydrate) or [`login`](Self::login) has run
    pub fn is_loading(&self) -> bool {
        !self.read().hydrated
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some()
    }

    /// Current identity, if any
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Stored bearer credential
    pub fn access_token(&self) -> Option<String> {
        match self.storage.get(KEY_ACCESS) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read access token: {}", e);
                None
            }
        }
    }

    /// Value for the `Authorization` header: `Bearer <token>`, or empty
    /// when no credential is stored. The header is always sent.
    pub fn authorization_header(&self) -> String {
        self.access_token()
            .map(|token| format!("Bearer {}", token))
            .unwrap_or_default()
    }

    /// React to the status of an authenticated response. A 401 logs the
    /// session out and becomes [`ClientError::Unauthorized`]; nothing is
    /// retried.
    pub fn check_status(&self, status: u16) -> ClientResult<()> {
        if status == STATUS_UNAUTHORIZED {
            tracing::warn!("Backend rejected the session credential, logging out");
            self.logout();
            return Err(ClientError::Unauthorized);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionStore")
            .field("hydrated", &state.hydrated)
            .field("user", &state.user.as_ref().map(|u| u.username.as_str()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Profile;
    use crate::storage::{MemoryStore, StorageError};

    /// Memory store that refuses writes to one key
    struct RejectingStore {
        inner: MemoryStore,
        rejected: &'static str,
    }

    impl KeyValueStore for RejectingStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if key == self.rejected {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key)
        }
    }

    fn credentials() -> Credentials {
        AuthResponse {
            access: "access-1".to_string(),
            refresh: "refresh-1".to_string(),
            user: User {
                id: Some(1),
                username: "ana".to_string(),
                email: Some("ana@example.com".to_string()),
                profile: Some(Profile::default()),
            },
        }
    }

    #[test]
    fn test_starts_loading_and_unauthenticated() {
        let session = SessionStore::new(MemoryStore::new());
        assert!(session.is_loading());
        assert!(!session.is_authenticated());
        assert_eq!(session.authorization_header(), "");
    }

    #[test]
    fn test_login_persists_and_authenticates() {
        let storage = MemoryStore::new();
        let session = SessionStore::new(storage.clone());
        session.hydrate();

        session.login(&credentials()).unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().username, "ana");
        assert_eq!(storage.get(KEY_ACCESS).unwrap().as_deref(), Some("access-1"));
        assert_eq!(storage.get(KEY_REFRESH).unwrap().as_deref(), Some("refresh-1"));

        let persisted: User =
            serde_json::from_str(&storage.get(KEY_USER).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, credentials().user);
        assert_eq!(session.authorization_header(), "Bearer access-1");
    }

    #[test]
    fn test_failed_login_leaves_no_tokens_behind() {
        let storage = MemoryStore::new();
        let session = SessionStore::new(RejectingStore {
            inner: storage.clone(),
            rejected: KEY_USER,
        });
        session.hydrate();

        assert!(session.login(&credentials()).is_err());

        assert!(!session.is_authenticated());
        assert_eq!(storage.get(KEY_ACCESS).unwrap(), None);
        assert_eq!(storage.get(KEY_REFRESH).unwrap(), None);
        assert!(storage.is_empty());
        assert_eq!(session.authorization_header(), "");
    }

    #[test]
    fn test_logout_clears_everything_and_is_idempotent() {
        let storage = MemoryStore::new();
        let session = SessionStore::new(storage.clone());
        session.login(&credentials()).unwrap();

        assert_eq!(session.logout(), Route::Login);
        assert!(!session.is_authenticated());
        assert!(storage.is_empty());

        assert_eq!(session.logout(), Route::Login);
        assert!(!session.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_hydrate_restores_session() {
        let storage = MemoryStore::new();
        SessionStore::new(storage.clone()).login(&credentials()).unwrap();

        let restarted = SessionStore::new(storage);
        assert!(!restarted.is_authenticated());
        restarted.hydrate();
        assert!(!restarted.is_loading());
        assert_eq!(restarted.user().unwrap().username, "ana");
    }

    #[test]
    fn test_hydrate_requires_token() {
        let storage = MemoryStore::new();
        storage
            .set(KEY_USER, &serde_json::to_string(&credentials().user).unwrap())
            .unwrap();

        let session = SessionStore::new(storage);
        session.hydrate();
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_hydrate_ignores_corrupt_identity() {
        let storage = MemoryStore::new();
        storage.set(KEY_USER, "{not json").unwrap();
        storage.set(KEY_ACCESS, "tok").unwrap();

        let session = SessionStore::new(storage);
        session.hydrate();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_check_status_401_logs_out_once() {
        let storage = MemoryStore::new();
        let session = SessionStore::new(storage.clone());
        session.login(&credentials()).unwrap();

        assert!(session.check_status(200).is_ok());
        assert!(session.check_status(404).is_ok());
        assert_eq!(storage.removals(), 0);

        let err = session.check_status(401).unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!session.is_authenticated());
        assert_eq!(storage.removals(), 3);
    }
}
