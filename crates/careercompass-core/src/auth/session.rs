use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::effects::{Effects, Notification};
use crate::auth::identity::{Identity, UserKind};
use crate::error::{SessionError, StorageError};
use crate::routes::Route;
use crate::storage::{SlotStore, USER_SLOT};

/// Simulated round trip for login and register.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(800);

/// Snapshot of the session observed by consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// True while a login or register is in flight.
    pub transitioning: bool,
}

impl SessionState {
    pub fn kind(&self) -> Option<UserKind> {
        self.identity.as_ref().map(|i| i.kind)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// A login or register attempt.
enum Request<'a> {
    Login {
        email: &'a str,
        password: &'a str,
        kind: UserKind,
    },
    Register {
        name: &'a str,
        email: &'a str,
        password: &'a str,
        kind: UserKind,
    },
}

impl Request<'_> {
    fn kind(&self) -> UserKind {
        match self {
            Request::Login { kind, .. } | Request::Register { kind, .. } => *kind,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Request::Login { .. } => "login",
            Request::Register { .. } => "register",
        }
    }

    /// Build the identity this request would sign in as.
    ///
    /// No credential check happens here: any non-empty input is accepted.
    fn identity(&self) -> Result<Identity, SessionError> {
        match *self {
            Request::Login { email, password, kind } => {
                require("email", email)?;
                require("password", password)?;
                Ok(Identity::from_email(email, kind))
            }
            Request::Register { name, email, password, kind } => {
                require("name", name)?;
                require("email", email)?;
                require("password", password)?;
                Ok(Identity::new(name, email, kind))
            }
        }
    }

    fn success(&self) -> Notification {
        match self {
            Request::Login { .. } => Notification::info("Logged in successfully", "Welcome back!"),
            Request::Register { kind, .. } => Notification::info(
                "Registration successful",
                format!("Your {} account has been created.", kind),
            ),
        }
    }

    fn failure(&self) -> Notification {
        match self {
            Request::Login { .. } => Notification::destructive("Login failed", "Invalid credentials"),
            Request::Register { .. } => {
                Notification::destructive("Registration failed", "Please try again")
            }
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), SessionError> {
    if value.is_empty() {
        return Err(SessionError::OperationFailed(format!("{} is required", field)));
    }
    Ok(())
}

/// Clears the transition flag when dropped, including when the
/// operation's future is dropped mid-flight.
struct TransitionGuard<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            let was_transitioning = state.transitioning;
            state.transitioning = false;
            was_transitioning
        });
    }
}

struct SessionInner {
    store: Box<dyn SlotStore>,
    latency: Duration,
    state: watch::Sender<SessionState>,
}

impl SessionInner {
    fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Raise the transition flag unless it is already up.
    fn begin_transition(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.transitioning {
                false
            } else {
                state.transitioning = true;
                true
            }
        })
    }

    async fn authenticate(&self, request: Request<'_>) -> Effects {
        if !self.begin_transition() {
            warn!(op = request.label(), "Ignoring request while another is in flight");
            return Effects::default();
        }
        let _guard = TransitionGuard { state: &self.state };

        match self.commit(&request).await {
            Ok(identity) => {
                info!(op = request.label(), kind = %identity.kind, id = %identity.id, "Signed in");
                Effects::new(request.success(), Some(Route::dashboard_for(request.kind())))
            }
            Err(e) => {
                warn!(op = request.label(), error = %e, "Sign-in failed");
                Effects::new(request.failure(), None)
            }
        }
    }

    /// Persist first, then publish, so a failed write never leaves a half-applied session.
    async fn commit(&self, request: &Request<'_>) -> Result<Identity, SessionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let identity = request.identity()?;
        let json = identity.to_json().map_err(StorageError::from)?;
        self.store.write(USER_SLOT, &json)?;

        self.state.send_modify(|state| {
            state.identity = Some(identity.clone());
            state.transitioning = false;
        });
        Ok(identity)
    }

    fn logout(&self) -> Effects {
        self.state.send_modify(|state| state.identity = None);
        if let Err(e) = self.store.remove(USER_SLOT) {
            warn!(error = %e, "Failed to remove stored session");
        }
        info!("Signed out");
        Effects::new(
            Notification::info("Logged out", "You have been signed out successfully."),
            Some(Route::Home),
        )
    }
}

/// Owns the signed-in identity and is its only writer.
///
/// The manager is the provider for every `SessionHandle` it hands out. Handles
/// stop working once the manager is dropped.
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    /// Build a manager, restoring any identity found in the user slot.
    ///
    /// Unreadable or malformed slot contents start the session signed out.
    pub fn restore<S: SlotStore + 'static>(store: S, latency: Duration) -> Self {
        let identity = match store.read(USER_SLOT) {
            Ok(Some(json)) => match Identity::from_json(&json) {
                Ok(identity) => {
                    debug!(kind = %identity.kind, id = %identity.id, "Restored session");
                    Some(identity)
                }
                Err(e) => {
                    warn!(error = %e, "Stored session is malformed, starting signed out");
                    None
                }
            },
            Ok(None) => {
                debug!("No stored session");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored session, starting signed out");
                None
            }
        };

        let (state, _) = watch::channel(SessionState {
            identity,
            transitioning: false,
        });

        Self {
            inner: Arc::new(SessionInner {
                store: Box::new(store),
                latency,
                state,
            }),
        }
    }

    /// A cloneable handle for consumers that outlive a borrow, such as spawned tasks.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub async fn login(&self, email: &str, password: &str, kind: UserKind) -> Effects {
        self.inner
            .authenticate(Request::Login { email, password, kind })
            .await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str, kind: UserKind) -> Effects {
        self.inner
            .authenticate(Request::Register { name, email, password, kind })
            .await
    }

    pub fn logout(&self) -> Effects {
        self.inner.logout()
    }

    pub fn state(&self) -> SessionState {
        self.inner.snapshot()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity.clone()
    }

    pub fn kind(&self) -> Option<UserKind> {
        self.inner.state.borrow().kind()
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.state.borrow().transitioning
    }

    /// Watch for state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }
}

/// Read and invoke access to a session owned by a `SessionManager`.
///
/// Every call fails with `SessionError::ProviderMissing` once the manager is gone.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Weak<SessionInner>,
}

impl SessionHandle {
    fn provider(&self) -> Result<Arc<SessionInner>, SessionError> {
        self.inner.upgrade().ok_or(SessionError::ProviderMissing)
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        kind: UserKind,
    ) -> Result<Effects, SessionError> {
        let inner = self.provider()?;
        Ok(inner.authenticate(Request::Login { email, password, kind }).await)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        kind: UserKind,
    ) -> Result<Effects, SessionError> {
        let inner = self.provider()?;
        Ok(inner
            .authenticate(Request::Register { name, email, password, kind })
            .await)
    }

    pub fn logout(&self) -> Result<Effects, SessionError> {
        Ok(self.provider()?.logout())
    }

    pub fn state(&self) -> Result<SessionState, SessionError> {
        Ok(self.provider()?.snapshot())
    }

    pub fn identity(&self) -> Result<Option<Identity>, SessionError> {
        Ok(self.state()?.identity)
    }

    pub fn kind(&self) -> Result<Option<UserKind>, SessionError> {
        Ok(self.state()?.kind())
    }

    pub fn is_transitioning(&self) -> Result<bool, SessionError> {
        Ok(self.state()?.transitioning)
    }

    pub fn subscribe(&self) -> Result<watch::Receiver<SessionState>, SessionError> {
        Ok(self.provider()?.state.subscribe())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::effects::Variant;
    use crate::storage::{FileSlotStore, MemorySlotStore};

    fn manager_with(store: Arc<MemorySlotStore>) -> SessionManager {
        SessionManager::restore(store, Duration::ZERO)
    }

    fn stored_identity(store: &MemorySlotStore) -> Option<Identity> {
        store
            .read(USER_SLOT)
            .unwrap()
            .map(|json| Identity::from_json(&json).unwrap())
    }

    /// Reads nothing, refuses every write.
    struct ReadOnlyStore;

    impl SlotStore for ReadOnlyStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.write(key, "")
        }
    }

    // -------------------------------------------------------------------------
    // Login / Register
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_authenticates_and_persists() {
        let store = Arc::new(MemorySlotStore::new());
        let manager = manager_with(store.clone());
        assert!(!manager.state().is_authenticated());

        for kind in [UserKind::Student, UserKind::Institution] {
            let effects = manager.login("someone@example.com", "pw", kind).await;

            let identity = manager.identity().unwrap();
            assert_eq!(identity.kind, kind);
            assert_eq!(identity.email, "someone@example.com");
            assert_eq!(manager.kind(), Some(kind));
            assert!(!manager.is_transitioning());
            assert_eq!(stored_identity(&store), Some(identity));

            assert_eq!(effects.navigate, Some(Route::dashboard_for(kind)));
            let note = effects.notification.unwrap();
            assert_eq!(note.title, "Logged in successfully");
            assert_eq!(note.variant, Variant::Default);
        }
    }

    #[tokio::test]
    async fn test_login_derives_display_name() {
        let manager = manager_with(Arc::new(MemorySlotStore::new()));
        manager.login("alice@example.com", "x", UserKind::Student).await;
        assert_eq!(manager.identity().unwrap().display_name, "alice");
    }

    #[tokio::test]
    async fn test_register_uses_name_verbatim() {
        let manager = manager_with(Arc::new(MemorySlotStore::new()));
        let effects = manager
            .register("Acme University", "a@b.com", "x", UserKind::Institution)
            .await;

        let identity = manager.identity().unwrap();
        assert_eq!(identity.display_name, "Acme University");
        assert_eq!(identity.kind, UserKind::Institution);
        assert_eq!(effects.navigate, Some(Route::InstitutionDashboard));
        let note = effects.notification.unwrap();
        assert_eq!(note.title, "Registration successful");
        assert_eq!(note.description, "Your institution account has been created.");
    }

    #[tokio::test]
    async fn test_second_login_overwrites_identity() {
        let store = Arc::new(MemorySlotStore::new());
        let manager = manager_with(store.clone());

        manager.login("first@one.com", "x", UserKind::Student).await;
        let first = manager.identity().unwrap();
        manager.login("second@two.com", "y", UserKind::Institution).await;
        let second = manager.identity().unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.display_name, "second");
        assert_eq!(second.email, "second@two.com");
        assert_eq!(second.kind, UserKind::Institution);
        assert_eq!(stored_identity(&store), Some(second));
    }

    #[tokio::test]
    async fn test_empty_input_fails_without_state_change() {
        let store = Arc::new(MemorySlotStore::new());
        let manager = manager_with(store.clone());

        let effects = manager.login("", "pw", UserKind::Student).await;
        let note = effects.notification.unwrap();
        assert_eq!(note.title, "Login failed");
        assert_eq!(note.description, "Invalid credentials");
        assert!(note.is_destructive());
        assert!(effects.navigate.is_none());

        let effects = manager.register("", "a@b.com", "pw", UserKind::Student).await;
        assert_eq!(effects.notification.unwrap().title, "Registration failed");

        assert_eq!(manager.state(), SessionState::default());
        assert!(store.read(USER_SLOT).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_identity_unchanged() {
        let manager = SessionManager::restore(ReadOnlyStore, Duration::ZERO);

        let effects = manager.login("alice@example.com", "x", UserKind::Student).await;

        assert!(effects.notification.unwrap().is_destructive());
        assert!(effects.navigate.is_none());
        assert!(manager.identity().is_none());
        assert!(!manager.is_transitioning());
    }

    // -------------------------------------------------------------------------
    // Logout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_logout_clears_identity_and_slot() {
        let store = Arc::new(MemorySlotStore::new());
        let manager = manager_with(store.clone());
        manager.login("alice@example.com", "x", UserKind::Student).await;

        let effects = manager.logout();

        assert!(manager.identity().is_none());
        assert!(store.read(USER_SLOT).unwrap().is_none());
        assert_eq!(effects.navigate, Some(Route::Home));
        assert_eq!(effects.notification.unwrap().title, "Logged out");
    }

    #[test]
    fn test_logout_while_anonymous_still_reports() {
        let store = Arc::new(MemorySlotStore::with_slot(USER_SLOT, "stale"));
        let manager = manager_with(store.clone());
        assert!(manager.identity().is_none());

        let effects = manager.logout();

        assert!(manager.identity().is_none());
        assert!(store.read(USER_SLOT).unwrap().is_none());
        assert_eq!(effects.navigate, Some(Route::Home));
        assert!(effects.notification.is_some());
    }

    #[test]
    fn test_logout_survives_remove_failure() {
        let manager = SessionManager::restore(ReadOnlyStore, Duration::ZERO);
        let effects = manager.logout();
        assert!(manager.identity().is_none());
        assert_eq!(effects.navigate, Some(Route::Home));
    }

    // -------------------------------------------------------------------------
    // Restore
    // -------------------------------------------------------------------------

    #[test]
    fn test_restore_well_formed_slot() {
        let json = r#"{"id":"k3j2h1","name":"Bob","email":"bob@uni.edu","type":"student"}"#;
        let manager = manager_with(Arc::new(MemorySlotStore::with_slot(USER_SLOT, json)));

        let identity = manager.identity().unwrap();
        assert_eq!(identity.id, "k3j2h1");
        assert_eq!(identity.display_name, "Bob");
        assert_eq!(manager.kind(), Some(UserKind::Student));
        assert!(!manager.is_transitioning());
    }

    #[test]
    fn test_restore_malformed_slot_is_anonymous() {
        for bad in ["{not json", r#"{"id":"x"}"#, r#"{"id":"x","name":"n","email":"e","type":null}"#] {
            let manager = manager_with(Arc::new(MemorySlotStore::with_slot(USER_SLOT, bad)));
            assert_eq!(manager.state(), SessionState::default());
        }
    }

    #[tokio::test]
    async fn test_restart_round_trip() {
        let store = Arc::new(MemorySlotStore::new());
        let written = {
            let manager = manager_with(store.clone());
            manager
                .register("Ada Lovelace", "ada@example.com", "pw", UserKind::Student)
                .await;
            manager.identity().unwrap()
        };

        let restarted = manager_with(store);
        assert_eq!(restarted.identity(), Some(written));
    }

    #[tokio::test]
    async fn test_restart_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let written = {
            let store = FileSlotStore::new(dir.path().to_path_buf()).unwrap();
            let manager = SessionManager::restore(store, Duration::ZERO);
            manager.login("carol@college.ac.uk", "pw", UserKind::Institution).await;
            manager.identity().unwrap()
        };

        let store = FileSlotStore::new(dir.path().to_path_buf()).unwrap();
        let restarted = SessionManager::restore(store, Duration::ZERO);
        assert_eq!(restarted.identity(), Some(written));
    }

    // -------------------------------------------------------------------------
    // Handles and concurrency
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_handle_sees_manager_state() {
        let manager = manager_with(Arc::new(MemorySlotStore::new()));
        let handle = manager.handle();

        let effects = handle.login("dan@x.io", "pw", UserKind::Student).await.unwrap();
        assert_eq!(effects.navigate, Some(Route::StudentDashboard));
        assert_eq!(manager.identity(), handle.identity().unwrap());

        handle.logout().unwrap();
        assert!(manager.identity().is_none());
    }

    #[tokio::test]
    async fn test_handle_without_provider_fails_fast() {
        let manager = manager_with(Arc::new(MemorySlotStore::new()));
        let handle = manager.handle();
        drop(manager);

        assert!(matches!(
            handle.login("a@b.com", "x", UserKind::Student).await,
            Err(SessionError::ProviderMissing)
        ));
        assert!(matches!(handle.logout(), Err(SessionError::ProviderMissing)));
        assert!(matches!(handle.kind(), Err(SessionError::ProviderMissing)));
        assert!(handle.subscribe().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_request_blocks_second_call() {
        let manager = SessionManager::restore(MemorySlotStore::new(), DEFAULT_LATENCY);
        let mut rx = manager.subscribe();
        let handle = manager.handle();

        let first = tokio::spawn(async move {
            handle.login("first@a.com", "x", UserKind::Student).await
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().transitioning);
        assert!(manager.identity().is_none());

        let ignored = manager.login("second@b.com", "y", UserKind::Institution).await;
        assert!(ignored.is_empty());

        let effects = first.await.unwrap().unwrap();
        assert_eq!(effects.navigate, Some(Route::StudentDashboard));
        assert_eq!(manager.identity().unwrap().email, "first@a.com");
        assert!(!manager.is_transitioning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_login_releases_transition() {
        let store = Arc::new(MemorySlotStore::new());
        let manager = SessionManager::restore(store.clone(), DEFAULT_LATENCY);

        let cancelled = tokio::time::timeout(
            Duration::from_millis(100),
            manager.login("a@b.com", "x", UserKind::Student),
        )
        .await;
        assert!(cancelled.is_err());
        assert!(!manager.is_transitioning());
        assert!(manager.identity().is_none());
        assert!(store.read(USER_SLOT).unwrap().is_none());

        let effects = manager.login("c@d.com", "y", UserKind::Student).await;
        assert_eq!(effects.navigate, Some(Route::StudentDashboard));
        assert_eq!(manager.identity().unwrap().email, "c@d.com");
        assert!(!manager.is_transitioning());
    }
}
