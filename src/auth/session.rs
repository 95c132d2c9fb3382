//! Session lifecycle: the single source of truth for authentication
//! state.
//!
//! The store owns both the in-memory session and the persisted token;
//! nothing else writes to either. On startup `restore` attempts to
//! re-establish a session from the persisted token by validating it
//! against `/auth/profile`; an invalid token is treated the same as an
//! absent one and cleared silently, so the user simply lands on the
//! login screen. Transitions are published through a watch channel as
//! whole snapshots, so a subscriber can never observe an identity
//! without `Authenticated` status or vice versa.

use std::future::Future;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ApiError, TokenCell};
use crate::models::{AuthPayload, User};

use super::store::TokenStore;

/// Minimum password length enforced locally before signup hits the
/// network, mirroring the server-side rule.
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Startup restoration has not resolved yet; gated views render
    /// a placeholder only.
    Restoring,
    Authenticated,
    Anonymous,
}

/// An atomic view of the session. `user` is `Some` iff the status is
/// `Authenticated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub user: Option<User>,
}

impl SessionSnapshot {
    fn restoring() -> Self {
        Self { status: SessionStatus::Restoring, user: None }
    }

    fn anonymous() -> Self {
        Self { status: SessionStatus::Anonymous, user: None }
    }

    fn authenticated(user: User) -> Self {
        Self { status: SessionStatus::Authenticated, user: Some(user) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

/// The three auth calls the session store needs from the backend.
/// `ApiClient` is the production implementation; tests drive the store
/// with an in-memory fake.
pub trait AuthApi: Send + Sync {
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthPayload, ApiError>> + Send;

    fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthPayload, ApiError>> + Send;

    fn profile(&self) -> impl Future<Output = Result<User, ApiError>> + Send;
}

impl AuthApi for crate::api::ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        crate::api::ApiClient::login(self, email, password).await
    }

    async fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ApiError> {
        crate::api::ApiClient::signup(self, full_name, email, password).await
    }

    async fn profile(&self) -> Result<User, ApiError> {
        crate::api::ApiClient::profile(self).await
    }
}

/// Errors surfaced to the login and signup forms. All of these are
/// terminal: the session resolves to a defined state and the user must
/// act to retry; the store never retries on its own.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    /// Server-reported rejection: bad credentials or a validation error.
    /// The message is shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Unable to connect to server: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Unauthorized(m) | ApiError::AccessDenied(m) | ApiError::BadRequest(m) => {
                AuthError::Rejected(m)
            }
            ApiError::NotFound(m) | ApiError::ServerError(m) | ApiError::InvalidResponse(m) => {
                AuthError::Server(m)
            }
            ApiError::Network(e) => AuthError::Network(e.to_string()),
        }
    }
}

struct Inner {
    /// Bumped by every explicit transition (login/signup/logout). A
    /// restore captures the value at start and discards its result if
    /// the generation moved underneath it.
    generation: u64,
    /// Single-flight guard: only one restoration may be in flight.
    restore_in_flight: bool,
}

/// Process-wide session singleton. Constructed once at startup and
/// handed to the app explicitly; there is no ambient global.
pub struct SessionStore<A, S> {
    api: A,
    store: S,
    token_cell: TokenCell,
    tx: watch::Sender<SessionSnapshot>,
    inner: Mutex<Inner>,
}

impl<A: AuthApi, S: TokenStore> SessionStore<A, S> {
    /// Create the store in `Restoring` state. The caller is expected to
    /// invoke `restore` once before relying on the status.
    pub fn new(api: A, store: S, token_cell: TokenCell) -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::restoring());
        Self {
            api,
            store,
            token_cell,
            tx,
            inner: Mutex::new(Inner { generation: 0, restore_in_flight: false }),
        }
    }

    /// Subscribe to session transitions. Receivers observe whole
    /// snapshots, committed before any navigation tied to them.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.tx.borrow().status
    }

    pub fn current_user(&self) -> Option<User> {
        self.tx.borrow().user.clone()
    }

    /// Attempt to re-establish a session from the persisted token.
    ///
    /// No token resolves straight to `Anonymous` without touching the
    /// network. A present token is validated via a profile fetch; any
    /// failure (including network failure) clears the persisted token
    /// and resolves `Anonymous` - expired and absent are deliberately
    /// indistinguishable to the user. Overlapping calls are no-ops, and
    /// a cancelled restore writes no state.
    pub async fn restore(&self, cancel: &CancellationToken) -> SessionStatus {
        let generation = {
            let mut inner = self.inner.lock().await;
            if inner.restore_in_flight {
                debug!("Restore already in flight; ignoring");
                return self.status();
            }
            inner.restore_in_flight = true;
            inner.generation
        };

        let status = self.run_restore(generation, cancel).await;
        self.inner.lock().await.restore_in_flight = false;
        status
    }

    async fn run_restore(&self, generation: u64, cancel: &CancellationToken) -> SessionStatus {
        let token = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                None
            }
        };

        let Some(token) = token else {
            debug!("No persisted token; session is anonymous");
            return self.commit(generation, cancel, SessionSnapshot::anonymous(), false).await;
        };

        // Publish the candidate credential so the profile fetch carries it.
        {
            let inner = self.inner.lock().await;
            if cancel.is_cancelled() || inner.generation != generation {
                return self.status();
            }
            self.token_cell.set(Some(token));
        }

        match self.api.profile().await {
            Ok(user) => {
                info!(email = %user.email, "Session restored");
                self.commit(generation, cancel, SessionSnapshot::authenticated(user), false)
                    .await
            }
            Err(e) => {
                debug!(error = %e, "Stored token rejected; clearing");
                self.commit(generation, cancel, SessionSnapshot::anonymous(), true).await
            }
        }
    }

    /// Apply a restore outcome unless a later transition or a
    /// cancellation supersedes it. `clear_token` also wipes the
    /// persisted credential (the invalid-token path).
    async fn commit(
        &self,
        generation: u64,
        cancel: &CancellationToken,
        snapshot: SessionSnapshot,
        clear_token: bool,
    ) -> SessionStatus {
        let inner = self.inner.lock().await;
        if cancel.is_cancelled() || inner.generation != generation {
            debug!("Restore outcome superseded; discarding");
            return self.status();
        }
        if clear_token {
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear persisted token");
            }
            self.token_cell.set(None);
        }
        let status = snapshot.status;
        self.tx.send_replace(snapshot);
        status
    }

    /// Authenticate with email and password. On success the new session
    /// is committed and visible to subscribers before this returns, so
    /// the caller may navigate immediately. On failure the prior state
    /// is left untouched and the error describes the rejection.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<User, AuthError> {
        let payload = self.api.login(email, password).await?;
        Ok(self.establish(payload, cancel).await)
    }

    /// Create an account. The password length precondition is checked
    /// locally; violating it fails without a network call.
    pub async fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<User, AuthError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort);
        }
        let payload = self.api.signup(full_name, email, password).await?;
        Ok(self.establish(payload, cancel).await)
    }

    async fn establish(&self, payload: AuthPayload, cancel: &CancellationToken) -> User {
        let mut inner = self.inner.lock().await;
        if cancel.is_cancelled() {
            debug!("Auth completed after cancellation; discarding");
            return payload.user;
        }
        inner.generation += 1;
        if let Err(e) = self.store.save(&payload.token) {
            warn!(error = %e, "Failed to persist token; session will not survive restart");
        }
        self.token_cell.set(Some(payload.token));
        info!(email = %payload.user.email, "Signed in");
        self.tx.send_replace(SessionSnapshot::authenticated(payload.user.clone()));
        payload.user
    }

    /// Drop the session: clear the persisted token and the shared
    /// credential, then commit `Anonymous`. Persistence errors are
    /// logged, not surfaced - the in-memory session is gone regardless.
    pub async fn logout(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted token");
        }
        self.token_cell.set(None);
        info!("Signed out");
        self.tx.send_replace(SessionSnapshot::anonymous());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::sync::Notify;

    use super::*;
    use crate::auth::store::MemoryTokenStore;

    fn ana() -> User {
        User {
            id: "u1".to_string(),
            full_name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
        }
    }

    /// Programmable backend fake. `profile_user: None` makes the
    /// profile fetch fail like an expired token; `login_payload: None`
    /// rejects logins with "Invalid credentials".
    #[derive(Default)]
    struct FakeAuthApi {
        profile_user: Option<User>,
        login_payload: Option<AuthPayload>,
        signup_payload: Option<AuthPayload>,
        /// When set, `profile` blocks until notified, simulating a slow
        /// validation racing other operations.
        profile_gate: Option<Arc<Notify>>,
        profile_calls: AtomicUsize,
        login_calls: AtomicUsize,
        signup_calls: AtomicUsize,
    }

    impl AuthApi for FakeAuthApi {
        async fn login(&self, _email: &str, _password: &str) -> Result<AuthPayload, ApiError> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            match &self.login_payload {
                Some(payload) => Ok(payload.clone()),
                None => Err(ApiError::Unauthorized("Invalid credentials".to_string())),
            }
        }

        async fn signup(
            &self,
            _full_name: &str,
            _email: &str,
            _password: &str,
        ) -> Result<AuthPayload, ApiError> {
            self.signup_calls.fetch_add(1, Ordering::SeqCst);
            match &self.signup_payload {
                Some(payload) => Ok(payload.clone()),
                None => Err(ApiError::BadRequest("Email already registered".to_string())),
            }
        }

        async fn profile(&self) -> Result<User, ApiError> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.profile_gate {
                gate.notified().await;
            }
            match &self.profile_user {
                Some(user) => Ok(user.clone()),
                None => Err(ApiError::Unauthorized(
                    "Unauthorized - session may be expired".to_string(),
                )),
            }
        }
    }

    fn assert_snapshot_invariant(snapshot: &SessionSnapshot) {
        assert_eq!(
            snapshot.user.is_some(),
            snapshot.status == SessionStatus::Authenticated,
            "identity must be present iff authenticated"
        );
    }

    #[tokio::test]
    async fn restore_without_token_is_anonymous_and_network_silent() {
        let api = FakeAuthApi { profile_user: Some(ana()), ..Default::default() };
        let store = SessionStore::new(api, MemoryTokenStore::default(), TokenCell::new());

        let status = store.restore(&CancellationToken::new()).await;

        assert_eq!(status, SessionStatus::Anonymous);
        assert_eq!(store.api.profile_calls.load(Ordering::SeqCst), 0);
        assert_snapshot_invariant(&store.snapshot());
    }

    #[tokio::test]
    async fn restore_with_valid_token_authenticates() {
        let api = FakeAuthApi { profile_user: Some(ana()), ..Default::default() };
        let cell = TokenCell::new();
        let store =
            SessionStore::new(api, MemoryTokenStore::with_token("abc123"), cell.clone());

        let status = store.restore(&CancellationToken::new()).await;

        assert_eq!(status, SessionStatus::Authenticated);
        assert_eq!(store.current_user(), Some(ana()));
        assert_eq!(cell.get(), Some("abc123".to_string()));
        assert_eq!(store.api.profile_calls.load(Ordering::SeqCst), 1);
        assert_snapshot_invariant(&store.snapshot());
    }

    #[tokio::test]
    async fn restore_with_rejected_token_clears_credential() {
        let api = FakeAuthApi::default(); // profile always fails
        let cell = TokenCell::new();
        let store =
            SessionStore::new(api, MemoryTokenStore::with_token("stale"), cell.clone());

        let status = store.restore(&CancellationToken::new()).await;

        assert_eq!(status, SessionStatus::Anonymous);
        assert_eq!(store.store.stored(), None);
        assert_eq!(cell.get(), None);
        assert_eq!(store.api.profile_calls.load(Ordering::SeqCst), 1);

        // A second restore now behaves like the no-credential case:
        // anonymous again, and no further profile fetch.
        let status = store.restore(&CancellationToken::new()).await;
        assert_eq!(status, SessionStatus::Anonymous);
        assert_eq!(store.api.profile_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn login_persists_token_and_commits_before_returning() {
        let api = FakeAuthApi {
            login_payload: Some(AuthPayload { token: "fresh".to_string(), user: ana() }),
            ..Default::default()
        };
        let cell = TokenCell::new();
        let store = SessionStore::new(api, MemoryTokenStore::default(), cell.clone());
        let mut rx = store.subscribe();

        let user = store
            .login("ana@x.com", "hunter42", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(user, ana());
        // The transition is already observable: no stale gate on return.
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.user, Some(ana()));
        assert_eq!(store.store.stored(), Some("fresh".to_string()));
        assert_eq!(cell.get(), Some("fresh".to_string()));
    }

    #[tokio::test]
    async fn rejected_login_surfaces_message_and_leaves_state_unchanged() {
        let api = FakeAuthApi::default(); // login always rejected
        let cell = TokenCell::new();
        let store = SessionStore::new(api, MemoryTokenStore::default(), cell.clone());
        store.restore(&CancellationToken::new()).await; // resolve to Anonymous

        let err = store
            .login("ana@x.com", "wrongpw", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(store.status(), SessionStatus::Anonymous);
        assert_eq!(store.store.stored(), None);
        assert_eq!(cell.get(), None);
        assert_snapshot_invariant(&store.snapshot());
    }

    #[tokio::test]
    async fn short_password_signup_never_reaches_network() {
        let api = FakeAuthApi {
            signup_payload: Some(AuthPayload { token: "t".to_string(), user: ana() }),
            ..Default::default()
        };
        let store = SessionStore::new(api, MemoryTokenStore::default(), TokenCell::new());
        let before = store.snapshot();

        let err = store
            .signup("Ana", "ana@x.com", "12345", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::PasswordTooShort));
        assert_eq!(store.api.signup_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn signup_with_valid_password_authenticates() {
        let api = FakeAuthApi {
            signup_payload: Some(AuthPayload { token: "t2".to_string(), user: ana() }),
            ..Default::default()
        };
        let store = SessionStore::new(api, MemoryTokenStore::default(), TokenCell::new());

        let user = store
            .signup("Ana", "ana@x.com", "123456", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(user, ana());
        assert_eq!(store.status(), SessionStatus::Authenticated);
        assert_eq!(store.store.stored(), Some("t2".to_string()));
    }

    #[tokio::test]
    async fn logout_clears_slot_and_subsequent_restore_is_network_silent() {
        let api = FakeAuthApi {
            login_payload: Some(AuthPayload { token: "fresh".to_string(), user: ana() }),
            profile_user: Some(ana()),
            ..Default::default()
        };
        let cell = TokenCell::new();
        let store = SessionStore::new(api, MemoryTokenStore::default(), cell.clone());

        store
            .login("ana@x.com", "hunter42", &CancellationToken::new())
            .await
            .unwrap();
        store.logout().await;

        assert_eq!(store.status(), SessionStatus::Anonymous);
        assert_eq!(store.store.stored(), None);
        assert_eq!(cell.get(), None);

        let status = store.restore(&CancellationToken::new()).await;
        assert_eq!(status, SessionStatus::Anonymous);
        assert_eq!(store.api.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_restore_does_not_overwrite_login() {
        let gate = Arc::new(Notify::new());
        let old_identity = User {
            id: "u0".to_string(),
            full_name: "Old".to_string(),
            email: "old@x.com".to_string(),
        };
        let api = FakeAuthApi {
            profile_user: Some(old_identity),
            login_payload: Some(AuthPayload { token: "fresh".to_string(), user: ana() }),
            profile_gate: Some(gate.clone()),
            ..Default::default()
        };
        let cell = TokenCell::new();
        let store = Arc::new(SessionStore::new(
            api,
            MemoryTokenStore::with_token("stale"),
            cell.clone(),
        ));

        // Restore starts first and parks inside the profile fetch.
        let restore_handle = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.restore(&CancellationToken::new()).await })
        };
        while store.api.profile_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Login lands while the restore is still in flight.
        store
            .login("ana@x.com", "hunter42", &CancellationToken::new())
            .await
            .unwrap();

        gate.notify_one();
        restore_handle.await.unwrap();

        // The stale restore result must not clobber the fresh login.
        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.user, Some(ana()));
        assert_eq!(store.store.stored(), Some("fresh".to_string()));
        assert_eq!(cell.get(), Some("fresh".to_string()));
    }

    #[tokio::test]
    async fn overlapping_restore_is_a_no_op() {
        let gate = Arc::new(Notify::new());
        let api = FakeAuthApi {
            profile_user: Some(ana()),
            profile_gate: Some(gate.clone()),
            ..Default::default()
        };
        let store = Arc::new(SessionStore::new(
            api,
            MemoryTokenStore::with_token("abc123"),
            TokenCell::new(),
        ));

        let first = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.restore(&CancellationToken::new()).await })
        };
        while store.api.profile_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Second call returns immediately without a second fetch.
        let status = store.restore(&CancellationToken::new()).await;
        assert_eq!(status, SessionStatus::Restoring);
        assert_eq!(store.api.profile_calls.load(Ordering::SeqCst), 1);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn cancelled_restore_writes_no_state() {
        let gate = Arc::new(Notify::new());
        let api = FakeAuthApi {
            profile_user: Some(ana()),
            profile_gate: Some(gate.clone()),
            ..Default::default()
        };
        let store = Arc::new(SessionStore::new(
            api,
            MemoryTokenStore::with_token("abc123"),
            TokenCell::new(),
        ));
        let cancel = CancellationToken::new();

        let handle = {
            let store = Arc::clone(&store);
            let cancel = cancel.clone();
            tokio::spawn(async move { store.restore(&cancel).await })
        };
        while store.api.profile_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // The owning view goes away mid-restore.
        cancel.cancel();
        gate.notify_one();
        handle.await.unwrap();

        assert_eq!(store.status(), SessionStatus::Restoring);
        assert_eq!(store.current_user(), None);
        // The persisted token is untouched as well.
        assert_eq!(store.store.stored(), Some("abc123".to_string()));
    }

    #[tokio::test]
    async fn cancelled_login_does_not_commit() {
        let api = FakeAuthApi {
            login_payload: Some(AuthPayload { token: "fresh".to_string(), user: ana() }),
            ..Default::default()
        };
        let store = SessionStore::new(api, MemoryTokenStore::default(), TokenCell::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        store.login("ana@x.com", "hunter42", &cancel).await.unwrap();

        assert_eq!(store.status(), SessionStatus::Restoring);
        assert_eq!(store.store.stored(), None);
    }
}
