//! Session state: who is signed in, with which token and role.
//!
//! The session is an explicit object. [`SessionHandle`] is the shared
//! in-memory slot handed to the HTTP client (as its [`TokenSource`]) and to
//! the route guard; [`SessionManager`] is the only thing that mutates it, via
//! login, logout and restoration from durable storage.

use crate::constants::{DEFAULT_DISPLAY_NAME, LOGIN_ENDPOINT, TOKEN_KEY, USER_KEY};
use crate::error::{AdminError, Result};
use crate::providers::SessionStorage;
use arenaticket_client::types::{LoginRequest, LoginResponse, Role, UserRecord};
use arenaticket_client::{ApiClient, ApiError, TokenSource};
use std::sync::{Arc, PoisonError, RwLock};

/// Snapshot of the signed-in identity.
///
/// `user` and `token` are set and cleared together by [`SessionManager`];
/// a half-filled state is treated as signed out by every predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Signed-in user
    pub user: Option<UserRecord>,
    /// Bearer token
    pub token: Option<String>,
}

impl SessionState {
    /// Signed-in state.
    #[must_use]
    pub const fn signed_in(user: UserRecord, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
        }
    }

    /// Both user and token are present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// Neither user nor token is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user.is_none() && self.token.is_none()
    }

    /// Role of an authenticated session.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        if self.is_authenticated() {
            self.user.as_ref().map(|user| user.role)
        } else {
            None
        }
    }

    /// Authenticated and, unless `allowed` is empty, holding one of `allowed`.
    #[must_use]
    pub fn can_access_route(&self, allowed: &[Role]) -> bool {
        self.role()
            .is_some_and(|role| allowed.is_empty() || allowed.contains(&role))
    }

    /// Role is `ADMIN`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// Role is `PORTEIRO`.
    #[must_use]
    pub fn is_porteiro(&self) -> bool {
        self.role() == Some(Role::Porteiro)
    }

    /// Role is `VENDEDOR`.
    #[must_use]
    pub fn is_vendedor(&self) -> bool {
        self.role() == Some(Role::Vendedor)
    }

    /// User name, or "Administrador" when nobody is signed in.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map_or_else(|| DEFAULT_DISPLAY_NAME.to_string(), |user| user.name.clone())
    }
}

/// Shared in-memory session slot.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionHandle {
    /// Empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, state: SessionState) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

impl TokenSource for SessionHandle {
    fn bearer_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }
}

/// Outcome of [`SessionManager::restore_from_storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Token and user were read and applied.
    Restored,
    /// Nothing (or only half a session) was stored.
    Empty,
    /// Stored data was unreadable; storage was cleared.
    Corrupted,
}

/// Login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Login e-mail
    pub email: String,
    /// Password
    pub password: String,
}

/// Owner of the session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    handle: SessionHandle,
    storage: Arc<dyn SessionStorage>,
    api: ApiClient,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &self.handle.snapshot().user)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager.
    ///
    /// `api` should carry `handle` as its token source so that requests pick
    /// up login and logout immediately; see [`SessionManager::connect`].
    #[must_use]
    pub fn new(handle: SessionHandle, storage: Arc<dyn SessionStorage>, api: ApiClient) -> Self {
        Self {
            handle,
            storage,
            api,
        }
    }

    /// Create a fresh session wired into `api` as its token source.
    #[must_use]
    pub fn connect(api: ApiClient, storage: Arc<dyn SessionStorage>) -> Self {
        let handle = SessionHandle::new();
        let api = api.with_token_source(Arc::new(handle.clone()));
        Self::new(handle, storage, api)
    }

    /// The shared session slot.
    #[must_use]
    pub const fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// API client carrying this session's token.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.handle.snapshot()
    }

    /// Sign in.
    ///
    /// On success the token and user are written to durable storage first and
    /// then to memory. On failure the previous session is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::AuthenticationFailed` with the server's message
    /// when the login is refused. Transport and protocol failures come back
    /// as `AdminError::Transport` / `AdminError::Protocol` so callers can
    /// retry them. `AdminError::Storage` when the session cannot be persisted.
    pub async fn login(&self, credentials: Credentials) -> Result<UserRecord> {
        let request = LoginRequest {
            email: credentials.email,
            password: credentials.password,
        };
        let response: LoginResponse = self
            .api
            .post(LOGIN_ENDPOINT, &request)
            .await
            .map_err(|e| match e {
                ApiError::RequestFailed { message, .. } => {
                    tracing::warn!(email = %request.email, error = %message, "Login refused");
                    AdminError::AuthenticationFailed(message)
                },
                other => {
                    tracing::warn!(email = %request.email, error = %other, "Login request failed");
                    AdminError::from(other)
                },
            })?;

        let user_json = serde_json::to_string(&response.user)
            .map_err(|e| AdminError::Storage(e.to_string()))?;
        self.storage.set(TOKEN_KEY, &response.token)?;
        self.storage.set(USER_KEY, &user_json)?;

        self.handle
            .replace(SessionState::signed_in(response.user.clone(), response.token));
        tracing::info!(user = %response.user.email, role = %response.user.role, "Signed in");
        Ok(response.user)
    }

    /// Sign out. Clears memory and storage unconditionally; idempotent.
    pub fn logout(&self) {
        self.handle.replace(SessionState::default());
        self.clear_storage();
        tracing::info!("Signed out");
    }

    /// Load the session persisted by a previous run.
    ///
    /// Never fails: unreadable data clears storage and leaves the session
    /// empty.
    pub fn restore_from_storage(&self) -> RestoreOutcome {
        let stored = self
            .storage
            .get(TOKEN_KEY)
            .and_then(|token| Ok((token, self.storage.get(USER_KEY)?)));

        let (token, user_json) = match stored {
            Ok((Some(token), Some(user_json))) if !token.is_empty() => (token, user_json),
            Ok(_) => return RestoreOutcome::Empty,
            Err(e) => {
                tracing::warn!(error = %e, "Stored session unreadable, clearing");
                self.handle.replace(SessionState::default());
                self.clear_storage();
                return RestoreOutcome::Corrupted;
            },
        };

        match serde_json::from_str::<UserRecord>(&user_json) {
            Ok(user) => {
                tracing::debug!(user = %user.email, "Session restored from storage");
                self.handle.replace(SessionState::signed_in(user, token));
                RestoreOutcome::Restored
            },
            Err(e) => {
                let error = AdminError::StorageCorrupted(e.to_string());
                tracing::warn!(error = %error, "Stored user record unreadable, clearing");
                self.handle.replace(SessionState::default());
                self.clear_storage();
                RestoreOutcome::Corrupted
            },
        }
    }

    /// Both user and token are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    /// See [`SessionState::can_access_route`].
    #[must_use]
    pub fn can_access_route(&self, allowed: &[Role]) -> bool {
        self.snapshot().can_access_route(allowed)
    }

    /// Role is `ADMIN`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.snapshot().is_admin()
    }

    /// Role is `PORTEIRO`.
    #[must_use]
    pub fn is_porteiro(&self) -> bool {
        self.snapshot().is_porteiro()
    }

    /// Role is `VENDEDOR`.
    #[must_use]
    pub fn is_vendedor(&self) -> bool {
        self.snapshot().is_vendedor()
    }

    /// Signed-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<UserRecord> {
        self.snapshot().user
    }

    /// User name, or "Administrador" when nobody is signed in.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.snapshot().display_name()
    }

    fn clear_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "Could not clear stored session key");
            }
        }
    }
}
