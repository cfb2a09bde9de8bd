//! Client-side authentication state.
//!
//! `Idle` exists only until [`SessionMachine::initialize`] runs; afterwards
//! the machine is always in exactly one of `Loading`, `Authenticated` or
//! `Unauthenticated`, and `Loading` only while the stored token is being
//! checked against `/api/auth/me`.
//!
//! Every operation comes in two shapes: an `async fn` that drives the whole
//! exchange, and `begin_*`/`finish_*` halves for the sauron update loop,
//! which issues the request inside a `Cmd` and applies the settled result
//! when its `Msg` comes back.

use shared::{AuthResponse, LoginRequest, RegisterRequest, User};
use std::rc::Rc;
use thiserror::Error;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::token_store::TokenStore;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Authenticated,
    Unauthenticated,
}

impl SessionStatus {
    /// Still waiting for the first decision about who the viewer is.
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionStatus::Idle | SessionStatus::Loading)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    Idle,
    Loading { token: String },
    Authenticated { token: String, user: User },
    Unauthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
}

impl AuthAction {
    fn fallback_message(&self) -> &'static str {
        match self {
            AuthAction::Login => "Login failed",
            AuthAction::Register => "Registration failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    Requested,
    Unauthorized,
    AuthFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    NoStoredToken,
    Restoring,
    Restored { username: String },
    RestoreFailed { error: String },
    StaleRestoreIgnored,
    Authenticated { action: AuthAction, username: String },
    AuthFailed { action: AuthAction, error: String },
    TokenNotPersisted { error: String },
    LoggedOut { reason: LogoutReason },
    UserReplaced { username: String },
}

/// Receives every session transition. Injected by whoever owns the machine.
pub trait SessionObserver {
    fn on_event(&self, event: &SessionEvent);
}

/// Failed login or registration: the raw error plus the text to show.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct AuthFailure {
    pub error: ApiError,
    pub message: String,
}

pub struct SessionMachine {
    state: SessionState,
    store: Rc<dyn TokenStore>,
    observer: Rc<dyn SessionObserver>,
    last_error: Option<String>,
}

impl SessionMachine {
    pub fn new(store: Rc<dyn TokenStore>, observer: Rc<dyn SessionObserver>) -> Self {
        Self {
            state: SessionState::Idle,
            store,
            observer,
            last_error: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Loading { .. } => SessionStatus::Loading,
            SessionState::Authenticated { .. } => SessionStatus::Authenticated,
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Loading { token } | SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// `api` carrying this session's bearer token, if any.
    pub fn client(&self, api: &ApiClient) -> ApiClient {
        api.with_bearer(self.token())
    }

    fn emit(&self, event: SessionEvent) {
        self.observer.on_event(&event);
    }

    /// Leaves `Idle`. Returns the stored token when it still has to be
    /// checked; `None` means the machine already settled (or was not idle).
    pub fn begin_initialize(&mut self) -> Option<String> {
        if self.state != SessionState::Idle {
            return None;
        }
        match self.store.read() {
            Some(token) => {
                self.emit(SessionEvent::Restoring);
                self.state = SessionState::Loading { token: token.clone() };
                Some(token)
            }
            None => {
                self.emit(SessionEvent::NoStoredToken);
                self.state = SessionState::Unauthenticated;
                None
            }
        }
    }

    pub fn finish_initialize(&mut self, result: Result<User, ApiError>) {
        let token = match std::mem::replace(&mut self.state, SessionState::Unauthenticated) {
            SessionState::Loading { token } => token,
            other => {
                self.state = other;
                self.emit(SessionEvent::StaleRestoreIgnored);
                return;
            }
        };
        match result {
            Ok(user) => {
                self.emit(SessionEvent::Restored { username: user.username.clone() });
                self.state = SessionState::Authenticated { token, user };
            }
            Err(error) => {
                self.store.clear();
                self.emit(SessionEvent::RestoreFailed { error: error.to_string() });
            }
        }
    }

    pub async fn initialize(&mut self, api: &ApiClient) {
        if let Some(token) = self.begin_initialize() {
            let result = api.with_bearer(Some(&token)).current_user().await;
            self.finish_initialize(result);
        }
    }

    /// Applies a settled login or registration reply. Success needs both a
    /// token and a user; anything else leaves the session unauthenticated.
    pub fn finish_auth(
        &mut self,
        action: AuthAction,
        result: Result<AuthResponse, ApiError>,
    ) -> Result<(), AuthFailure> {
        let outcome = result.and_then(|reply| match reply {
            AuthResponse { token: Some(token), user: Some(user) } if !token.is_empty() => Ok((token, user)),
            AuthResponse { user: Some(_), .. } => Err(ApiError::MalformedResponse("reply has no token".into())),
            AuthResponse { .. } => Err(ApiError::MalformedResponse("reply has no user".into())),
        });

        match outcome {
            Ok((token, user)) => {
                if let Err(e) = self.store.save(&token) {
                    self.emit(SessionEvent::TokenNotPersisted { error: e.to_string() });
                }
                self.emit(SessionEvent::Authenticated { action, username: user.username.clone() });
                self.state = SessionState::Authenticated { token, user };
                self.last_error = None;
                Ok(())
            }
            Err(error) => {
                self.end(LogoutReason::AuthFailed);
                let message = error.user_message(action.fallback_message());
                self.emit(SessionEvent::AuthFailed { action, error: error.to_string() });
                self.last_error = Some(message.clone());
                Err(AuthFailure { error, message })
            }
        }
    }

    pub async fn login(&mut self, api: &ApiClient, username: &str, password: &str) -> Result<(), AuthFailure> {
        let credentials = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let result = api.with_bearer(None).login(&credentials).await;
        self.finish_auth(AuthAction::Login, result)
    }

    pub async fn register(&mut self, api: &ApiClient, fields: &RegisterRequest) -> Result<(), AuthFailure> {
        let result = api.with_bearer(None).register(fields).await;
        self.finish_auth(AuthAction::Register, result)
    }

    /// Safe to call in any state; a second call changes nothing.
    pub fn logout(&mut self) {
        self.end(LogoutReason::Requested);
    }

    fn end(&mut self, reason: LogoutReason) {
        self.store.clear();
        if self.state != SessionState::Unauthenticated {
            self.state = SessionState::Unauthenticated;
            self.emit(SessionEvent::LoggedOut { reason });
        }
    }

    /// Forces a logout when an authenticated call came back 401. Returns
    /// whether it did; every other error leaves the session alone.
    pub fn handle_api_error(&mut self, error: &ApiError) -> bool {
        if !error.is_unauthorized() || !self.is_authenticated() {
            return false;
        }
        self.end(LogoutReason::Unauthorized);
        self.last_error = Some(SESSION_EXPIRED_MESSAGE.to_string());
        true
    }

    pub fn replace_user(&mut self, updated: User) {
        if let SessionState::Authenticated { user, .. } = &mut self.state {
            self.observer.on_event(&SessionEvent::UserReplaced { username: updated.username.clone() });
            *user = updated;
        }
    }
}
