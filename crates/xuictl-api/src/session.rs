// Session state shared between sibling sub-clients.
//
// One `Session` handle is created per logical panel connection and cloned
// into the inbound, client and database sub-clients. A login through any of
// them updates the token every other handle sees.

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};

/// Default total attempts per request (first try included).
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Host, credentials, session token and retry budget for one panel.
#[derive(Debug)]
struct SessionState {
    host: String,
    username: String,
    password: SecretString,
    session_token: Option<SecretString>,
    max_retries: u32,
}

/// Cloneable handle to shared session state.
///
/// The lock only makes the handle `Send + Sync`. Callers sharing one handle
/// across concurrent flows get no ordering guarantees between a re-login and
/// in-flight requests.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl Session {
    /// Create unauthenticated session state.
    ///
    /// Trailing slashes are stripped from `host`; nothing else is checked.
    pub fn new(host: &str, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState {
                host: normalize_host(host),
                username: username.into(),
                password,
                session_token: None,
                max_retries: DEFAULT_MAX_RETRIES,
            })),
        }
    }

    pub fn host(&self) -> String {
        self.read().host.clone()
    }

    pub fn username(&self) -> String {
        self.read().username.clone()
    }

    pub fn password(&self) -> SecretString {
        self.read().password.clone()
    }

    /// The current session cookie value, if logged in.
    pub fn session_token(&self) -> Option<SecretString> {
        self.read().session_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session_token.is_some()
    }

    pub(crate) fn set_session_token(&self, token: SecretString) {
        self.write().session_token = Some(token);
    }

    pub(crate) fn clear_session_token(&self) {
        self.write().session_token = None;
    }

    /// Total attempts per request, first try included.
    pub fn max_retries(&self) -> u32 {
        self.read().max_retries
    }

    /// Change the retry budget. Values below 1 are clamped to 1.
    pub fn set_max_retries(&self, value: u32) {
        self.write().max_retries = value.max(1);
    }

    /// `session=<token>` for the `Cookie` header, when a token is held.
    pub(crate) fn cookie_header(&self) -> Option<String> {
        self.read()
            .session_token
            .as_ref()
            .map(|token| format!("session={}", token.expose_secret()))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner.read().expect("session lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner.write().expect("session lock poisoned")
    }
}

fn normalize_host(host: &str) -> String {
    host.trim_end_matches('/').to_owned()
}
