use thiserror::Error;

/// Top-level error type for the `xuictl-api` crate.
///
/// Transient transport failures and logical API failures are distinct
/// variants so the retry loop can dispatch on kind alone.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login call completed but the panel set no `session` cookie.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error that is not worth retrying (builder error,
    /// body read failure, redirect loop, ...).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Every attempt in the retry budget hit a transient transport failure.
    #[error("Max retries ({attempts}) exceeded for {url}: {source}")]
    RetriesExhausted {
        attempts: u32,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Panel API ───────────────────────────────────────────────────
    /// The envelope reported `success: false`.
    #[error("API request failed with message: {message}")]
    Api { message: String },

    /// The panel answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Caller-supplied data cannot be sent as-is.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ── Blocking facade ─────────────────────────────────────────────
    /// The private runtime behind `blocking::Api` could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl Error {
    /// Returns `true` if this is a transient transport failure worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => is_transient_transport(e),
            _ => false,
        }
    }

    /// Returns `true` if the panel understood the request and rejected it.
    pub fn is_logical(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Status { .. })
    }

    /// Returns `true` if this failure came from the login handshake.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Status { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// The server-provided message for logical failures.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message } => Some(message),
            _ => None,
        }
    }
}

/// Connect errors and timeouts are the only transport failures we retry.
pub(crate) fn is_transient_transport(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_errors_are_not_transient() {
        let api = Error::Api {
            message: "Delete Failed: record not found".into(),
        };
        assert!(api.is_logical());
        assert!(!api.is_transient());
        assert_eq!(api.api_message(), Some("Delete Failed: record not found"));

        let status = Error::Status {
            status: 404,
            body: String::new(),
        };
        assert!(status.is_logical());
        assert!(!status.is_transient());
    }

    #[test]
    fn authentication_is_its_own_kind() {
        let err = Error::Authentication {
            message: "no session cookie".into(),
        };
        assert!(err.is_auth_failure());
        assert!(!err.is_logical());
        assert!(err.to_string().contains("no session cookie"));
    }
}
