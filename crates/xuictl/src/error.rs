//! CLI error types with miette diagnostics.
//!
//! Maps `xuictl_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use xuictl_api::Error as ApiError;
use xuictl_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to panel at {url}")]
    #[diagnostic(
        code(xuictl::connection_failed),
        help(
            "Check that the panel is running and reachable, and that the URL\n\
             includes the panel's web base path if one is configured.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(xuictl::tls_error),
        help(
            "If the panel uses a self-signed certificate, pass --insecure (-k)\n\
             or configure ca_cert in your profile."
        )
    )]
    TlsError { reason: String },

    #[error("Request to {url} timed out after {attempts} attempt(s)")]
    #[diagnostic(
        code(xuictl::timeout),
        help("Increase --timeout or --retries, or check panel responsiveness.")
    )]
    Timeout { url: String, attempts: u32 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(xuictl::auth_failed),
        help(
            "Verify the panel username and password.\n\
             Store a password with: xuictl config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(xuictl::no_credentials),
        help(
            "Configure credentials with: xuictl config init\n\
             Or set XUI_USERNAME and XUI_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(xuictl::not_found),
        help("Run: xuictl {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Panel API ────────────────────────────────────────────────────
    #[error("Panel rejected the request: {message}")]
    #[diagnostic(code(xuictl::api_error))]
    Api { message: String },

    #[error("Panel returned HTTP {status}")]
    #[diagnostic(
        code(xuictl::http_status),
        help("A 404 here usually means the host is missing the panel's web base path.\n{body}")
    )]
    HttpStatus { status: u16, body: String },

    #[error("Unexpected response from panel: {message}")]
    #[diagnostic(code(xuictl::invalid_response))]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(xuictl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(xuictl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: xuictl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No panel configured")]
    #[diagnostic(
        code(xuictl::no_config),
        help(
            "Create a profile with: xuictl config init (expected at {path})\n\
             Or pass --host / set XUI_HOST."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(xuictl::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(xuictl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(xuictl::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── xuictl_api::Error → CliError ─────────────────────────────────────

fn transport_url(err: &xuictl_api::reqwest::Error) -> String {
    err.url().map_or_else(|| "(unknown)".into(), ToString::to_string)
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(e) if e.is_timeout() => CliError::Timeout {
                url: transport_url(&e),
                attempts: 1,
            },
            ApiError::Transport(e) => CliError::ConnectionFailed {
                url: transport_url(&e),
                source: Box::new(e),
            },
            ApiError::RetriesExhausted {
                attempts,
                url,
                source,
            } => {
                if source.is_timeout() {
                    CliError::Timeout { url, attempts }
                } else {
                    CliError::ConnectionFailed {
                        url,
                        source: Box::new(source),
                    }
                }
            }
            ApiError::Tls(reason) => CliError::TlsError { reason },
            ApiError::InvalidUrl(e) => CliError::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            ApiError::Authentication { message } => CliError::AuthFailed { message },
            ApiError::Status { status: 401, .. } => CliError::AuthFailed {
                message: "panel answered 401 Unauthorized".into(),
            },
            ApiError::Status { status, body } => CliError::HttpStatus { status, body },
            ApiError::Api { message } => CliError::Api { message },
            ApiError::Deserialization { message, .. } => CliError::InvalidResponse { message },
            ApiError::InvalidInput(reason) => CliError::Validation {
                field: "input".into(),
                reason,
            },
            ApiError::Runtime(e) => CliError::Io(e),
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "run `xuictl config profiles`".into(),
            },
            ConfigError::MissingEnv { var } => CliError::Validation {
                field: var,
                reason: "environment variable is not set".into(),
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_failures_map_to_exit_codes() {
        let cases = [
            (
                ApiError::Authentication {
                    message: "no session cookie".into(),
                },
                exit_code::AUTH,
            ),
            (
                ApiError::Status {
                    status: 401,
                    body: String::new(),
                },
                exit_code::AUTH,
            ),
            (
                ApiError::Api {
                    message: "Delete Failed".into(),
                },
                exit_code::GENERAL,
            ),
            (ApiError::Tls("bad cert".into()), exit_code::CONNECTION),
            (ApiError::InvalidInput("no inbound".into()), exit_code::USAGE),
        ];
        for (err, code) in cases {
            assert_eq!(CliError::from(err).exit_code(), code);
        }
    }

    #[test]
    fn config_failures_map_to_exit_codes() {
        let no_creds = CliError::from(ConfigError::NoCredentials {
            profile: "home".into(),
        });
        assert_eq!(no_creds.exit_code(), exit_code::AUTH);

        let missing = CliError::from(ConfigError::MissingEnv {
            var: "XUI_HOST".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::USAGE);
    }
}
