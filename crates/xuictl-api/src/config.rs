// ── Runtime connection configuration ──
//
// Describes how to reach one panel: where it is, who to log in as, and how
// patient to be. Never touches disk; `xuictl-config` builds one and hands
// it in.

use std::time::Duration;

use secrecy::SecretString;

use crate::session::DEFAULT_MAX_RETRIES;
use crate::transport::{TlsMode, TransportConfig};

/// Configuration for connecting to a single panel.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Panel base URL including any web base path (e.g. `https://vpn.example.com:2053/panel`).
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Total attempts per request for transient failures.
    pub max_retries: u32,
    pub transport: TransportConfig,
}

impl PanelConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
            max_retries: DEFAULT_MAX_RETRIES,
            transport: TransportConfig::default(),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.transport.tls = tls;
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}
