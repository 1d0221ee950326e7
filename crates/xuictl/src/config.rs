//! CLI configuration: thin wrapper around `xuictl_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--host, --username, --password, --insecure, --timeout, --retries).

use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;

use xuictl_api::{PanelConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use xuictl_config::{
    Config, Defaults, Profile, config_path, delete_password, load_config_or_default, save_config,
    store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a `Profile` + global flags into a `PanelConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<PanelConfig, CliError> {
    // 1. Host (flag > env > profile)
    let host = global.host.clone().unwrap_or_else(|| profile.host.clone());

    // 2. Credentials (flag > shared chain)
    let username = match global.username {
        Some(ref u) => u.clone(),
        None => xuictl_config::resolve_username(profile, profile_name)?,
    };
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => xuictl_config::resolve_password(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    // 4. Timeout and retry budget
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);
    let max_retries = global
        .retries
        .or(profile.max_retries)
        .unwrap_or(defaults.max_retries);

    Ok(PanelConfig::new(host, username, password)
        .with_tls(tls)
        .with_timeout(Duration::from_secs(timeout))
        .with_max_retries(max_retries))
}

/// Build a `PanelConfig` from the config file, profile, and CLI overrides.
pub fn build_panel_config(global: &GlobalOpts) -> Result<PanelConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        debug!(profile = %profile_name, "using profile");
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    // No profile -- flags / XUI_* env vars alone
    if global.host.is_none() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    debug!("no profile found, using flags and environment");
    let ad_hoc = Profile {
        host: global.host.clone().unwrap_or_default(),
        ..Profile::default()
    };
    resolve_profile(&ad_hoc, &profile_name, &cfg.defaults, global)
}
