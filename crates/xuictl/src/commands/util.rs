//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use chrono::{Duration, Utc};

use xuictl_api::FlexibleId;

use crate::error::CliError;

const GIB: u64 = 1024 * 1024 * 1024;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// GiB on the command line, bytes on the wire.
pub fn gib_to_bytes(gib: u64) -> Result<i64, CliError> {
    i64::try_from(gib.saturating_mul(GIB)).map_err(|_| CliError::Validation {
        field: "total-gb".into(),
        reason: format!("{gib} GiB is too large"),
    })
}

/// Absolute expiry in Unix milliseconds, `days` from now. 0 = never.
pub fn expiry_from_days(days: u32) -> i64 {
    if days == 0 {
        return 0;
    }
    (Utc::now() + Duration::days(i64::from(days))).timestamp_millis()
}

/// Numeric Telegram IDs go out as numbers, anything else as text.
pub fn parse_tg_id(raw: &str) -> FlexibleId {
    raw.parse::<i64>()
        .map_or_else(|_| FlexibleId::from(raw), FlexibleId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_conversion() {
        assert!(matches!(gib_to_bytes(0), Ok(0)));
        assert!(matches!(gib_to_bytes(5), Ok(5_368_709_120)));
        assert!(gib_to_bytes(u64::MAX).is_err());
    }

    #[test]
    fn expiry_is_in_the_future() {
        assert_eq!(expiry_from_days(0), 0);
        assert!(expiry_from_days(30) > Utc::now().timestamp_millis());
    }

    #[test]
    fn tg_id_shape() {
        assert_eq!(parse_tg_id("12345"), FlexibleId::Numeric(12345));
        assert_eq!(parse_tg_id("@someone"), FlexibleId::Text("@someone".into()));
    }
}
