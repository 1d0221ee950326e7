// ── Traffic sniffing block ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::json_string::WireModel;

/// Sniffing rules for an inbound. Arrives string-encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sniffing {
    pub enabled: bool,
    #[serde(default, rename = "destOverride", alias = "dest_override")]
    pub dest_override: Vec<String>,
    #[serde(default, rename = "metadataOnly", alias = "metadata_only")]
    pub metadata_only: bool,
    #[serde(default, rename = "routeOnly", alias = "route_only")]
    pub route_only: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireModel for Sniffing {}

impl Sniffing {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }
}
