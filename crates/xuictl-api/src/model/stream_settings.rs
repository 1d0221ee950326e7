// ── Transport / security block ──
//
// Arrives string-encoded. The per-transport blocks are kept as raw JSON
// objects because their shape depends on `network` and `security`; blocks
// this model does not name (wsSettings, grpcSettings, sockopt, ...) are
// preserved in `extra` so an update never drops them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::json_string::WireModel;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSettings {
    #[serde(default)]
    pub security: String,
    #[serde(default)]
    pub network: String,
    #[serde(
        default,
        rename = "tcpSettings",
        alias = "tcp_settings",
        skip_serializing_if = "Map::is_empty"
    )]
    pub tcp_settings: Map<String, Value>,
    #[serde(
        default,
        rename = "externalProxy",
        alias = "external_proxy",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub external_proxy: Vec<Value>,
    #[serde(
        default,
        rename = "realitySettings",
        alias = "reality_settings",
        skip_serializing_if = "Map::is_empty"
    )]
    pub reality_settings: Map<String, Value>,
    #[serde(
        default,
        rename = "xtlsSettings",
        alias = "xtls_settings",
        skip_serializing_if = "Map::is_empty"
    )]
    pub xtls_settings: Map<String, Value>,
    #[serde(
        default,
        rename = "tlsSettings",
        alias = "tls_settings",
        skip_serializing_if = "Map::is_empty"
    )]
    pub tls_settings: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireModel for StreamSettings {}

impl StreamSettings {
    pub fn new(network: impl Into<String>, security: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            security: security.into(),
            ..Self::default()
        }
    }
}
