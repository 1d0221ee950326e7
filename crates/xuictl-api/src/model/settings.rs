// ── Protocol settings block ──
//
// Arrives string-encoded inside an inbound. Only the fields every protocol
// shares are named; protocol-specific keys (shadowsocks `method`, socks
// `auth`, ...) survive in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::client::Client;
use super::json_string::{self, WireModel};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "json_string::null_as_default")]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub decryption: String,
    #[serde(default, deserialize_with = "json_string::null_as_default")]
    pub fallbacks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireModel for Settings {}

impl Settings {
    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self {
            clients,
            ..Self::default()
        }
    }
}
