// ── Client record ──
//
// One entry of an inbound's `settings.clients` list, and also the shape
// of the per-client traffic rows in `clientStats`. The two views overlap:
// traffic rows carry a numeric `id` and `inboundId`, settings entries a
// UUID (or password for trojan/shadowsocks) and the provisioning fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::json_string::WireModel;

/// An identifier the panel emits either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Numeric(i64),
    Text(String),
}

impl FlexibleId {
    fn zero() -> Self {
        Self::Numeric(0)
    }

    fn empty() -> Self {
        Self::Text(String::new())
    }

    fn is_zero(&self) -> bool {
        matches!(self, Self::Numeric(0))
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl Default for FlexibleId {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for FlexibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FlexibleId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FlexibleId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FlexibleId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

/// A client provisioned on an inbound.
///
/// Serializing drops every field still equal to its default, which is the
/// shape `addClient` / `updateClient` expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default = "FlexibleId::zero", skip_serializing_if = "FlexibleId::is_zero")]
    pub id: FlexibleId,
    pub email: String,
    pub enable: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(
        default,
        rename = "inboundId",
        alias = "inbound_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub inbound_id: Option<i64>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub up: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub down: i64,
    /// Unix milliseconds; 0 = never, negative = relative from first use.
    #[serde(
        default,
        rename = "expiryTime",
        alias = "expiry_time",
        skip_serializing_if = "is_zero"
    )]
    pub expiry_time: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total: i64,
    /// Auto-reset period in days.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub reset: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flow: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(
        default,
        rename = "limitIp",
        alias = "limit_ip",
        skip_serializing_if = "is_zero"
    )]
    pub limit_ip: i64,
    #[serde(
        default,
        rename = "subId",
        alias = "sub_id",
        skip_serializing_if = "String::is_empty"
    )]
    pub sub_id: String,
    #[serde(
        default = "FlexibleId::empty",
        rename = "tgId",
        alias = "tg_id",
        skip_serializing_if = "FlexibleId::is_empty"
    )]
    pub tg_id: FlexibleId,
    /// Traffic quota in bytes; 0 = unlimited.
    #[serde(
        default,
        rename = "totalGB",
        alias = "total_gb",
        skip_serializing_if = "is_zero"
    )]
    pub total_gb: i64,
    /// Fields this model does not name, kept for read-modify-send.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireModel for Client {}

impl Client {
    /// A client with only the required fields set.
    pub fn new(email: impl Into<String>, enable: bool) -> Self {
        Self {
            id: FlexibleId::zero(),
            email: email.into(),
            enable,
            password: String::new(),
            inbound_id: None,
            up: 0,
            down: 0,
            expiry_time: 0,
            total: 0,
            reset: 0,
            flow: String::new(),
            method: String::new(),
            limit_ip: 0,
            sub_id: String::new(),
            tg_id: FlexibleId::empty(),
            total_gb: 0,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<FlexibleId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_inbound_id(mut self, inbound_id: i64) -> Self {
        self.inbound_id = Some(inbound_id);
        self
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &i64) -> bool {
    *n == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn traffic_row() {
        let client = Client::from_wire(json!({
            "id": 1,
            "inboundId": 1,
            "enable": true,
            "email": "alhtim2x",
            "up": 1024,
            "down": 2048,
            "expiryTime": 0,
            "total": 0,
            "reset": 0
        }))
        .unwrap();

        assert_eq!(client.id, FlexibleId::Numeric(1));
        assert_eq!(client.inbound_id, Some(1));
        assert_eq!(client.email, "alhtim2x");
        assert_eq!(client.down, 2048);
        assert!(client.extra.is_empty());
    }

    #[test]
    fn settings_entry_keeps_unknown_fields() {
        let client = Client::from_wire(json!({
            "id": "b7a3c0d2-3a43-4e1e-9d52-4d1f2f2f8a11",
            "email": "user@example",
            "enable": true,
            "flow": "xtls-rprx-vision",
            "limitIp": 2,
            "totalGB": 10_737_418_240_i64,
            "tgId": 123_456,
            "subId": "s9k2",
            "comment": "vip"
        }))
        .unwrap();

        assert_eq!(client.id.to_string(), "b7a3c0d2-3a43-4e1e-9d52-4d1f2f2f8a11");
        assert_eq!(client.tg_id, FlexibleId::Numeric(123_456));
        assert_eq!(client.limit_ip, 2);
        assert_eq!(client.extra.get("comment"), Some(&json!("vip")));
    }

    #[test]
    fn serialization_omits_defaults() {
        let client = Client::new("test", true).with_id("6f0e9d2a");
        let wire = serde_json::to_value(&client).unwrap();
        assert_eq!(wire, json!({"id": "6f0e9d2a", "email": "test", "enable": true}));
    }

    #[test]
    fn accepts_programmatic_names() {
        let client: Client = serde_json::from_value(json!({
            "email": "a",
            "enable": false,
            "inbound_id": 3,
            "total_gb": 5
        }))
        .unwrap();
        assert_eq!(client.inbound_id, Some(3));
        assert_eq!(client.total_gb, 5);
    }
}
