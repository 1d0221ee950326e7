// ── Inbound (listening proxy endpoint) ──

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::Client;
use super::json_string::{self, WireModel};
use super::settings::Settings;
use super::sniffing::Sniffing;
use super::stream_settings::StreamSettings;

/// An inbound as returned by `panel/api/inbounds/list` and `get/{id}`.
///
/// `settings`, `streamSettings` and `sniffing` are accepted either as
/// objects or as JSON-encoded strings. Serializing with serde emits them as
/// objects; [`Inbound::to_wire_payload`] builds the string-encoded body the
/// add/update endpoints expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inbound {
    pub enable: bool,
    pub port: u16,
    pub protocol: String,
    #[serde(deserialize_with = "json_string::deserialize")]
    pub settings: Settings,
    #[serde(
        rename = "streamSettings",
        alias = "stream_settings",
        deserialize_with = "json_string::deserialize"
    )]
    pub stream_settings: StreamSettings,
    #[serde(deserialize_with = "json_string::deserialize")]
    pub sniffing: Sniffing,

    #[serde(default)]
    pub listen: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub up: i64,
    #[serde(default)]
    pub down: i64,
    #[serde(default)]
    pub total: i64,

    #[serde(default, rename = "expiryTime", alias = "expiry_time")]
    pub expiry_time: i64,
    #[serde(
        default,
        rename = "clientStats",
        alias = "client_stats",
        deserialize_with = "json_string::null_as_default"
    )]
    pub client_stats: Vec<Client>,

    #[serde(default)]
    pub tag: String,
}

impl WireModel for Inbound {}

/// Body of `inbounds/add` and `inbounds/update/{id}`.
#[derive(Serialize)]
struct InboundPayload<'a> {
    remark: &'a str,
    enable: bool,
    listen: &'a str,
    port: u16,
    protocol: &'a str,
    #[serde(rename = "expiryTime")]
    expiry_time: i64,
    #[serde(serialize_with = "json_string::serialize")]
    settings: &'a Settings,
    #[serde(rename = "streamSettings", serialize_with = "json_string::serialize")]
    stream_settings: &'a StreamSettings,
    #[serde(serialize_with = "json_string::serialize")]
    sniffing: &'a Sniffing,
}

impl Inbound {
    /// A new enabled inbound with all optional fields at their defaults.
    pub fn new(
        port: u16,
        protocol: impl Into<String>,
        settings: Settings,
        stream_settings: StreamSettings,
        sniffing: Sniffing,
    ) -> Self {
        Self {
            enable: true,
            port,
            protocol: protocol.into(),
            settings,
            stream_settings,
            sniffing,
            listen: String::new(),
            remark: String::new(),
            id: 0,
            up: 0,
            down: 0,
            total: 0,
            expiry_time: 0,
            client_stats: Vec::new(),
            tag: String::new(),
        }
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }

    /// The submission body: user-editable fields plus the three
    /// string-encoded blocks. Server-owned fields (id, traffic counters,
    /// clientStats, tag) are left out.
    pub fn to_wire_payload(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(InboundPayload {
            remark: &self.remark,
            enable: self.enable,
            listen: &self.listen,
            port: self.port,
            protocol: &self.protocol,
            expiry_time: self.expiry_time,
            settings: &self.settings,
            stream_settings: &self.stream_settings,
            sniffing: &self.sniffing,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn listed_inbound() -> Value {
        json!({
            "id": 1,
            "up": 5_368_709,
            "down": 17_179_869,
            "total": 0,
            "remark": "reality-443",
            "enable": true,
            "expiryTime": 0,
            "clientStats": [{
                "id": 1,
                "inboundId": 1,
                "enable": true,
                "email": "alhtim2x",
                "up": 0,
                "down": 0,
                "expiryTime": 0,
                "total": 0,
                "reset": 0
            }],
            "listen": "",
            "port": 443,
            "protocol": "vless",
            "settings": "{\n  \"clients\": [\n    {\n      \"id\": \"2d0f7c1e-6a0b-4d7e-9f3e-8c2b1a4d5e6f\",\n      \"flow\": \"xtls-rprx-vision\",\n      \"email\": \"alhtim2x\",\n      \"limitIp\": 0,\n      \"totalGB\": 0,\n      \"expiryTime\": 0,\n      \"enable\": true,\n      \"tgId\": \"\",\n      \"subId\": \"c5ps1qi6dzxqkab7\",\n      \"reset\": 0\n    }\n  ],\n  \"decryption\": \"none\",\n  \"fallbacks\": []\n}",
            "streamSettings": "{\n  \"network\": \"tcp\",\n  \"security\": \"reality\",\n  \"externalProxy\": [],\n  \"realitySettings\": {\n    \"show\": false,\n    \"dest\": \"yahoo.com:443\",\n    \"serverNames\": [\"yahoo.com\"]\n  },\n  \"tcpSettings\": {\n    \"acceptProxyProtocol\": false,\n    \"header\": {\"type\": \"none\"}\n  },\n  \"sockopt\": {\"tcpFastOpen\": true}\n}",
            "tag": "inbound-443",
            "sniffing": "{\n  \"enabled\": true,\n  \"destOverride\": [\"http\", \"tls\", \"quic\", \"fakedns\"],\n  \"metadataOnly\": false,\n  \"routeOnly\": false\n}"
        })
    }

    #[test]
    fn decodes_string_encoded_blocks() {
        let inbound = Inbound::from_wire(listed_inbound()).unwrap();

        assert_eq!(inbound.id, 1);
        assert_eq!(inbound.port, 443);
        assert_eq!(inbound.settings.clients.len(), 1);
        assert_eq!(inbound.settings.clients[0].flow, "xtls-rprx-vision");
        assert_eq!(inbound.settings.decryption, "none");
        assert_eq!(inbound.stream_settings.security, "reality");
        assert_eq!(inbound.stream_settings.tcp_settings["header"], json!({"type": "none"}));
        assert_eq!(inbound.stream_settings.extra["sockopt"], json!({"tcpFastOpen": true}));
        assert!(inbound.sniffing.enabled);
        assert_eq!(inbound.sniffing.dest_override.len(), 4);
        assert_eq!(inbound.client_stats[0].email, "alhtim2x");
    }

    #[test]
    fn object_and_string_forms_are_equivalent() {
        let mut decoded = listed_inbound();
        for key in ["settings", "streamSettings", "sniffing"] {
            let raw = decoded[key].as_str().unwrap().to_owned();
            decoded[key] = serde_json::from_str(&raw).unwrap();
        }
        assert_eq!(
            Inbound::from_wire(decoded).unwrap(),
            Inbound::from_wire(listed_inbound()).unwrap()
        );
    }

    #[test]
    fn settings_with_empty_clients_string() {
        let mut wire = listed_inbound();
        wire["settings"] = json!(r#"{"clients": []}"#);
        let inbound = Inbound::from_wire(wire).unwrap();
        assert!(inbound.settings.clients.is_empty());
    }

    #[test]
    fn null_client_stats() {
        let mut wire = listed_inbound();
        wire["clientStats"] = Value::Null;
        assert!(Inbound::from_wire(wire).unwrap().client_stats.is_empty());
    }

    #[test]
    fn missing_required_block_fails() {
        let mut wire = listed_inbound();
        wire.as_object_mut().unwrap().remove("sniffing");
        let err = Inbound::from_wire(wire).unwrap_err();
        assert!(err.to_string().contains("missing field `sniffing`"), "{err}");
    }

    #[test]
    fn wire_payload_encodes_blocks_as_strings() {
        let mut tcp = serde_json::Map::new();
        tcp.insert("acceptProxyProtocol".into(), json!(false));
        tcp.insert("header".into(), json!({"type": "none"}));
        let mut stream = StreamSettings::new("tcp", "reality");
        stream.tcp_settings = tcp;

        let inbound = Inbound::new(999, "vless", Settings::default(), stream, Sniffing::new(true))
            .with_remark("test3");
        let payload = inbound.to_wire_payload().unwrap();

        let mut keys: Vec<_> = payload.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "enable",
                "expiryTime",
                "listen",
                "port",
                "protocol",
                "remark",
                "settings",
                "sniffing",
                "streamSettings"
            ]
        );
        assert_eq!(payload["port"], json!(999));
        assert_eq!(payload["remark"], json!("test3"));

        let stream_back = StreamSettings::from_wire(payload["streamSettings"].clone()).unwrap();
        assert_eq!(stream_back, inbound.stream_settings);
        let sniffing_back = Sniffing::from_wire(payload["sniffing"].clone()).unwrap();
        assert_eq!(sniffing_back, inbound.sniffing);
        let settings_back = Settings::from_wire(payload["settings"].clone()).unwrap();
        assert_eq!(settings_back, inbound.settings);
    }
}
