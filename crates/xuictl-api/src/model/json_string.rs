//! Decode-then-validate adapter for string-encoded JSON.
//!
//! The panel stores several blocks (`settings`, `streamSettings`, `sniffing`)
//! as JSON documents serialized into a string, and returns them that way.
//! Before normal typed deserialization runs, a string value is tried as JSON;
//! if that fails the original string is handed on untouched so the usual
//! type or missing-field error is reported instead of a decode error.
//!
//! Use it on a field with
//! `#[serde(deserialize_with = "json_string::deserialize")]`, on a whole
//! payload through [`WireModel::from_wire`], and on the way out with
//! `#[serde(serialize_with = "json_string::serialize")]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Replace a JSON-encoded string with the value it encodes.
///
/// Non-string values and strings that are not valid JSON come back unchanged.
pub fn decode_json_string(value: Value) -> Value {
    match value {
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(decoded) => decoded,
            Err(_) => Value::String(raw),
        },
        other => other,
    }
}

/// Models whose wire payload may arrive string-encoded as a whole.
pub trait WireModel: DeserializeOwned {
    /// Run the string decode hook, then standard deserialization.
    fn from_wire(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(decode_json_string(value))
    }
}

/// Field deserializer: decode a string-encoded value, then validate it as `T`.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    T::deserialize(decode_json_string(value)).map_err(serde::de::Error::custom)
}

/// Field serializer: emit the value as a JSON document inside a string.
pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}

/// `null` on the wire reads as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Block {
        enabled: bool,
        #[serde(default, rename = "destOverride")]
        dest_override: Vec<String>,
    }

    impl WireModel for Block {}

    #[derive(Debug, Deserialize, Serialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize", serialize_with = "serialize")]
        block: Block,
    }

    #[test]
    fn structured_values_pass_through() {
        for value in [
            json!({"enabled": true}),
            json!([1, 2, 3]),
            json!(42),
            json!(null),
            json!(false),
        ] {
            assert_eq!(decode_json_string(value.clone()), value);
        }
    }

    #[test]
    fn strings_are_decoded() {
        assert_eq!(
            decode_json_string(json!(r#"{"clients": []}"#)),
            json!({"clients": []})
        );
        assert_eq!(decode_json_string(json!("[1,2]")), json!([1, 2]));
    }

    #[test]
    fn malformed_strings_fall_through() {
        assert_eq!(decode_json_string(json!("{not json")), json!("{not json"));
        assert_eq!(decode_json_string(json!("")), json!(""));
        assert_eq!(decode_json_string(json!("plain text")), json!("plain text"));
    }

    #[test]
    fn whole_payload_either_shape() {
        let as_object = Block::from_wire(json!({"enabled": true, "destOverride": ["http"]}));
        let as_string = Block::from_wire(json!(r#"{"enabled": true, "destOverride": ["http"]}"#));
        assert_eq!(as_object.unwrap(), as_string.unwrap());
    }

    #[test]
    fn field_either_shape() {
        let a: Holder = serde_json::from_value(json!({"block": {"enabled": true}})).unwrap();
        let b: Holder = serde_json::from_value(json!({"block": "{\"enabled\": true}"})).unwrap();
        assert_eq!(a.block, b.block);
    }

    #[test]
    fn malformed_field_reports_a_type_error() {
        let err = serde_json::from_value::<Holder>(json!({"block": "{enabled"})).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid type"), "unexpected error: {msg}");
    }

    #[test]
    fn missing_required_field_reports_missing_field() {
        let err = Block::from_wire(json!(r#"{"destOverride": []}"#)).unwrap_err();
        assert!(err.to_string().contains("missing field `enabled`"), "{err}");
    }

    #[test]
    fn encoded_field_round_trips() {
        let holder = Holder {
            block: Block {
                enabled: true,
                dest_override: vec!["http".into(), "tls".into()],
            },
        };
        let wire = serde_json::to_value(&holder).unwrap();
        assert!(wire["block"].is_string());

        let back: Holder = serde_json::from_value(wire).unwrap();
        assert_eq!(back.block, holder.block);
    }
}
