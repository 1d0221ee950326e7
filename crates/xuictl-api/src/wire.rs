// Panel response envelope and its validator.
//
// Every JSON endpoint answers `{ "success": bool, "msg": "...", "obj": ... }`.
// `obj` only carries meaning when `success` is truthy.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Error;

/// Wire field names.
pub mod fields {
    pub const SUCCESS: &str = "success";
    pub const MSG: &str = "msg";
    pub const OBJ: &str = "obj";
    pub const SESSION_COOKIE: &str = "session";
    /// Sentinel `obj` returned by `clientIps` when nothing is recorded.
    pub const NO_IP_RECORD: &str = "No IP Record";
}

/// Decoded response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub obj: Option<Value>,
}

impl Envelope {
    /// Decode a body without checking the success flag.
    pub fn parse(body: &str) -> Result<Self, Error> {
        serde_json::from_str(body).map_err(|e| {
            let shown = preview(body);
            Error::Deserialization {
                message: format!("{e} (body preview: {shown:?})"),
                body: body.to_owned(),
            }
        })
    }

    /// Fail with [`Error::Api`] unless `success` is truthy.
    pub fn check(&self) -> Result<(), Error> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Api {
                message: self.msg.clone().unwrap_or_default(),
            })
        }
    }

    /// Move `obj` out, treating JSON `null` as absent.
    pub fn take_object(&mut self) -> Option<Value> {
        self.obj.take().filter(|v| !v.is_null())
    }
}

/// Validate a raw response body.
///
/// A body that is not a JSON object is a [`Error::Deserialization`]; a falsy
/// or missing `success` flag is an [`Error::Api`] carrying `msg` (empty when
/// absent), whatever `obj` holds.
pub fn validate(body: &str) -> Result<(), Error> {
    Envelope::parse(body)?.check()
}

/// The panel is loose about the flag's type; anything falsy fails.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

/// At most the first 200 bytes of a body, cut on a char boundary.
pub(crate) fn preview(body: &str) -> &str {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body;
    }
    let end = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn success_passes() {
        assert!(validate(r#"{"success": true, "msg": "", "obj": null}"#).is_ok());
        assert!(validate(r#"{"success": true}"#).is_ok());
    }

    #[test]
    fn failure_carries_message_regardless_of_obj() {
        for obj in ["null", "[]", r#"{"id": 1}"#, r#""text""#] {
            let body = format!(
                r#"{{"success": false, "msg": "Delete Failed: record not found", "obj": {obj}}}"#
            );
            match validate(&body) {
                Err(Error::Api { message }) => {
                    assert_eq!(message, "Delete Failed: record not found");
                }
                other => panic!("expected Api error for obj={obj}, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_flag_and_message() {
        match validate("{}") {
            Err(Error::Api { message }) => assert!(message.is_empty()),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn falsy_flags() {
        for flag in ["0", "\"\"", "null", "false"] {
            let body = format!(r#"{{"success": {flag}, "msg": "nope"}}"#);
            assert!(
                matches!(validate(&body), Err(Error::Api { .. })),
                "flag {flag} should be falsy"
            );
        }
        assert!(validate(r#"{"success": 1}"#).is_ok());
    }

    #[test]
    fn non_json_is_not_an_api_error() {
        let err = validate("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }), "got {err:?}");
        assert!(!err.is_logical());
    }

    #[test]
    fn take_object_drops_null() {
        let mut env = Envelope::parse(r#"{"success": true, "obj": null}"#).unwrap();
        assert!(env.take_object().is_none());

        let mut env = Envelope::parse(r#"{"success": true, "obj": ["a", "b"]}"#).unwrap();
        assert_eq!(env.take_object(), Some(serde_json::json!(["a", "b"])));
    }
}
