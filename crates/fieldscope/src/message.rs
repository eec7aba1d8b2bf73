//! Custom messages sent by the host over the side channel.

use fieldscope_core::{Axis, FieldscopeError, Result};
use serde::Deserialize;
use serde_json::Value;

/// The recognized custom messages, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CustomMessage {
    /// Log the payload at debug level.
    Debug {
        #[serde(default)]
        msg: Value,
    },
    /// Log the payload at error level.
    Error {
        #[serde(default)]
        msg: Value,
    },
    /// Rebuild the scene from `model_data`.
    Refresh,
    /// Restore the default camera framing.
    Reset,
    /// Look along `axis` from the `dir` side.
    Axis { axis: Axis, dir: f32 },
    /// Ask the host for a file to load.
    Upload,
}

impl CustomMessage {
    const TYPES: [&'static str; 6] = ["debug", "error", "refresh", "reset", "axis", "upload"];

    /// Parses a raw message.
    ///
    /// A `type` outside the recognized set is [`FieldscopeError::UnknownMessageType`];
    /// a recognized type with an unusable payload is [`FieldscopeError::InvalidMessage`].
    pub fn parse(value: &Value) -> Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| FieldscopeError::InvalidMessage(format!("no message type in {value}")))?;
        if !Self::TYPES.contains(&kind) {
            return Err(FieldscopeError::UnknownMessageType(kind.to_string()));
        }
        Self::deserialize(value).map_err(|e| FieldscopeError::InvalidMessage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_known_messages() {
        assert_eq!(
            CustomMessage::parse(&json!({"type": "axis", "axis": "Y", "dir": -1})).unwrap(),
            CustomMessage::Axis {
                axis: Axis::Y,
                dir: -1.0
            }
        );
        assert_eq!(
            CustomMessage::parse(&json!({"type": "debug", "msg": "hi"})).unwrap(),
            CustomMessage::Debug { msg: json!("hi") }
        );
        assert_eq!(
            CustomMessage::parse(&json!({"type": "reset"})).unwrap(),
            CustomMessage::Reset
        );
    }

    #[test]
    fn test_unknown_type() {
        let err = CustomMessage::parse(&json!({"type": "explode"})).unwrap_err();
        assert!(matches!(err, FieldscopeError::UnknownMessageType(t) if t == "explode"));
    }

    #[test]
    fn test_bad_payloads() {
        assert!(matches!(
            CustomMessage::parse(&json!({"type": "axis", "axis": "W", "dir": 1})),
            Err(FieldscopeError::InvalidMessage(_))
        ));
        assert!(matches!(
            CustomMessage::parse(&json!({"msg": "no type"})),
            Err(FieldscopeError::InvalidMessage(_))
        ));
    }
}
