//! # Input message module
//!
//! Every external producer updates the control exec through one of these messages. Each message
//! replaces the whole of the corresponding input, so the exec never sees a partial update.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal
use crate::eqpt::{
    dbw::StopSignal,
    lane::Lane,
    veh::{TwistCmd, VehPose, VehState},
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An input message.
///
/// In JSON the message is an object with a `"type"` string and a `"payload"`, for example
/// `{"type": "DBW", "payload": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum InputMsg {
    /// A new base lane. Expected once, or rarely.
    #[serde(rename = "LANE")]
    Lane(Lane),

    #[serde(rename = "POSE")]
    Pose(VehPose),

    /// Measured vehicle velocity
    #[serde(rename = "VEL")]
    State(VehState),

    /// Target twist from the path follower
    #[serde(rename = "TWIST")]
    Twist(TwistCmd),

    /// Stop waypoint index, `-1` for none
    #[serde(rename = "STOP")]
    Stop(StopSignal),

    /// Drive-by-wire engaged flag
    #[serde(rename = "DBW")]
    DbwEnabled(bool),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum InputParseError {
    #[error("Input contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Input has no \"type\" string")]
    MissingType,

    #[error("Input of type {0} could not be parsed: {1}")]
    InvalidPayload(String, serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputMsg {
    /// Parse a new input message from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, InputParseError> {
        // Parse into a generic value first so that a bad payload can be reported against its type
        let val: serde_json::Value = match serde_json::from_str(json_str) {
            Ok(v) => v,
            Err(e) => return Err(InputParseError::InvalidJson(e)),
        };

        let msg_type = match val["type"].as_str() {
            Some(s) => s.to_string(),
            None => return Err(InputParseError::MissingType),
        };

        serde_json::from_value(val).map_err(|e| InputParseError::InvalidPayload(msg_type, e))
    }

    /// Short name of the message type, as used on the wire.
    pub fn type_str(&self) -> &'static str {
        match self {
            InputMsg::Lane(_) => "LANE",
            InputMsg::Pose(_) => "POSE",
            InputMsg::State(_) => "VEL",
            InputMsg::Twist(_) => "TWIST",
            InputMsg::Stop(_) => "STOP",
            InputMsg::DbwEnabled(_) => "DBW",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_inputs() {
        let msg = InputMsg::from_json(r#"{"type": "DBW", "payload": true}"#).unwrap();
        assert_eq!(msg, InputMsg::DbwEnabled(true));

        let msg = InputMsg::from_json(r#"{"type": "STOP", "payload": -1}"#).unwrap();
        assert_eq!(msg, InputMsg::Stop(StopSignal::None));

        let msg = InputMsg::from_json(
            r#"{"type": "POSE", "payload": {"position_m": [1.5, -2.0]}}"#,
        )
        .unwrap();
        assert_eq!(msg, InputMsg::Pose(VehPose::new(1.5, -2.0)));

        let msg = InputMsg::from_json(
            r#"{"type": "TWIST", "payload": {"linear_ms": 11.1, "angular_rads": 0.05}}"#,
        )
        .unwrap();
        assert_eq!(msg.type_str(), "TWIST");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            InputMsg::from_json("{not json"),
            Err(InputParseError::InvalidJson(_))
        ));
        assert!(matches!(
            InputMsg::from_json(r#"{"payload": 3}"#),
            Err(InputParseError::MissingType)
        ));
        assert!(matches!(
            InputMsg::from_json(r#"{"type": "VEL", "payload": "fast"}"#),
            Err(InputParseError::InvalidPayload(t, _)) if t == "VEL"
        ));
    }
}
