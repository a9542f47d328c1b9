//! Device event model and Telldus wire encoding
//!
//! The simulated daemon speaks the telldusd client socket framing: strings are
//! length-prefixed as `<len>:<bytes>` and integers are encoded as `i<value>s`.
//! A raw device event is the `TDRawDeviceEvent` tag followed by a
//! semicolon-delimited `key:value;` payload and the originating controller id.
//!
//! Events are modeled as a typed record and serialized on demand, so tests can
//! vary attributes without reshaping the transport loop.

use serde::{Deserialize, Serialize};

/// Wire tag for raw device events.
pub const RAW_DEVICE_EVENT: &str = "TDRawDeviceEvent";

/// A single device-state-change event as reported by a TellStick controller.
///
/// Attribute order is fixed by the wire format; consumers regex-match the
/// payload positionally (`class:...;protocol:...;...;method:...;`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEvent {
    /// Event class, e.g. "command".
    #[serde(default = "default_class")]
    pub class: String,

    /// Radio protocol, e.g. "arctech".
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Device model, e.g. "selflearning".
    #[serde(default = "default_model")]
    pub model: String,

    /// House code of the transmitting remote.
    #[serde(default = "default_house")]
    pub house: String,

    /// Unit number within the house code.
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Group flag ("1" addresses the whole group).
    #[serde(default = "default_group")]
    pub group: String,

    /// Method, e.g. "turnon" or "turnoff".
    #[serde(default = "default_method")]
    pub method: String,

    /// Id of the controller that observed the event.
    #[serde(default = "default_controller_id")]
    pub controller_id: u32,
}

fn default_class() -> String {
    "command".to_string()
}

fn default_protocol() -> String {
    "arctech".to_string()
}

fn default_model() -> String {
    "selflearning".to_string()
}

fn default_house() -> String {
    "902538".to_string()
}

fn default_unit() -> String {
    "4".to_string()
}

fn default_group() -> String {
    "0".to_string()
}

fn default_method() -> String {
    "turnoff".to_string()
}

fn default_controller_id() -> u32 {
    1
}

impl Default for DeviceEvent {
    fn default() -> Self {
        Self {
            class: default_class(),
            protocol: default_protocol(),
            model: default_model(),
            house: default_house(),
            unit: default_unit(),
            group: default_group(),
            method: default_method(),
            controller_id: default_controller_id(),
        }
    }
}

impl DeviceEvent {
    /// Semicolon-delimited attribute payload, trailing `;` included.
    pub fn payload(&self) -> String {
        format!(
            "class:{};protocol:{};model:{};house:{};unit:{};group:{};method:{};",
            self.class, self.protocol, self.model, self.house, self.unit, self.group, self.method
        )
    }

    /// Encode the event as a complete wire line, newline-terminated.
    ///
    /// With default attributes this reproduces the telldusd output
    /// byte-for-byte:
    ///
    /// ```text
    /// 16:TDRawDeviceEvent93:class:command;protocol:arctech;model:selflearning;house:902538;unit:4;group:0;method:turnoff;i1s\n
    /// ```
    pub fn encode(&self) -> String {
        let mut line = String::new();
        line.push_str(&encode_str(RAW_DEVICE_EVENT));
        line.push_str(&encode_str(&self.payload()));
        line.push_str(&encode_int(self.controller_id));
        line.push('\n');
        line
    }
}

/// Encode a string in telldusd framing: `<byte-length>:<bytes>`.
pub fn encode_str(s: &str) -> String {
    format!("{}:{}", s.len(), s)
}

/// Encode an integer in telldusd framing: `i<value>s`.
pub fn encode_int(n: u32) -> String {
    format!("i{}s", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_LINE: &str = "16:TDRawDeviceEvent93:class:command;protocol:arctech;\
         model:selflearning;house:902538;unit:4;group:0;method:turnoff;i1s\n";

    #[test]
    fn test_encode_str_framing() {
        assert_eq!(encode_str("TDRawDeviceEvent"), "16:TDRawDeviceEvent");
        assert_eq!(encode_str(""), "0:");
    }

    #[test]
    fn test_encode_int_framing() {
        assert_eq!(encode_int(1), "i1s");
        assert_eq!(encode_int(42), "i42s");
    }

    #[test]
    fn test_default_event_matches_telldusd_literal() {
        assert_eq!(DeviceEvent::default().encode(), DEFAULT_LINE);
    }

    #[test]
    fn test_payload_length_prefix_tracks_overrides() {
        let event = DeviceEvent {
            method: "turnon".to_string(),
            ..DeviceEvent::default()
        };
        let line = event.encode();
        // "turnon" is one byte shorter than "turnoff"
        assert!(line.starts_with("16:TDRawDeviceEvent92:"));
        assert!(line.contains("method:turnon;"));
        assert!(line.ends_with("i1s\n"));
    }

    #[test]
    fn test_controller_id_suffix() {
        let event = DeviceEvent {
            controller_id: 7,
            ..DeviceEvent::default()
        };
        assert!(event.encode().ends_with("i7s\n"));
    }

    #[test]
    fn test_deserialize_partial_overrides() {
        let event: DeviceEvent = serde_json::from_str(r#"{"house":"12345"}"#).unwrap();
        assert_eq!(event.house, "12345");
        assert_eq!(event.class, "command");
        assert_eq!(event.controller_id, 1);
    }
}
