//! The permissive half of the two-step envelope decode (§3.1, §9 "Dynamic
//! 'extras allowed' on the envelope"): parse the header and just enough of
//! the message to route and gate the line, leaving the rest as a raw JSON
//! value for the strict per-event decode once the dataset is known.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub header: Header,
    pub message: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct Header {
    #[serde(rename = "uploaderID")]
    pub uploader_id: String,
    pub gameversion: Option<String>,
    pub gamebuild: Option<String>,
    #[serde(rename = "softwareName")]
    pub software_name: String,
    #[serde(rename = "softwareVersion")]
    pub software_version: String,
    #[serde(rename = "gatewayTimestamp")]
    pub gateway_timestamp: Option<String>,
}

/// Just the fields the gate and dispatcher need before a strict decode:
/// the event tag, its timestamp, and the horizons/odyssey flags (§3.1).
#[derive(Debug, Deserialize)]
pub struct MessageHeader {
    pub event: String,
    pub timestamp: String,
    #[serde(default)]
    pub horizons: bool,
    #[serde(default)]
    pub odyssey: bool,
}

impl MessageHeader {
    /// An envelope is processable iff both horizons and odyssey are true
    /// (§3.1); otherwise it is skipped, not failed.
    pub fn is_processable(&self) -> bool {
        self.horizons && self.odyssey
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_header_defaults_flags_to_false() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"event":"Scan","timestamp":"2026-01-01T00:00:00Z"}"#)
                .unwrap();
        let header: MessageHeader = serde_json::from_value(value).unwrap();
        assert!(!header.is_processable());
    }

    #[test]
    fn message_header_processable_requires_both_flags() {
        let value: serde_json::Value = serde_json::from_str(
            r#"{"event":"Scan","timestamp":"2026-01-01T00:00:00Z","horizons":true,"odyssey":false}"#,
        )
        .unwrap();
        let header: MessageHeader = serde_json::from_value(value).unwrap();
        assert!(!header.is_processable());
    }
}
