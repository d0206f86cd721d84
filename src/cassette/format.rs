//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (e.g. "tracker", "ui", "editor").
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port; `null` matches any input on replay.
    #[serde(default)]
    pub input: serde_json::Value,
    /// Output data returned from the port.
    #[serde(default)]
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Tracker the interactions were recorded against.
    pub server: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_input_reads_as_wildcard() {
        let yaml = "\
name: hand-written
recorded_at: 2024-05-01T12:00:00Z
server: https://bugzilla.example.org/
interactions:
  - seq: 0
    port: tracker
    method: fields
    output:
      Ok: []
";
        let cassette: Cassette = serde_yaml::from_str(yaml).expect("deserialize");
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].input, serde_json::Value::Null);
        assert_eq!(cassette.interactions[0].output, json!({"Ok": []}));
    }
}
