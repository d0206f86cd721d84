//! Replaying adapters that serve recorded interactions.

pub mod editor;
pub mod tracker;
pub mod ui;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

pub use editor::ReplayingEditor;
pub use tracker::ReplayingBugTracker;
pub use ui::ReplayingUi;

/// Take the recorded output of the next `port::method` call.
///
/// # Panics
///
/// Panics if no cassette was configured for the port, if the cassette is
/// exhausted, or if the recorded input does not match `input`.
pub(crate) fn next_output<I: Serialize>(
    replayer: Option<&Arc<Mutex<CassetteReplayer>>>,
    port: &str,
    method: &str,
    input: &I,
) -> serde_json::Value {
    let Some(replayer) = replayer else {
        panic!(
            "no cassette configured for port {port:?} (called {method:?})"
        );
    };
    let input = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let mut guard = replayer
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    guard
        .expect_interaction(port, method, &input)
        .output
        .clone()
}

/// Decode a recorded `Result` using the Ok/Err JSON convention.
///
/// Mirror of `recording::record_result`.
///
/// # Errors
///
/// Returns the recorded error message, or a decoding error if the output
/// does not fit `T`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, PortError> {
    match output {
        serde_json::Value::Object(mut map) if map.contains_key("Ok") => {
            let value = map.remove("Ok").unwrap_or_default();
            Ok(serde_json::from_value(value)?)
        }
        serde_json::Value::Object(map) if map.contains_key("Err") => {
            let message = match map.get("Err") {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            Err(message.into())
        }
        other => Err(format!("malformed recorded output: {other}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_output_decodes() {
        let value: Vec<u32> = replay_result(json!({"Ok": [1, 2]})).unwrap();
        assert_eq!(value, [1, 2]);
    }

    #[test]
    fn unit_ok_decodes_from_null() {
        replay_result::<()>(json!({"Ok": null})).unwrap();
    }

    #[test]
    fn err_output_keeps_message() {
        let err = replay_result::<()>(json!({"Err": "Bug #9 does not exist."})).unwrap_err();
        assert_eq!(err.to_string(), "Bug #9 does not exist.");
    }

    #[test]
    fn other_shapes_are_rejected() {
        assert!(replay_result::<u32>(json!(5)).is_err());
    }
}
