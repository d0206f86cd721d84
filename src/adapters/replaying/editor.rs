//! Replaying adapter for the `Editor` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::adapters::calls::PromptInput;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::Editor;

/// Serves recorded editor sessions from a cassette.
pub struct ReplayingEditor {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
}

impl ReplayingEditor {
    /// Create a replaying editor backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self {
            replayer: Some(replayer),
        }
    }

    /// Create a replaying editor with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl Editor for ReplayingEditor {
    fn input(&self, prompt: &str) -> Result<String, PortError> {
        replay_result(next_output(
            self.replayer.as_ref(),
            "editor",
            "input",
            &PromptInput { prompt },
        ))
    }
}
