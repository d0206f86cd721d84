//! Replaying adapter for the `Ui` port.
//!
//! Answers come from the cassette; everything shown is kept in a
//! transcript so tests can compare output.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{next_output, replay_result};
use crate::adapters::calls::{ChooseInput, ChooseManyInput, PromptInput};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::Ui;

const PORT: &str = "ui";

/// Lines shown through a [`ReplayingUi`].
pub type Transcript = Arc<Mutex<Vec<String>>>;

/// Serves recorded answers and captures shown output.
pub struct ReplayingUi {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
    transcript: Transcript,
}

impl ReplayingUi {
    /// Create a replaying UI backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>, transcript: Transcript) -> Self {
        Self {
            replayer: Some(replayer),
            transcript,
        }
    }

    /// Create a replaying UI with no cassette. Prompts panic; output is
    /// still captured.
    #[must_use]
    pub fn unconfigured(transcript: Transcript) -> Self {
        Self {
            replayer: None,
            transcript,
        }
    }

    fn answer<I: Serialize>(&self, method: &str, input: &I) -> serde_json::Value {
        next_output(self.replayer.as_ref(), PORT, method, input)
    }
}

impl Ui for ReplayingUi {
    fn choose(&self, prompt: &str, options: &[String]) -> Result<String, PortError> {
        replay_result(self.answer("choose", &ChooseInput { prompt, options }))
    }

    fn choose_many(
        &self,
        prompt: &str,
        options: &[String],
        default: &[String],
    ) -> Result<Vec<String>, PortError> {
        let input = ChooseManyInput {
            prompt,
            options,
            default,
        };
        replay_result(self.answer("choose_many", &input))
    }

    fn text(&self, prompt: &str) -> Result<String, PortError> {
        replay_result(self.answer("text", &PromptInput { prompt }))
    }

    fn show(&self, message: &str) {
        self.transcript
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(message.to_string());
    }
}
