//! Replays recorded interactions from a cassette.
//!
//! Interactions are queued per `(port, method)` channel, so a command may
//! interleave calls to different methods freely while calls to the same
//! method must come in recorded order.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// One `(port, method)` stream of interactions.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct Channel(String, String);

impl Channel {
    fn of(port: &str, method: &str) -> Self {
        Self(port.to_string(), method.to_string())
    }
}

#[derive(Debug, Default)]
struct Queue {
    interactions: Vec<Interaction>,
    served: usize,
}

/// Serves a cassette's interactions back in recorded order.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<Channel, Queue>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        Self::for_port(cassette, None)
    }

    /// Create a replayer serving only the interactions of one port.
    #[must_use]
    pub fn for_port(cassette: &Cassette, port: Option<&str>) -> Self {
        let mut queues: HashMap<Channel, Queue> = HashMap::new();
        for interaction in cassette
            .interactions
            .iter()
            .filter(|i| port.map_or(true, |p| p == i.port))
        {
            queues
                .entry(Channel::of(&interaction.port, &interaction.method))
                .or_default()
                .interactions
                .push(interaction.clone());
        }
        Self { queues }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics when the channel was never recorded or has been used up.
    /// Tests rely on this to prove a call was not made.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> &Interaction {
        if !self.queues.contains_key(&Channel::of(port, method)) {
            let mut recorded: Vec<String> = self
                .queues
                .keys()
                .map(|Channel(p, m)| format!("{p}::{m}"))
                .collect();

            recorded.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for {port}::{method}; \
                 recorded channels: [{}]",
                recorded.join(", ")
            );
        }
        let queue = self.queues.entry(Channel::of(port, method)).or_default();
        let Some(interaction) = queue.interactions.get(queue.served) else {
            panic!(
                "Cassette exhausted: {port}::{method} was called {} times but only {} \
                 interactions were recorded",
                queue.served + 1,
                queue.interactions.len(),
            );
        };
        queue.served += 1;
        interaction
    }

    /// Return the next interaction, checking the call's input against it.
    ///
    /// A recorded input of `null` accepts any input.
    ///
    /// # Panics
    ///
    /// Panics as [`Self::next_interaction`] does, and when the recorded
    /// input differs from `input`.
    pub fn expect_interaction(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> &Interaction {
        let interaction = self.next_interaction(port, method);
        assert!(
            interaction.input.is_null() || interaction.input == *input,
            "Cassette mismatch for {port}::{method} (seq {seq}): recorded input {recorded}, \
             called with {input}",
            seq = interaction.seq,
            recorded = interaction.input,
        );
        interaction
    }
}
