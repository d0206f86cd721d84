//! Records interactions into a cassette file.
//!
//! Recording adapters push one interaction per port call; the session
//! writes the file once the command has finished.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Records interactions and writes them as a YAML cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    server: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Create a new recorder that will write to the given path.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        server: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            server: server.into(),
            interactions: Vec::new(),
        }
    }

    /// Append an interaction, numbered after the ones already recorded.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Stop recording and return the cassette without writing it.
    #[must_use]
    pub fn into_cassette(self) -> Cassette {
        Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            server: self.server,
            interactions: self.interactions,
        }
    }

    /// Finish recording and write the cassette YAML file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let path = self.path.clone();
        tracing::debug!(path = %path.display(), interactions = self.len(), "writing cassette");
        let yaml = serde_yaml::to_string(&self.into_cassette())
            .map_err(std::io::Error::other)?;
        std::fs::write(&path, yaml)?;
        Ok(path)
    }
}
