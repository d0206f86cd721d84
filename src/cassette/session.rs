//! Recording session for tracker interactions.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;
use crate::error::{Error, Result};

/// File name of the tracker cassette inside a session directory.
pub const TRACKER_CASSETTE: &str = "tracker.cassette.yaml";

/// Owns the recorder for one recording session.
///
/// Cassettes are stored in a timestamped directory below the requested
/// root so repeated runs never overwrite each other.
pub struct RecordingSession {
    /// Recorder for tracker interactions.
    pub tracker: Arc<Mutex<CassetteRecorder>>,
    /// Output directory containing the cassette files.
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session directory already exists
    /// - The directory cannot be created
    pub fn new(root: &Path, server: &str) -> Result<Self> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(Error::Config(format!(
                "cassette directory already exists: {}",
                output_dir.display()
            )));
        }

        std::fs::create_dir_all(&output_dir).map_err(|source| Error::Io {
            context: format!("creating {}", output_dir.display()),
            source,
        })?;

        let recorder = CassetteRecorder::new(
            output_dir.join(TRACKER_CASSETTE),
            format!("{timestamp}-tracker"),
            server,
        );
        Ok(Self {
            tracker: Arc::new(Mutex::new(recorder)),
            output_dir,
        })
    }

    /// Finish recording and write the cassette files to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if a recording adapter is still alive or the
    /// cassette cannot be written.
    pub fn finish(self) -> Result<PathBuf> {
        let recorder = Arc::try_unwrap(self.tracker)
            .map_err(|_| {
                Error::Config("recording adapter for tracker still has references".into())
            })?
            .into_inner()
            .map_err(|e| Error::Config(format!("recorder lock for tracker poisoned: {e}")))?;
        recorder.finish().map_err(|source| Error::Io {
            context: "writing tracker cassette".into(),
            source,
        })?;
        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://bugzilla.example.org/";

    #[test]
    fn session_creates_output_directory_and_finishes() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(root.path(), URL).unwrap();
        let dir = session.output_dir.clone();
        assert!(dir.exists(), "Output directory should exist after new()");

        session
            .tracker
            .lock()
            .unwrap()
            .record("tracker", "fields", json!({}), json!({"Ok": []}));

        let written = session.finish().unwrap();
        assert_eq!(written, dir);
        let content = std::fs::read_to_string(dir.join(TRACKER_CASSETTE)).unwrap();
        assert!(content.contains("fields"));
    }

    #[test]
    fn finish_fails_while_adapter_holds_recorder() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(root.path(), URL).unwrap();
        let _held
 = Arc::clone(&session.tracker);

        assert!(matches!(session.finish(), Err(Error::Config(_))));
    }
}
