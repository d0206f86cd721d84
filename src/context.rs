//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::editor::LiveEditor;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::tracker::{LiveBugTracker, Unconfigured};
use crate::adapters::live::ui::TerminalUi;
use crate::adapters::recording::RecordingBugTracker;
use crate::adapters::replaying::ui::Transcript;
use crate::adapters::replaying::{ReplayingBugTracker, ReplayingEditor, ReplayingUi};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Server;
use crate::error::{Error, Result};
use crate::ports::{BugTracker, Editor, FileSystem, Ui};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Bug tracker holding the bugs.
    pub tracker: Box<dyn BugTracker>,
    /// Terminal prompts and output.
    pub ui: Box<dyn Ui>,
    /// Editor for longer text.
    pub editor: Box<dyn Editor>,
    /// Filesystem for `-F` message files.
    pub fs: Box<dyn FileSystem>,
    /// Output captured by a replaying UI.
    transcript: Option<Transcript>,
}

impl ServiceContext {
    /// Creates a live context talking to `server`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the tracker client cannot be built.
    pub fn live(server: &Server) -> Result<Self> {
        let tracker = LiveBugTracker::new(server)
            .map_err(|e| Error::Config(format!("cannot connect to {}: {e}", server.url)))?;
        Ok(Self::with_tracker(Box::new(tracker)))
    }

    /// Creates a live context whose tracker calls are written to `session`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the tracker client cannot be built.
    pub fn recording(server: &Server, session: &RecordingSession) -> Result<Self> {
        let live = LiveBugTracker::new(server)
            .map_err(|e| Error::Config(format!("cannot connect to {}: {e}", server.url)))?;
        let tracker = RecordingBugTracker::new(Box::new(live), Arc::clone(&session.tracker));
        Ok(Self::with_tracker(Box::new(tracker)))
    }

    /// Creates a live context with no tracker, for commands that never
    /// contact one.
    #[must_use]
    pub fn offline() -> Self {
        Self::with_tracker(Box::new(Unconfigured))
    }

    fn with_tracker(tracker: Box<dyn BugTracker>) -> Self {
        Self {
            tracker,
            ui: Box::new(TerminalUi),
            editor: Box::new(LiveEditor),
            fs: Box::new(LiveFileSystem),
            transcript: None,
        }
    }

    /// Creates a replaying context from one in-memory cassette.
    ///
    /// Each port gets its own replayer over the cassette so that per-port
    /// cursors are independent. Files are read from disk.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        let replayer = |port| {
            let replayer = CassetteReplayer::for_port(cassette, Some(port));
            Arc::new(Mutex::new(replayer))
        };
        let transcript = Transcript::default();
        Self {
            tracker: Box::new(ReplayingBugTracker::new(replayer("tracker"))),
            ui: Box::new(ReplayingUi::new(replayer("ui"), Arc::clone(&transcript))),
            editor: Box::new(ReplayingEditor::new(replayer("editor"))),
            fs: Box::new(LiveFileSystem),
            transcript: Some(transcript),
        }
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self> {
        Ok(Self::from_cassette(&CassetteConfig::load_cassette(path)?))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette file panic with a clear message
    /// when called; UI output is captured either way.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self> {
        let replayers = config.load_all()?;
        let shared = |r| Arc::new(Mutex::new(r));
        let transcript = Transcript::default();

        Ok(Self {
            tracker: Box::new(match replayers.tracker {
                Some(r) => ReplayingBugTracker::new(shared(r)),
                None => ReplayingBugTracker::unconfigured(),
            }),
            ui: Box::new(match replayers.ui {
                Some(r) => ReplayingUi::new(shared(r), Arc::clone(&transcript)),
                None => ReplayingUi::unconfigured(Arc::clone(&transcript)),
            }),
            editor: Box::new(match replayers.editor {
                Some(r) => ReplayingEditor::new(shared(r)),
                None => ReplayingEditor::unconfigured(),
            }),
            fs: Box::new(LiveFileSystem),
            transcript: Some(transcript),
        })
    }

    /// Lines shown so far, when the UI is a replaying one.
    #[must_use]
    pub fn transcript(&self) -> Vec<String> {
        self.transcript
            .as_ref()
            .map(|t| {
                t.lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .clone()
            })
            .unwrap_or_default()
    }
}
