//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;
use crate::error::{Error, Result};

/// Per-port cassette file paths. Ports without a cassette path will panic
/// if called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the tracker port cassette file.
    pub tracker: Option<PathBuf>,
    /// Path to the UI port cassette file.
    pub ui: Option<PathBuf>,
    /// Path to the editor port cassette file.
    pub editor: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the tracker port.
    pub tracker: Option<CassetteReplayer>,
    /// Replayer for the UI port.
    pub ui: Option<CassetteReplayer>,
    /// Replayer for the editor port.
    pub editor: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Read and parse one cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cassette(path: &Path) -> Result<Cassette> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            context: format!("reading cassette {}", path.display()),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            Error::Config(format!("failed to parse cassette file {}: {e}", path.display()))
        })
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers> {
        let load = |path: Option<&PathBuf>| -> Result<Option<CassetteReplayer>> {
            path.map(|p| Self::load_cassette(p).map(|c| CassetteReplayer::new(&c)))
                .transpose()
        };
        Ok(PortReplayers {
            tracker: load(self.tracker.as_ref())?,
            ui: load(self.ui.as_ref())?,
            editor: load(self.editor.as_ref())?,
        })
    }
}
