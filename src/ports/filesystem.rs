//! Filesystem port for reading message files.

use std::path::Path;

use crate::error::PortError;

/// Provides read access to local files.
///
/// Abstracting the filesystem allows deterministic testing without
/// touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;
}
