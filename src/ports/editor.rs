//! Text editor port.

use crate::error::PortError;

/// Obtains longer text by handing the user an editor.
pub trait Editor: Send + Sync {
    /// Opens an editor with `prompt` as guidance and returns what was written.
    ///
    /// An empty string means the user wrote nothing or cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor cannot be started.
    fn input(&self, prompt: &str) -> Result<String, PortError>;
}
