//! Comment text attached to a change.

use std::path::PathBuf;

use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::ports::Editor;

/// Prompt shown when the comment is written in an editor.
pub const COMMENT_PROMPT: &str = "Enter your comment.";

/// The `-m` argument as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Message {
    /// No comment.
    #[default]
    Absent,
    /// `-m TEXT`.
    Literal(String),
    /// `-m` with no text: ask for it in an editor.
    Interactive,
}

impl Message {
    /// Turn the argument into final text.
    ///
    /// File contents, when present, win and are used verbatim. An editor
    /// session that produces nothing counts as no comment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the editor cannot be started.
    pub fn resolve(
        &self,
        file_contents: Option<String>,
        editor: &dyn Editor,
    ) -> Result<Option<String>> {
        if let Some(contents) = file_contents {
            return Ok(Some(contents));
        }
        match self {
            Self::Absent => Ok(None),
            Self::Literal(text) => Ok(Some(text.clone())),
            Self::Interactive => {
                let text = editor
                    .input(COMMENT_PROMPT)
                    .map_err(|e| Error::remote("editor", &e))?;
                if text.trim().is_empty() {
                    tracing::warn!("empty comment from editor; continuing without one");
                    Ok(None)
                } else {
                    Ok(Some(text))
                }
            }
        }
    }
}

/// The parsed `-m` / `-F` pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageArgs {
    /// `-m` as given.
    pub message: Message,
    /// `-F` file to read the comment from.
    pub file: Option<PathBuf>,
}

impl MessageArgs {
    /// Resolve to final comment text, reading the file or running the
    /// editor as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Remote`] if the editor cannot be started.
    pub fn resolve(&self, ctx: &ServiceContext) -> Result<Option<String>> {
        let contents = match &self.file {
            Some(path) => Some(ctx.fs.read_to_string(path).map_err(|e| Error::Io {
                context: format!("reading {}", path.display()),
                source: std::io::Error::other(e),
            })?),
            None => None,
        };
        self.message.resolve(contents, ctx.editor.as_ref())
    }
}
