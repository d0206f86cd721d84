//! Live adapter for the `Editor` port: the user's editor on a temp file.

use std::env;
use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

use crate::error::PortError;
use crate::ports::Editor;

/// Launches `$BUGZ_EDITOR`, `$VISUAL`, `$EDITOR` or `vi`.
pub struct LiveEditor;

fn resolve_editor_command() -> String {
    env::var("BUGZ_EDITOR")
        .or_else(|_| env::var("VISUAL"))
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".into())
}

/// Seed text: the prompt as comment lines, then a blank line.
fn template(prompt: &str) -> String {
    let mut text: String = prompt.lines().map(|line| format!("# {line}\n")).collect();
    text.push_str(
        "# Lines starting with '#' are ignored; an empty message cancels.\n\n",
    );

    text
}

/// Drop comment lines and surrounding whitespace.
fn parse_output(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

impl Editor for LiveEditor {
    fn input(&self, prompt: &str) -> Result<String, PortError> {
        let mut file = NamedTempFile::new()?;
        file.write_all(template(prompt).as_bytes())?;
        file.flush()?;

        let editor = resolve_editor_command();
        let mut parts = shell_words::split(&editor)
            .map_err(|e| format!("cannot parse editor command '{editor}': {e}"))?;
        if parts.is_empty() {
            parts.push(editor);
        }
        let program = parts.remove(0);

        let status = Command::new(&program)
            .args(&parts)
            .arg(file.path())
            .status()
            .map_err(|e| format!("failed to start editor {program}: {e}"))?;
        if !status.success() {
            tracing::warn!(%status, "editor exited unsuccessfully; discarding text");
            return Ok(String::new());
        }

        let raw = std::fs::read_to_string(file.path())?;
        Ok(parse_output(&raw))
    }
}
