//! Terminal prompt port.

use crate::error::PortError;

/// Interactive prompts and user-facing output.
pub trait Ui: Send + Sync {
    /// Asks the user to pick exactly one of `options`.
    ///
    /// Blocks until a valid choice is made.
    ///
    /// # Errors
    ///
    /// Returns an error if input ends before a choice is made.
    fn choose(&self, prompt: &str, options: &[String]) -> Result<String, PortError>;

    /// Asks the user to pick any number of `options`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if input ends before an answer is given.
    fn choose_many(
        &self,
        prompt: &str,
        options: &[String],
        default: &[String],
    ) -> Result<Vec<String>, PortError>;

    /// Asks the user for a line of free text.
    ///
    /// # Errors
    ///
    /// Returns an error if input ends before an answer is given.
    fn text(&self, prompt: &str) -> Result<String, PortError>;

    /// Shows a message to the user.
    fn show(&self, message: &str);
}
