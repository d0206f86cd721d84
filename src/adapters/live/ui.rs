//! Live adapter for the `Ui` port: interactive terminal prompts.

use dialoguer::{Input, MultiSelect, Select};

use crate::error::PortError;
use crate::ports::Ui;

/// Prompts on the terminal with arrow-key menus.
pub struct TerminalUi;

/// Which options start out ticked in a multi-select.
fn defaults_mask(options: &[String], default: &[String]) -> Vec<bool> {
    options
        .iter()
        .map(|option| default.contains(option))
        .collect()
}

/// The options at `indices`, in menu order.
fn selected(options: &[String], mut indices: Vec<usize>) -> Vec<String> {
    indices.sort_unstable();
    indices
        .into_iter()
        .filter_map(|i| options.get(i).cloned())
        .collect()
}

impl Ui for TerminalUi {
    fn choose(&self, prompt: &str, options: &[String]) -> Result<String, PortError> {
        if options.is_empty() {
            return Err(format!("{prompt}: nothing to choose from").into());
        }
        let index = Select::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact_opt()?
            .ok_or("no choice made")?;
        selected(options, vec![index])
            .pop()
            .ok_or_else(|| "choice out of range".into())
    }

    fn choose_many(
        &self,
        prompt: &str,
        options: &[String],
        default: &[String],
    ) -> Result<Vec<String>, PortError> {
        if options.is_empty() {
            return Ok(default.to_vec());
        }
        let picked = MultiSelect::new()
            .with_prompt(prompt)
            .items(options)
            .defaults(&defaults_mask(options, default))
            .interact_opt()?;
        Ok(match picked {
            Some(indices) => selected(options, indices),
            None => default.to_vec(),
        })
    }


    fn text(&self, prompt: &str) -> Result<String, PortError> {
        let answer: String = Input::new().with_prompt(prompt).interact_text()?;
        Ok(answer.trim().to_string())
    }

    fn show(&self, message: &str) {
        println!("{message}");
    }
}
