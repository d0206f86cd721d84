//! `bugz info`: selected fields of each bug.

use clap::ArgMatches;

use super::args::{self, ArgFragment};
use super::{Command, CommandDef, Session};
use crate::error::Result;
use crate::tracker::{value_text, BugId};

/// Show detailed information about the given bugs.
///
/// The fields shown come from `show_fields` in the configuration.
#[derive(Debug)]
pub struct Info {
    bugs: Vec<BugId>,
}

impl CommandDef for Info {
    const NAME: &'static str = "info";
    const ABOUT: &'static str = "Show detailed information about the given bugs";

    fn fragments() -> Vec<ArgFragment> {
        vec![args::bugs()]
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            bugs: args::bug_ids(matches),
        })
    }
}

impl Command for Info {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        let wanted = session.app.config().show_fields();
        let ui = session.ui();
        for &id in &self.bugs {
            let data = session.tracker.bug(id).read()?.to_map();
            let present: Vec<(&String, String)> = wanted
                .iter()
                .filter_map(|name| data.get(name).map(|value| (name, value_text(value))))
                .collect();
            let width = present
                .iter()
                .map(|(name, _)| name.len() + 1)
                .max()
                .unwrap_or(0);

            ui.show(&format!("Bug {id}:"));
            for (name, value) in present {
                let label = format!("{name}:");
                ui.show(&format!("  {label:width$} {value}"));
            }
            ui.show("");
        }
        Ok(())
    }
}
