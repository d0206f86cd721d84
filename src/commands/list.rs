//! `bugz list`: one line per bug.

use clap::ArgMatches;

use super::args::{self, ArgFragment};
use super::{Command, CommandDef, Session};
use crate::error::Result;
use crate::tracker::BugId;

/// Show a one-line summary of the given bugs.
#[derive(Debug)]
pub struct List {
    bugs: Vec<BugId>,
}

impl CommandDef for List {
    const NAME: &'static str = "list";
    const ABOUT: &'static str = "Show a one-line summary of the given bugs";

    fn fragments() -> Vec<ArgFragment> {
        vec![args::bugs()]
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            bugs: args::bug_ids(matches),
        })
    }
}

impl Command for List {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        let width = self
            .bugs
            .iter()
            .map(|id| id.to_string().len() + 1)
            .max()
            .unwrap_or(0);
        let ui = session.ui();
        for &id in &self.bugs {
            let mut bug = session.tracker.bug(id);
            let summary = &bug.read()?.summary;
            let label = format!("{id}:");
            ui.show(&format!("Bug {label:width$} {summary}"));
        }

        Ok(())
    }
}
