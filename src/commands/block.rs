//! `bugz block`: show or edit blocked bugs.

use clap::ArgMatches;

use super::args::{self, ArgFragment, Items};
use super::{Command, CommandDef, Session};
use crate::error::Result;
use crate::message::MessageArgs;
use crate::relations::{self, Blocks, ListChange};
use crate::tracker::BugId;

/// Show or update the bugs blocked by the given bugs.
///
/// With none of `--add`, `--remove` or `--set` the current lists are shown.
#[derive(Debug)]
pub struct Block {
    bugs: Vec<BugId>,
    change: ListChange<BugId>,
    message: MessageArgs,
}

impl CommandDef for Block {
    const NAME: &'static str = "block";
    const ABOUT: &'static str = "Show or update the bugs blocked by the given bugs";

    fn fragments() -> Vec<ArgFragment> {
        vec![
            args::bugs(),
            args::add_remove(Items::Bugs, "blocked bugs"),
            args::set(Items::Bugs, "blocked bugs"),
            args::optional_message(),
        ]
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            bugs: args::bug_ids(matches),
            change: args::list_change(matches),
            message: args::message(matches),
        })
    }
}

impl Command for Block {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        if self.change.is_empty() {
            return relations::show::<Blocks>(&session.tracker, session.ui(), &self.bugs);
        }
        let comment = self.message.resolve(session.ctx)?;
        relations::mutate::<Blocks>(
            &session.tracker,
            &self.bugs,
            &self.change,
            comment.as_deref(),
        )
    }
}
