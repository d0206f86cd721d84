//! `bugz depend`: show or edit dependencies.

use clap::ArgMatches;

use super::args::{self, ArgFragment, Items};
use super::{Command, CommandDef, Session};
use crate::error::Result;
use crate::message::MessageArgs;
use crate::relations::{self, DependsOn, ListChange};
use crate::tracker::BugId;

/// Show or update the dependencies of the given bugs.
///
/// With none of `--add`, `--remove` or `--set` the current lists are shown.
#[derive(Debug)]
pub struct Depend {
    bugs: Vec<BugId>,
    change: ListChange<BugId>,
    message: MessageArgs,
}

impl CommandDef for Depend {
    const NAME: &'static str = "depend";
    const ABOUT: &'static str = "Show or update the dependencies of the given bugs";

    fn fragments() -> Vec<ArgFragment> {
        vec![
            args::bugs(),
            args::add_remove(Items::Bugs, "dependencies"),
            args::set(Items::Bugs, "dependencies"),
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

impl Command for Depend {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        if self.change.is_empty() {
            return relations::show::<DependsOn>(&session.tracker, session.ui(), &self.bugs);
        }
        let comment = self.message.resolve(session.ctx)?;
        relations::mutate::<DependsOn>(
            &session.tracker,
            &self.bugs,
            &self.change,
            comment.as_deref(),
        )
    }
}
