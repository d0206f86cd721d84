//! `bugz cc`: show or edit CC lists.

use clap::ArgMatches;

use super::args::{self, ArgFragment, Items};
use super::{Command, CommandDef, Session};
use crate::error::Result;
use crate::message::MessageArgs;
use crate::relations::{self, CcList, ListChange};
use crate::tracker::{BugId, Tracker};

/// Show or update the CC list of the given bugs.
///
/// Users are given as anything that matches exactly one account; every
/// name is resolved before any bug is changed.
#[derive(Debug)]
pub struct Cc {
    bugs: Vec<BugId>,
    change: ListChange<String>,
    message: MessageArgs,
}

impl CommandDef for Cc {
    const NAME: &'static str = "cc";
    const ABOUT: &'static str = "Show or update the CC list of the given bugs";

    fn fragments() -> Vec<ArgFragment> {
        vec![
            args::bugs(),
            args::add_remove(Items::Users, "users on the CC list"),
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

fn logins(tracker: &Tracker<'_>, queries: &[String]) -> Result<Vec<String>> {
    queries
        .iter()
        .map(|q| tracker.match_one_user(q).map(|user| user.name))
        .collect()
}

impl Command for Cc {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        if self.change.is_empty() {
            return relations::show::<CcList>(&session.tracker, session.ui(), &self.bugs);
        }
        let change = ListChange {
            add: logins(&session.tracker, &self.change.add)?,
            remove: logins(&session.tracker, &self.change.remove)?,
            set: None,
        };
        let comment = self.message.resolve(session.ctx)?;
        relations::mutate::<CcList>(&session.tracker, &self.bugs, &change, comment.as_deref())
    }
}
