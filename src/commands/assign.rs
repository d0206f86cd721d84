//! `bugz assign`: hand bugs to someone else.

use clap::{Arg, ArgMatches};

use super::args::{self, ArgFragment};
use super::{Command, CommandDef, Session};
use crate::error::{Error, Result};
use crate::message::MessageArgs;
use crate::tracker::BugId;

/// Assign bugs to the given user.
#[derive(Debug)]
pub struct Assign {
    bugs: Vec<BugId>,
    to: String,
    message: MessageArgs,
}

impl CommandDef for Assign {
    const NAME: &'static str = "assign";
    const ABOUT: &'static str = "Assign bugs to the given user";

    fn fragments() -> Vec<ArgFragment> {
        vec![
            args::bugs(),
            Box::new(|cmd| {
                cmd.arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("ASSIGNEE")
                        .required(true)
                        .help("New assignee"),
                )
            }),
            args::optional_message(),
        ]
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let to = matches
            .get_one::<String>("to")
            .cloned()
            .ok_or_else(|| Error::Arguments("--to is required".into()))?;
        Ok(Self {
            bugs: args::bug_ids(matches),
            to,
            message: args::message(matches),
        })
    }
}

impl Command for Assign {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        let comment = self.message.resolve(session.ctx)?;
        for &id in &self.bugs {
            session
                .tracker
                .bug(id)
                .set_assigned_to(&self.to, comment.as_deref())?;
        }
        Ok(())
    }
}
