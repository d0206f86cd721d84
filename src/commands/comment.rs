//! `bugz comment`: read or add comments.

use clap::{Arg, ArgAction, ArgMatches};

use super::args::{self, ArgFragment};
use super::{Command, CommandDef, Session};
use crate::comments;
use crate::error::Result;
use crate::message::MessageArgs;
use crate::tracker::BugId;

/// List comments or file a comment on the given bugs.
#[derive(Debug)]
pub struct CommentCommand {
    bugs: Vec<BugId>,
    message: MessageArgs,
    limit: Option<i64>,
    ascending: bool,
}

fn order() -> ArgFragment {
    Box::new(|cmd| {
        cmd.arg(
            Arg::new("reverse")
                .long("reverse")
                .action(ArgAction::SetTrue)
                .overrides_with("forward")
                .help("Show from newest to oldest (default)"),
        )
        .arg(
            Arg::new("forward")
                .long("forward")
                .action(ArgAction::SetTrue)
                .overrides_with("reverse")
                .help("Show from oldest to newest"),
        )
    })
}

impl CommandDef for CommentCommand {
    const NAME: &'static str = "comment";
    const ABOUT: &'static str = "List comments or file a comment on the given bugs";
    const LONG_ABOUT: Option<&'static str> = Some(
        "List comments or file a comment on the given bugs.\n\n\
         With -m or -F the comment is added to every bug; otherwise each \
         bug's comments are printed, newest first unless --forward is given. \
         --limit N keeps only the N most recent comments.",
    );

    fn fragments() -> Vec<ArgFragment> {
        vec![args::bugs(), args::optional_message(), args::limit(), order()]
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            bugs: args::bug_ids(matches),
            message: args::message(matches),
            limit: args::limit_value(matches),
            ascending: matches.get_flag("forward"),
        })
    }
}

impl Command for CommentCommand {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        if let Some(text) = self.message.resolve(session.ctx)? {
            for &id in &self.bugs {
                session.tracker.bug(id).add_comment(&text)?;
            }
            return Ok(());
        }

        let mut blocks = Vec::with_capacity(self.bugs.len());
        for &id in &self.bugs {
            let history = session.tracker.bug(id).comments()?;
            let shown = comments::view(&history, self.limit, self.ascending);
            blocks.push(comments::render(id, &shown));
        }
        session.ui().show(&blocks.join("\n"));
        Ok(())
    }
}
