//! `bugz status`: change status and resolution.

use clap::{value_parser, Arg, ArgMatches};

use super::args::{self, ArgFragment};
use super::{Command, CommandDef, Session};
use crate::error::Result;
use crate::message::MessageArgs;
use crate::tracker::{BugHandle, BugId};
use crate::transition::{self, StatusRequest};

/// Set the status of the given bugs.
#[derive(Debug)]
pub struct Status {
    bugs: Vec<BugId>,
    request: StatusRequest,
    message: MessageArgs,
}

fn status_args() -> ArgFragment {
    Box::new(|cmd| {
        cmd.arg(
            Arg::new("status")
                .long("status")
                .value_name("STATUS")
                .help("New status (case-insensitive), else chosen from a list"),
        )
        .arg(
            Arg::new("resolution")
                .long("resolution")
                .value_name("RESOLUTION")
                .help("Resolution (case-insensitive) for a closed status"),
        )
        .arg(
            Arg::new("dupe_of")
                .long("dupe-of")
                .value_name("BUG")
                .value_parser(value_parser!(u32).range(1..))
                .help("The bug of which the given bugs are duplicates"),
        )
    })
}

impl CommandDef for Status {
    const NAME: &'static str = "status";
    const ABOUT: &'static str = "Set the status of the given bugs";
    const LONG_ABOUT: Option<&'static str> = Some(
        "Set the status of the given bugs.\n\n\
         The status is required unless --dupe-of is used. It can be given \
         with --status; otherwise it is chosen from a list.\n\n\
         Moving an open bug to a status that is not open needs a resolution. \
         It can be given with --resolution; otherwise it is chosen from a \
         list. Moving to an open status clears the resolution.\n\n\
         --dupe-of BUG marks the bugs as duplicates of BUG. --status and \
         --resolution are then ignored and the tracker sets both.",
    );

    fn fragments() -> Vec<ArgFragment> {
        vec![args::bugs(), status_args(), args::optional_message()]
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let request = StatusRequest {
            status: matches.get_one::<String>("status").cloned(),
            resolution: matches.get_one::<String>("resolution").cloned(),
            dupe_of: matches.get_one::<u32>("dupe_of").copied().map(BugId),
        };
        Ok(Self {
            bugs: args::bug_ids(matches),
            request,
            message: args::message(matches),
        })
    }
}

impl Command for Status {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        // The comment comes first, before any status or resolution prompt.
        let comment = self.message.resolve(session.ctx)?;
        let mut bugs: Vec<BugHandle<'_>> = self
            .bugs
            .iter()
            .map(|&id| session.tracker.bug(id))
            .collect();

        let plan = transition::plan(&self.request, &session.tracker, session.ui(), &mut bugs)?;
        tracing::debug!(?plan, "transition planned");
        transition::apply(&plan, &mut bugs, comment.as_deref())
    }
}
