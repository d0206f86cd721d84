//! Reusable argument fragments.
//!
//! A fragment adds one or more arguments to a subcommand without knowing
//! what else is there. Commands list their fragments in order; the order
//! only affects help output. Each fragment has a matching extractor that
//! reads its values back out of the parsed matches.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches};

use crate::message::{Message, MessageArgs};
use crate::relations::ListChange;
use crate::tracker::BugId;

/// Adds arguments to a subcommand.
pub type ArgFragment = Box<dyn Fn(clap::Command) -> clap::Command>;

const BUGS: &str = "bugs";
const MESSAGE: &str = "message";
const MESSAGE_FILE: &str = "file";
const ADD: &str = "add";
const REMOVE: &str = "remove";
const SET: &str = "set";
const LIMIT: &str = "limit";

/// What a list argument holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Items {
    /// Bug numbers.
    Bugs,
    /// User logins or name fragments.
    Users,
}

impl Items {
    fn arg(self, id: &'static str, help: String) -> Arg {
        let arg = Arg::new(id)
            .long(id)
            .help(help)
            .num_args(1..)
            .action(ArgAction::Append);
        match self {
            Self::Bugs => arg.value_name("BUG").value_parser(bug_parser()),
            Self::Users => arg.value_name("USER"),
        }
    }
}

fn bug_parser() -> impl clap::builder::TypedValueParser<Value = BugId> {
    use clap::builder::TypedValueParser;
    value_parser!(u32).range(1..).map(BugId)
}

/// `BUG...`: one or more bug numbers.
#[must_use]
pub fn bugs() -> ArgFragment {
    Box::new(|cmd| {
        cmd.arg(
            Arg::new(BUGS)
                .value_name("BUG")
                .help("Bug numbers")
                .required(true)
                .num_args(1..)
                .value_parser(bug_parser()),
        )
    })
}

/// `-m [MSG]` or `-F MSGFILE`; `-m` alone opens an editor.
#[must_use]
pub fn optional_message() -> ArgFragment {
    Box::new(|cmd| {
        cmd.arg(
            Arg::new(MESSAGE)
                .short('m')
                .long("message")
                .value_name("MSG")
                .num_args(0..=1)
                .help("Comment to add; without MSG an editor is opened"),
        )
        .arg(
            Arg::new(MESSAGE_FILE)
                .short('F')
                .long("file")
                .value_name("MSGFILE")
                .value_parser(value_parser!(PathBuf))
                .help("Read the comment from MSGFILE"),
        )
        .group(
            ArgGroup::new("comment")
                .args([MESSAGE, MESSAGE_FILE])
                .multiple(false),
        )
    })
}

/// `--add ITEM...` and `--remove ITEM...`.
#[must_use]
pub fn add_remove(items: Items, noun: &'static str) -> ArgFragment {
    Box::new(move |cmd| {
        cmd.arg(items.arg(ADD, format!("Add {noun}")))
            .arg(items.arg(REMOVE, format!("Remove {noun}")))
    })
}

/// `--set ITEM...`, replacing the whole list.
#[must_use]
pub fn set(items: Items, noun: &'static str) -> ArgFragment {
    let help = format!("Replace {noun}; --add and --remove are ignored");
    Box::new(move |cmd| cmd.arg(items.arg(SET, help.clone())))
}

/// `-l/--limit N`.
#[must_use]
pub fn limit() -> ArgFragment {
    Box::new(|cmd| {
        cmd.arg(
            Arg::new(LIMIT)
                .short('l')
                .long("limit")
                .value_name("N")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .help("Show only the N most recent comments"),
        )
    })
}

/// Bug numbers from [`bugs`].
#[must_use]
pub fn bug_ids(matches: &ArgMatches) -> Vec<BugId> {
    matches
        .get_many::<BugId>(BUGS)
        .map(|ids| ids.copied().collect())
        .unwrap_or_default()
}

/// Comment arguments from [`optional_message`].
#[must_use]
pub fn message(matches: &ArgMatches) -> MessageArgs {
    let message = if matches.contains_id(MESSAGE) {
        match matches.get_one::<String>(MESSAGE) {
            Some(text) => Message::Literal(text.clone()),
            None => Message::Interactive,
        }
    } else {
        Message::Absent
    };
    MessageArgs {
        message,
        file: matches.get_one::<PathBuf>(MESSAGE_FILE).cloned(),
    }
}

/// List edits from [`add_remove`] and, when present, [`set`].
#[must_use]
pub fn list_change<T: Clone + Send + Sync + 'static>(matches: &ArgMatches) -> ListChange<T> {
    let values = |id: &str| -> Option<Vec<T>> {
        matches
            .try_get_many::<T>(id)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
    };
    ListChange {
        add: values(ADD).unwrap_or_default(),
        remove: values(REMOVE).unwrap_or_default(),
        set: values(SET),
    }
}

/// Limit from [`limit`].
#[must_use]
pub fn limit_value(matches: &ArgMatches) -> Option<i64> {
    matches.get_one::<i64>(LIMIT).copied()
}
