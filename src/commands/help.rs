//! `bugz help`: help for the tool, a command, or an alias.

use clap::{Arg, ArgMatches};

use super::args::ArgFragment;
use super::{Command, CommandDef, Lookup, Session};
use crate::error::Result;

/// Show help.
#[derive(Debug)]
pub struct Help {
    subcommand: Option<String>,
}

impl CommandDef for Help {
    const NAME: &'static str = "help";
    const ABOUT: &'static str = "Show help";
    const REMOTE: bool = false;

    fn fragments() -> Vec<ArgFragment> {
        vec![Box::new(|cmd| {
            cmd.arg(
                Arg::new("subcommand")
                    .value_name("SUBCOMMAND")
                    .help("Show help for this subcommand"),
            )
        })]
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            subcommand: matches.get_one::<String>("subcommand").cloned(),
        })
    }
}

impl Command for Help {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        let mut parser = session.app.parser().clone();
        parser.build();

        let text = match self.subcommand.as_deref() {
            None => parser.render_long_help().to_string(),
            Some(name) => match session.app.registry().resolve(name) {
                Lookup::Alias(alias) => format!("'{name}': alias for {}", alias.expansion),
                Lookup::Unknown => format!("unknown subcommand: '{name}'"),
                Lookup::Command(_) => parser
                    .find_subcommand_mut(name)
                    .map(|cmd| cmd.render_long_help().to_string())
                    .unwrap_or_default(),
            },
        };
        session.ui().show(text.trim_end());
        Ok(())
    }
}
