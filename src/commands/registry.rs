//! Name and alias lookup for subcommands.

use std::collections::BTreeMap;

use clap::ArgMatches;

use super::args::ArgFragment;
use super::{
    assign, block, cc, comment, depend, fields, help, info, list, new, products, status, Command,
    CommandDef,
};
use crate::cli::GlobalArgs;
use crate::error::{Error, Result};

/// Everything the dispatcher needs to know about one subcommand.
pub struct CommandSpec {
    /// Subcommand name.
    pub name: &'static str,
    /// One-line help.
    pub about: &'static str,
    /// Longer help shown by `help NAME` and `NAME --help`.
    pub long_about: Option<&'static str>,
    /// Whether the command talks to the tracker.
    pub remote: bool,
    fragments: fn() -> Vec<ArgFragment>,
    build: fn(&ArgMatches) -> Result<Box<dyn Command>>,
}

impl CommandSpec {
    /// Describe command type `C`.
    #[must_use]
    pub fn of<C: CommandDef>() -> Self {
        Self {
            name: C::NAME,
            about: C::ABOUT,
            long_about: C::LONG_ABOUT,
            remote: C::REMOTE,
            fragments: C::fragments,
            build: |matches| Ok(Box::new(C::from_matches(matches)?)),
        }
    }

    /// The subcommand's parser, fragments applied in declared order.
    #[must_use]
    pub fn clap_command(&self) -> clap::Command {
        let mut cmd = clap::Command::new(self.name).about(self.about);
        if let Some(long) = self.long_about {
            cmd = cmd.long_about(long);
        }
        (self.fragments)()
            .iter()
            .fold(cmd, |cmd, fragment| fragment(cmd))
    }

    /// Build the command from its parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arguments`] when the values cannot be used.
    pub fn build(&self, matches: &ArgMatches) -> Result<Box<dyn Command>> {
        (self.build)(matches)
    }
}

/// A user-defined abbreviation for a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Text as configured.
    pub expansion: String,
    /// `expansion` split into words.
    pub words: Vec<String>,
}

/// Result of [`Registry::resolve`].
pub enum Lookup<'r> {
    /// A registered command.
    Command(&'r CommandSpec),
    /// An alias.
    Alias(&'r Alias),
    /// Neither.
    Unknown,
}

/// Every command and alias the binary knows.
#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<&'static str, CommandSpec>,
    aliases: BTreeMap<String, Alias>,
}

impl Registry {
    /// The built-in commands.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Registry`] if two commands share a name.
    pub fn standard() -> Result<Self> {
        let mut registry = Self::default();
        for spec in [
            CommandSpec::of::<assign::Assign>(),
            CommandSpec::of::<block::Block>(),
            CommandSpec::of::<cc::Cc>(),
            CommandSpec::of::<comment::CommentCommand>(),
            CommandSpec::of::<depend::Depend>(),
            CommandSpec::of::<fields::Fields>(),
            CommandSpec::of::<help::Help>(),
            CommandSpec::of::<info::Info>(),
            CommandSpec::of::<list::List>(),
            CommandSpec::of::<new::New>(),
            CommandSpec::of::<products::Products>(),
            CommandSpec::of::<status::Status>(),
        ] {
            registry.register(spec)?;
        }
        Ok(registry)
    }

    /// Add a command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Registry`] if the name is already a command or alias.
    pub fn register(&mut self, spec: CommandSpec) -> Result<()> {
        if self.commands.contains_key(spec.name) || self.aliases.contains_key(spec.name) {
            return Err(Error::Registry(format!("'{}' is already registered", spec.name)));
        }
        self.commands.insert(spec.name, spec);
        Ok(())
    }

    /// Add an alias expanding to `expansion`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Registry`] if the name is already a command or alias
    /// and [`Error::Config`] if the expansion is empty or badly quoted.
    pub fn add_alias(&mut self, name: &str, expansion: &str) -> Result<()> {
        if self.commands.contains_key(name) {
            return Err(Error::Registry(format!("alias '{name}' shadows a command")));
        }
        if self.aliases.contains_key(name) {
            return Err(Error::Registry(format!("alias '{name}' is defined twice")));
        }
        let words = shell_words::split(expansion)
            .map_err(|e| Error::Config(format!("alias '{name}': {e}")))?;
        if words.is_empty() {
            return Err(Error::Config(format!("alias '{name}' is empty")));
        }
        let alias = Alias {
            expansion: expansion.to_string(),
            words,
        };
        self.aliases.insert(name.to_string(), alias);
        Ok(())
    }

    /// Look up a command or alias.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Lookup<'_> {
        if let Some(spec) = self.commands.get(name) {
            Lookup::Command(spec)
        } else if let Some(alias) = self.aliases.get(name) {
            Lookup::Alias(alias)
        } else {
            Lookup::Unknown
        }
    }

    /// The command registered as `name`.
    #[must_use]
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    /// The full parser: global arguments plus every command.
    #[must_use]
    pub fn root_command(&self) -> clap::Command {
        use clap::CommandFactory;
        GlobalArgs::command()
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommands(self.commands.values().map(CommandSpec::clap_command))
    }
}
