//! Command composition and dispatch.
//!
//! Each subcommand is a type implementing [`CommandDef`]: a name, help
//! text, and an ordered list of argument fragments. The [`Registry`] maps
//! names and aliases to those definitions, and [`App`] turns argv into a
//! running [`Command`].

pub mod args;
pub mod assign;
pub mod block;
pub mod cc;
pub mod comment;
pub mod depend;
pub mod fields;
pub mod help;
pub mod info;
pub mod list;
pub mod new;
pub mod products;
pub mod registry;
pub mod status;

use std::ffi::OsString;

use clap::{ArgMatches, FromArgMatches};

use crate::cli::{self, GlobalArgs};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::ports::Ui;
use crate::tracker::Tracker;

pub use args::ArgFragment;
pub use registry::{CommandSpec, Lookup, Registry};

/// A parsed, ready-to-run subcommand.
pub trait Command {
    /// Perform the command.
    ///
    /// # Errors
    ///
    /// Returns the first failure; earlier tracker changes are not undone.
    fn run(&self, session: &Session<'_>) -> Result<()>;
}

/// Static description of a command type.
pub trait CommandDef: Command + Sized + 'static {
    /// Subcommand name.
    const NAME: &'static str;
    /// One-line help.
    const ABOUT: &'static str;
    /// Longer help, when the one-liner is not enough.
    const LONG_ABOUT: Option<&'static str> = None;
    /// Whether a tracker connection is needed.
    const REMOTE: bool = true;

    /// Argument fragments, in help order.
    fn fragments() -> Vec<ArgFragment>;

    /// Build the command from its parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arguments`] when the values cannot be used together.
    fn from_matches(matches: &ArgMatches) -> Result<Self>;
}

/// What a running command can reach.
pub struct Session<'a> {
    /// Ports.
    pub ctx: &'a ServiceContext,
    /// Tracker facade over `ctx.tracker`.
    pub tracker: Tracker<'a>,
    /// The application, for configuration and help.
    pub app: &'a App,
}

impl Session<'_> {
    /// The UI port.
    #[must_use]
    pub fn ui(&self) -> &dyn Ui {
        self.ctx.ui.as_ref()
    }
}

/// A parsed command line.
#[derive(Debug)]
pub struct Invocation {
    /// Options given before the subcommand.
    pub globals: GlobalArgs,
    name: String,
    matches: ArgMatches,
}

impl Invocation {
    /// The subcommand name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Configuration, registry and parser for one process.
pub struct App {
    config: Config,
    registry: Registry,
    parser: clap::Command,
}

impl App {
    /// Build the registry from the standard commands and configured aliases.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Registry`] or [`Error::Config`] for a bad alias.
    pub fn new(config: Config) -> Result<Self> {
        let mut registry = Registry::standard()?;
        for (name, expansion) in &config.aliases {
            registry.add_alias(name, expansion)?;
        }
        let parser = registry.root_command();
        Ok(Self {
            config,
            registry,
            parser,
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Commands and aliases.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The root parser.
    #[must_use]
    pub fn parser(&self) -> &clap::Command {
        &self.parser
    }

    /// Replace a leading alias with its expansion.
    #[must_use]
    pub fn expand_alias(&self, mut args: Vec<OsString>) -> Vec<OsString> {
        let Some(index) = cli::first_positional(&args) else {
            return args;
        };
        let token = args[index].to_string_lossy().into_owned();
        if let Lookup::Alias(alias) = self.registry.resolve(&token) {
            tracing::debug!(alias = %token, expansion = %alias.expansion, "expanding alias");
            args.splice(index..=index, alias.words.iter().map(OsString::from));
        }
        args
    }

    /// Expand aliases and parse `args`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for anything the parser rejects, including
    /// `--help` and `--version`.
    pub fn parse(&self, args: Vec<OsString>) -> Result<Invocation> {
        let args = self.expand_alias(args);
        let matches = self.parser.clone().try_get_matches_from(args)?;
        let globals = GlobalArgs::from_arg_matches(&matches)?;
        let (name, sub) = matches
            .subcommand()
            .ok_or_else(|| Error::Arguments("no subcommand given".into()))?;
        Ok(Invocation {
            globals,
            name: name.to_string(),
            matches: sub.clone(),
        })
    }

    /// Whether the parsed command needs a tracker.
    #[must_use]
    pub fn is_remote(&self, invocation: &Invocation) -> bool {
        self.registry
            .command(invocation.name())
            .is_some_and(|spec| spec.remote)
    }

    /// Run a parsed command against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns whatever the command returns.
    pub fn execute(&self, invocation: &Invocation, ctx: &ServiceContext) -> Result<()> {
        let spec = self
            .registry
            .command(invocation.name())
            .ok_or_else(|| {
                Error::Arguments(format!("unknown subcommand: '{}'", invocation.name()))
            })?;
        let command = spec.build(&invocation.matches)?;
        tracing::debug!(command = spec.name, "dispatching");
        let session = Session {
            ctx,
            tracker: Tracker::new(ctx.tracker.as_ref()),
            app: self,
        };
        command.run(&session)
    }

    /// Parse and run in one step.
    ///
    /// # Errors
    ///
    /// Returns parse or command failures.
    pub fn run_with<I, T>(&self, args: I, ctx: &ServiceContext) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let invocation = self.parse(args.into_iter().map(Into::into).collect())?;
        self.execute(&invocation, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(aliases: &[(&str, &str)]) -> App {
        let mut config = Config::default();
        for &(name, expansion) in aliases {
            config.aliases.insert(name.into(), expansion.into());
        }
        App::new(config).unwrap()
    }

    fn argv(tokens: &[&str]) -> Vec<OsString> {
        std::iter::once("bugz")
            .chain(tokens.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn alias_expands_in_place() {
        let app = app(&[("fix", "status --status RESOLVED")]);
        let expanded = app.expand_alias(argv(&["-v", "fix", "12", "-m", "done"]));
        assert_eq!(
            expanded,
            argv(&[
                "-v", "status", "--status", "RESOLVED", "12", "-m", "done",
            ])

        );
    }

    #[test]
    fn non_alias_is_left_alone() {
        let app = app(&[("fix", "status --status RESOLVED")]);
        let args = argv(&["--server", "fix", "list", "1"]);
        assert_eq!(app.expand_alias(args.clone()), args);
    }

    #[test]
    fn parse_names_the_subcommand() {
        let app = app(&[]);
        let invocation = app
            .parse(argv(&["--url", "https://x.org/", "list", "3"]))
            .unwrap();
        assert_eq!(invocation.name(), "list");
        assert_eq!(invocation.globals.url.as_deref(), Some("https://x.org/"));
        assert!(app.is_remote(&invocation));
        let help = app.parse(argv(&["help"])).unwrap();
        assert!(!app.is_remote(&help));
    }

    #[test]
    fn unknown_subcommand_is_a_usage_error() {
        let err = app(&[]).parse(argv(&["frobnicate"])).unwrap_err();
        match err {
            Error::Usage(e) => assert_eq!(e.kind(), clap::error::ErrorKind::InvalidSubcommand),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn colliding_alias_fails_startup() {
        let mut config = Config::default();
        config.aliases.insert("list".into(), "info".into());
        assert!(matches!(App::new(config), Err(Error::Registry(_))));
    }
}
