//! Global command-line arguments and pre-parse scanning of argv.
//!
//! Subcommand arguments are assembled per command from fragments in
//! [`crate::commands::args`]; this module covers what comes before the
//! subcommand name.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

use crate::config::CONFIG_ENV;

/// Options accepted before the subcommand.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "bugz",
    version,
    about = "Inspect and edit Bugzilla bugs from the command line",
    disable_help_subcommand = true
)]
pub struct GlobalArgs {
    /// Configuration file [default: <config dir>/bugz/config.yaml].
    #[arg(long, env = CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Server section of the configuration to use.
    #[arg(long, env = "BUGZ_SERVER", value_name = "NAME")]
    pub server: Option<String>,

    /// Base URL of the tracker.
    #[arg(long, env = "BUGZ_URL")]
    pub url: Option<String>,

    /// Login name.
    #[arg(long, env = "BUGZ_USER")]
    pub user: Option<String>,

    /// Password for --user.
    #[arg(long, env = "BUGZ_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// API key, used instead of --user/--password.
    #[arg(long, env = "BUGZ_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// More log output; repeat for more.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Index of the first positional token in `args` (the subcommand or alias),
/// skipping global options and their values.
#[must_use]
pub fn first_positional(args: &[OsString]) -> Option<usize> {
    let command = GlobalArgs::command();
    let takes_value = |named: &dyn Fn(&clap::Arg) -> bool| {
        command
            .get_arguments()
            .any(|a| named(a) && a.get_action().takes_values())
    };

    let mut index = 1;
    while index < args.len() {
        let token = args[index].to_string_lossy();
        if token == "--" {
            return (index + 1 < args.len()).then_some(index + 1);
        }
        if let Some(long) = token.strip_prefix("--") {
            if !long.contains('=') && takes_value(&|a| a.get_long() == Some(long)) {
                index += 1;
            }
        } else if let Some(shorts) = token.strip_prefix('-').filter(|s| !s.is_empty()) {
            let last = shorts.chars().last();
            if shorts.chars().count() == 1 && takes_value(&|a| a.get_short() == last) {
                index += 1;
            }
        } else {
            return Some(index);
        }
        index += 1;
    }
    None
}

/// The `--config` value given before the subcommand, else `$BUGZ_CONFIG`.
#[must_use]
pub fn config_path(args: &[OsString]) -> Option<PathBuf> {
    let end = first_positional(args).unwrap_or(args.len());
    let mut found = None;
    let mut index = 1;
    while index < end {
        let token = args[index].to_string_lossy();
        if let Some(value) = token.strip_prefix("--config=") {
            found = Some(PathBuf::from(value));
        } else if token == "--config" {
            found = args.get(index + 1).map(PathBuf::from);
            index += 1;
        }
        index += 1;
    }
    found.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}

/// `-v`, `-vv` and so on.
fn is_verbose_cluster(token: &str) -> bool {
    token
        .strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c == 'v'))
}

/// Number of `-v` flags given before the subcommand.
#[must_use]
pub fn verbosity(args: &[OsString]) -> u8 {
    let end = first_positional(args).unwrap_or(args.len());
    let count = args
        .iter()
        .take(end)
        .skip(1)
        .map(|arg| arg.to_string_lossy())
        .map(|token| match token.as_ref() {
            "--verbose" => 1,
            t if is_verbose_cluster(t) => t.len() - 1,
            _ => 0,
        })
        .sum::<usize>();
    u8::try_from(count).unwrap_or(u8::MAX)
}
