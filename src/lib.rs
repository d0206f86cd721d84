//! Core library entry for the `bugz` CLI.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod comments;
pub mod config;
pub mod context;
pub mod error;
pub mod message;
pub mod ports;
pub mod relations;
pub mod tracker;
pub mod transition;

use std::ffi::OsString;
use std::path::PathBuf;

use cassette::session::RecordingSession;
use commands::App;
use config::Config;
use context::ServiceContext;

pub use error::{Error, Result};

/// Environment variable naming a directory to record tracker traffic into.
pub const RECORD_ENV: &str = "BUGZ_RECORD";

/// Run the CLI with the provided arguments.
///
/// Commands that need a tracker get a live one, recorded to a cassette
/// when `BUGZ_RECORD=<dir>` is set. Everything else runs offline.
///
/// # Errors
///
/// Returns the first parse, configuration, or command failure.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let config = Config::load(cli::config_path(&args).as_deref())?;
    let app = App::new(config)?;
    let invocation = app.parse(args)?;

    if !app.is_remote(&invocation) {
        return app.execute(&invocation, &ServiceContext::offline());
    }

    let server = app.config().resolve_server(&invocation.globals)?;
    tracing::debug!(url = %server.url, "using server");

    match std::env::var_os(RECORD_ENV) {
        Some(dir) => {
            let session = RecordingSession::new(&PathBuf::from(dir), server.url.as_str())?;
            let result = {
                let ctx = ServiceContext::recording(&server, &session)?;
                app.execute(&invocation, &ctx)
            };
            let path = session.finish()?;
            eprintln!("cassettes written to {}", path.display());
            result
        }
        None => app.execute(&invocation, &ServiceContext::live(&server)?),
    }
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::Error;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["bugz", "--config", "/nonexistent/bugz.yaml", "unknown"]);
        assert!(matches!(result, Err(Error::Usage(_))));
    }

    #[test]
    fn help_runs_without_a_server() {
        let result = run([
            "bugz",
            "--config",
            "/nonexistent/bugz.yaml",
            "help",
            "nosuchcommand",
        ]);

        assert!(result.is_ok());
    }
}
