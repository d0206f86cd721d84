//! Binary entrypoint for the `bugz` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn install_tracing(verbosity: u8) {
    // RUST_LOG takes precedence over -v.
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args: Vec<std::ffi::OsString> = std::env::args_os().collect();
    install_tracing(bugz::cli::verbosity(&args));

    match bugz::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            match &err {
                bugz::Error::Usage(usage) => {
                    let _ = usage.print();
                }
                other => eprintln!("bugz: {other}"),
            }
            ExitCode::from(code)
        }
    }
}
