//! Integration tests for top-level CLI behavior.

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

fn config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp config");
    file.write_all(yaml.as_bytes()).expect("write config");
    file
}

fn run_bugz(config: &NamedTempFile, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_bugz");
    Command::new(bin)
        .args(args)
        .env("BUGZ_CONFIG", config.path())
        .env_remove("BUGZ_SERVER")
        .env_remove("BUGZ_URL")
        .env_remove("BUGZ_USER")
        .env_remove("BUGZ_PASSWORD")
        .env_remove("BUGZ_API_KEY")
        .env_remove("BUGZ_RECORD")
        .output()
        .expect("failed to run bugz binary")
}

#[test]
fn help_lists_every_command() {
    let cfg = config("");
    let output = run_bugz(&cfg, &["help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    let names = [
        "assign", "block", "cc", "comment", "depend", "fields", "info", "list", "new", "products",
        "status",
    ];
    for name in names {
        assert!(stdout.contains(name), "help output is missing {name}");
    }
}

#[test]
fn help_for_unknown_name_is_not_an_error() {
    let cfg = config("");
    let output = run_bugz(&cfg, &["help", "unknownthing"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("unknown subcommand: 'unknownthing'"));
}

#[test]
fn help_describes_an_alias() {
    let expansion = "status --status RESOLVED --resolution FIXED";
    let cfg = config(&format!("aliases:\n  fix: {expansion}\n"));
    let output = run_bugz(&cfg, &["help", "fix"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains(&format!("'fix': alias for {expansion}")));
}

#[test]
fn help_for_a_command_shows_its_long_help() {
    let cfg = config("");
    let output = run_bugz(&cfg, &["help", "status"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--dupe-of"));
    assert!(stdout.contains("resolution"));
}

#[test]
fn unknown_subcommand_fails() {
    let cfg = config("");
    let output = run_bugz(&cfg, &["frobnicate", "1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("frobnicate"));
}

#[test]
fn message_and_file_are_mutually_exclusive() {
    let cfg = config("");
    let output = run_bugz(&cfg, &["comment", "1", "-m", "hello", "-F", "msg.txt"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("cannot be used with"));
}

#[test]
fn remote_command_without_url_is_a_config_error() {
    let cfg = config("");
    let output = run_bugz(&cfg, &["list", "1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(78));
    assert!(stderr.contains("missing args: url"));
}

#[test]
fn unknown_server_section_is_a_config_error() {
    let cfg = config("servers:\n  work:\n    url: https://bugs.example.org/\n");
    let output = run_bugz(&cfg, &["--server", "home", "list", "1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(78));
    assert!(stderr.contains("no configuration for server 'home'"));
}

#[test]
fn alias_colliding_with_a_command_fails_at_startup() {
    let cfg = config("aliases:\n  list: info\n");
    let output = run_bugz(&cfg, &["help"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(78));
    assert!(stderr.contains("shadows a command"));
}

#[test]
fn block_help_shows_list_options() {
    let cfg = config("");
    let output = run_bugz(&cfg, &["block", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--add"));
    assert!(stdout.contains("--remove"));
    assert!(stdout.contains("--set"));
}
