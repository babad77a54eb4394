//! Tests for the upload subcommand and global flags.

use super::{parse, parse_cli};
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_upload_full() {
    match parse(&[
        "avatar",
        "upload",
        "--token",
        "abc",
        "--url",
        "https://i.imgur.com/cat.png",
        "--origin",
        "10.0.0.1",
    ]) {
        CliCommand::Upload { token, url, origin } => {
            assert_eq!(token.as_deref(), Some("abc"));
            assert_eq!(url.as_deref(), Some("https://i.imgur.com/cat.png"));
            assert_eq!(origin, "10.0.0.1");
        }
        other => panic!("expected Upload, got {other:?}"),
    }
}

#[test]
fn cli_parse_upload_defaults() {
    match parse(&["avatar", "upload"]) {
        CliCommand::Upload { token, url, origin } => {
            assert!(token.is_none());
            assert!(url.is_none());
            assert_eq!(origin, "local");
        }
        other => panic!("expected Upload, got {other:?}"),
    }
}

#[test]
fn cli_parse_global_paths_after_subcommand() {
    let cli = parse_cli(&[
        "avatar",
        "upload",
        "--url",
        "x",
        "--db",
        "/tmp/p.db",
        "--config",
        "/tmp/c.toml",
    ]);
    assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/p.db")));
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/c.toml")));
}

#[test]
fn cli_parse_upload_rejects_positional() {
    assert!(Cli::try_parse_from(["avatar", "upload", "https://i.imgur.com/cat.png"]).is_err());
}
