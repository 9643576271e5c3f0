use bucket_sweep::cli::{Cli, Command};
use clap::Parser;

#[test]
fn parses_delete_with_explicit_flags() {
    let cli = Cli::try_parse_from([
        "bucket-sweep",
        "delete",
        "--bucket",
        "logs",
        "--prefix",
        "2024/",
        "--filter",
        r"\.gz$",
        "--profile",
        "ops",
    ])
    .unwrap();

    let Command::Delete { target, filter } = &cli.command else {
        panic!("expected delete");
    };
    assert_eq!(target.bucket, "logs");
    assert_eq!(target.prefix.as_deref(), Some("2024/"));
    assert_eq!(filter, r"\.gz$");
    assert_eq!(cli.client_config().profile.as_deref(), Some("ops"));
}

#[test]
fn original_command_names_still_work() {
    let cli = Cli::try_parse_from(["bucket-sweep", "list-files", "--bucket", "b"]).unwrap();
    assert!(matches!(cli.command, Command::List { .. }));

    let cli = Cli::try_parse_from([
        "bucket-sweep",
        "upload-file",
        "--bucket",
        "b",
        "--file",
        "a.txt",
        "--key",
        "a.txt",
    ])
    .unwrap();
    assert!(matches!(cli.command, Command::Upload { .. }));
}

#[test]
fn help_is_a_subcommand() {
    let err = Cli::try_parse_from(["bucket-sweep", "help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}
