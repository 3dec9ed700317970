use std::process::{Command, Stdio};

#[test]
fn cli_smoke_help() {
    let exe = env!("CARGO_BIN_EXE_activities");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run activities --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("list"));
}

#[test]
fn cli_without_arguments_reads_until_end_of_input() {
    let exe = env!("CARGO_BIN_EXE_activities");
    let output = Command::new(exe)
        .env("ACTIVITYAPP_CONFIG_PATH", std::env::temp_dir().join("activityapp-absent.json"))
        .stdin(Stdio::null())
        .output()
        .expect("failed to run activities");

    assert!(output.status.success());
}

#[test]
fn cli_reports_unknown_subcommand() {
    let exe = env!("CARGO_BIN_EXE_activities");
    let output = Command::new(exe)
        .arg("launch")
        .output()
        .expect("failed to run activities launch");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
