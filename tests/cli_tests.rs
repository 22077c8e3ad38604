// ABOUTME: Integration tests for the command line interface
// ABOUTME: Runs the built binary to check version output and startup failures

use std::net::TcpListener;
use std::process::Command;

fn jaas() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jaas"))
}

#[test]
fn test_cli_version_command() {
    let output = jaas()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_help_command() {
    let output = jaas()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--snippet-directory"));
    assert!(stdout.contains("--library-path"));
}

#[test]
fn test_cli_rejects_invalid_duration() {
    let output = jaas()
        .args(["--write-timeout", "whenever"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_cli_fails_when_port_is_taken() {
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port().to_string();

    let output = jaas()
        .args(["--port", &port, "--management-port", "0", "--log-format", "compact"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot start Jsonnet server"));
}
