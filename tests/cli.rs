//! Tests for the `call-supervisor` binary.

use std::io::Write;
use std::process::Command;

use call_supervisor::config::{parse_config, SupervisorConfig};

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_call-supervisor"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_defaults_round_trip() {
    let output = cli().arg("defaults").output().unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    assert_eq!(parse_config(&text).unwrap(), SupervisorConfig::default());
}

#[test]
fn test_check_prints_effective_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[breaker]\nfailure_threshold = 7\n\n[observability]\nlog_level = \"error\""
    )
    .unwrap();

    let output = cli().arg("check").arg(file.path()).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["breaker"]["failure_threshold"], 7);
    assert_eq!(json["breaker"]["open_timeout_ms"], 5000);
    assert_eq!(json["observability"]["log_format"], "pretty");
}

#[test]
fn test_check_reports_validation_failure() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[breaker]\nfailure_threshold = 0").unwrap();

    let output = cli().arg("check").arg(file.path()).output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("breaker.failure_threshold: must be at least 1"), "{}", stderr);
}
