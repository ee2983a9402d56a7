//! Binary-level CLI tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("pypi_release_runner").unwrap()
}

#[test]
fn help_lists_the_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn plan_prints_the_five_stages_in_order() {
    let assert = cmd().arg("plan").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();

    let positions: Vec<usize> = ["Acquire", "Provision", "Build", "Publish", "Cleanup"]
        .iter()
        .map(|stage| stdout.find(stage).unwrap_or_else(|| panic!("{stage} missing from plan")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "stages out of order");
}

#[test]
fn missing_event_payload_is_a_failure() {
    cmd()
        .args(["run", "--event", "/nonexistent/event.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Event payload not found"));
}

#[test]
fn non_published_event_is_a_clean_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("event.json");
    std::fs::write(
        &payload,
        r#"{
            "action": "created",
            "release": { "tag_name": "v1.2.0" },
            "repository": {
                "full_name": "acme/pkg",
                "clone_url": "https://example.com/acme/pkg.git"
            }
        }"#,
    )
    .unwrap();

    cmd()
        .args(["run", "--event"])
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ignoring 'created' event"));
}

#[test]
fn invalid_tool_pin_is_rejected_up_front() {
    cmd()
        .args([
            "run",
            "--event",
            "event.json",
            "--uv-version",
            "not-a-version",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid arguments"));
}

#[test]
fn run_requires_an_event_path() {
    cmd().arg("run").env_remove("RELEASE_EVENT_PATH").assert().failure();
}
