//! Real-process tests for the production command runner.
//!
//! These spawn actual children to verify the credential environment
//! contract: variables in the runner's own environment never reach a child
//! unless the spec injects them explicitly.

use pypi_release_runner::{CommandRunner, CommandSpec, ProcessRunner};

#[tokio::test]
async fn scrubbed_variable_does_not_reach_children() {
    unsafe {
        std::env::set_var("TEST_SCRUB_LEAK_TOKEN", "pypi-super-secret");
    }

    let runner = ProcessRunner::with_scrubbed_env(["TEST_SCRUB_LEAK_TOKEN".to_string()]);
    // The shape of every non-Publish invocation: no explicit injection.
    let spec = CommandSpec::new("sh").args(["-c", "printenv TEST_SCRUB_LEAK_TOKEN"]);

    let output = runner.run(&spec).await.unwrap();
    assert!(!output.stdout.contains("pypi-super-secret"));
    // printenv exits nonzero when the variable is unset in the child.
    assert!(!output.success);
}

#[tokio::test]
async fn conventional_credential_variables_are_scrubbed_by_default() {
    unsafe {
        std::env::set_var("UV_PUBLISH_TOKEN", "pypi-inherited-secret");
    }

    let runner = ProcessRunner::new();
    let spec = CommandSpec::new("sh").args(["-c", "printenv UV_PUBLISH_TOKEN"]);

    let output = runner.run(&spec).await.unwrap();
    assert!(!output.stdout.contains("pypi-inherited-secret"));
    assert!(!output.success);
}

#[tokio::test]
async fn explicit_injection_overrides_the_scrub() {
    let runner = ProcessRunner::with_scrubbed_env(["TEST_SCRUB_INJECT_TOKEN".to_string()]);
    let spec = CommandSpec::new("sh")
        .args(["-c", "printenv TEST_SCRUB_INJECT_TOKEN"])
        .env("TEST_SCRUB_INJECT_TOKEN", "explicit-value");

    let output = runner.run(&spec).await.unwrap();
    assert!(output.success);
    assert_eq!(output.stdout.trim(), "explicit-value");
}

#[tokio::test]
async fn unrelated_environment_still_reaches_children() {
    unsafe {
        std::env::set_var("TEST_SCRUB_UNRELATED", "passes-through");
    }

    let runner = ProcessRunner::new();
    let spec = CommandSpec::new("sh").args(["-c", "printenv TEST_SCRUB_UNRELATED"]);

    let output = runner.run(&spec).await.unwrap();
    assert!(output.success);
    assert_eq!(output.stdout.trim(), "passes-through");
}
