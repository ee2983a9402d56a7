//! Run command: execute the pipeline for one release event.

use crate::cli::{Args, Command, OutputManager};
use crate::config::RunConfig;
use crate::error::{CliError, Result};
use crate::event::ReleaseEvent;
use crate::pipeline::{self, RunReport};
use crate::process::ProcessRunner;
use std::path::{Path, PathBuf};

/// Execute the run command, returning the process exit code
pub(super) async fn execute_run(args: &Args, output: &OutputManager) -> Result<i32> {
    let Command::Run {
        event,
        workdir,
        uv_version,
        index_url,
        report,
    } = &args.command
    else {
        unreachable!("execute_run called with non-Run command");
    };

    let event = ReleaseEvent::from_path(event)?;
    if !event.is_published() {
        // Only "release published" activates the pipeline; anything else is
        // a clean no-op, not an error.
        output.info(&format!(
            "Ignoring '{}' event for {}: only published releases trigger this pipeline",
            event.action,
            event.repository_name()
        ));
        return Ok(0);
    }

    let mut config = RunConfig::new(workdir.clone().unwrap_or_else(default_workdir));
    config.uv_version = uv_version.clone();
    config.index_url = index_url.clone();

    output.section(&format!(
        "Publishing {} {}",
        event.repository_name(),
        event.reference()
    ));
    output.verbose(&format!("working directory: {}", config.workdir.display()));
    output.verbose(&format!("build tool pin: uv {}", config.uv_version));

    // Children must not inherit the credentials; only the Publish stage
    // injects them, into its own invocation.
    let runner = ProcessRunner::with_scrubbed_env([
        config.username_var.clone(),
        config.token_var.clone(),
    ]);
    let run_report = pipeline::execute(&config, &event, &runner, output).await;

    if let Some(path) = report {
        write_report(&run_report, path)?;
        output.verbose(&format!("run report written to {}", path.display()));
    }

    if run_report.succeeded() {
        output.success(&run_report.summary());
        Ok(0)
    } else {
        output.error(&run_report.summary());
        Ok(1)
    }
}

/// Fresh per-run directory under the system temp root
fn default_workdir() -> PathBuf {
    std::env::temp_dir().join(format!("release-run-{}", chrono::Utc::now().timestamp()))
}

fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let rendered = serde_json::to_string_pretty(report)?;
    std::fs::write(path, rendered).map_err(|e| {
        CliError::ReportWriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}
