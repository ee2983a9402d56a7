//! The five-stage release pipeline.
//!
//! The pipeline is an ordered list of stage descriptors consumed by a small
//! fixed executor loop. Control flows strictly forward: stage n+1 runs only
//! if stage n succeeded, and nothing runs after a failure, Cleanup
//! included. Adding a stage means appending a descriptor, not branching
//! logic.

pub mod context;
pub mod report;

pub use context::{ArtifactSet, ResolvedToolchain, RunContext};
pub use report::{RunReport, StageFailure, StageOutcome, StageRecord};

use crate::cli::OutputManager;
use crate::config::RunConfig;
use crate::error::{PublisherError, Result};
use crate::event::ReleaseEvent;
use crate::process::CommandRunner;
use crate::stages;
use serde::{Deserialize, Serialize};

/// One of the five pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Fetch the exact repository ref named by the event
    Acquire,
    /// Verify the build tool pin and install the pinned runtime
    Provision,
    /// Produce distributable artifacts into the output directory
    Build,
    /// Upload every artifact to the package index
    Publish,
    /// Prune the cache populated during this run
    Cleanup,
}

impl Stage {
    /// Stable stage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Acquire => "Acquire",
            Stage::Provision => "Provision",
            Stage::Build => "Build",
            Stage::Publish => "Publish",
            Stage::Cleanup => "Cleanup",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of one stage
#[derive(Debug, Clone, Copy)]
pub struct StageDescriptor {
    /// The stage this descriptor names
    pub stage: Stage,
    /// One-line summary shown by `plan`
    pub summary: &'static str,
}

/// The pipeline, in execution order
pub const STAGES: [StageDescriptor; 5] = [
    StageDescriptor {
        stage: Stage::Acquire,
        summary: "check out the release ref into the working directory",
    },
    StageDescriptor {
        stage: Stage::Provision,
        summary: "verify the pinned build tool and install the pinned runtime",
    },
    StageDescriptor {
        stage: Stage::Build,
        summary: "build distributable artifacts into the output directory",
    },
    StageDescriptor {
        stage: Stage::Publish,
        summary: "upload every artifact to the package index",
    },
    StageDescriptor {
        stage: Stage::Cleanup,
        summary: "prune the tool cache populated by this run",
    },
];

/// Run status state machine
///
/// `Pending → Acquiring → Provisioning → Building → Publishing → CleaningUp
/// → Succeeded`, with `Failed` reachable from any non-terminal state.
/// `Succeeded` and `Failed` are terminal; there is no retry or resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run created, no stage started yet
    Pending,
    /// Source Acquisition in progress
    Acquiring,
    /// Toolchain Provisioning in progress
    Provisioning,
    /// Build in progress
    Building,
    /// Publish in progress
    Publishing,
    /// Cache Cleanup in progress
    CleaningUp,
    /// All five stages succeeded
    Succeeded,
    /// A stage failed; the run aborted there
    Failed {
        /// The stage that failed
        stage: Stage,
    },
}

impl RunStatus {
    /// The in-progress status for a stage
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Acquire => RunStatus::Acquiring,
            Stage::Provision => RunStatus::Provisioning,
            Stage::Build => RunStatus::Building,
            Stage::Publish => RunStatus::Publishing,
            Stage::Cleanup => RunStatus::CleaningUp,
        }
    }

    /// Whether this status never transitions again
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed { .. })
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Acquiring => write!(f, "acquiring"),
            RunStatus::Provisioning => write!(f, "provisioning"),
            RunStatus::Building => write!(f, "building"),
            RunStatus::Publishing => write!(f, "publishing"),
            RunStatus::CleaningUp => write!(f, "cleaning up"),
            RunStatus::Succeeded => write!(f, "succeeded"),
            RunStatus::Failed { stage } => write!(f, "failed at {stage}"),
        }
    }
}

/// Execute the pipeline for one release event
///
/// Runs the descriptor list in order, fail-fast. Always returns a report;
/// the report's terminal status says whether the run succeeded and, if not,
/// which stage failed.
pub async fn execute<R: CommandRunner>(
    config: &RunConfig,
    event: &ReleaseEvent,
    runner: &R,
    output: &OutputManager,
) -> RunReport {
    let mut ctx = RunContext::new();
    let mut report = RunReport::new(event);

    for descriptor in &STAGES {
        let stage = descriptor.stage;
        report.status = RunStatus::for_stage(stage);
        output.progress(&format!("{stage}: {}", descriptor.summary));
        log::info!("stage {stage} started");

        let started_at = chrono::Utc::now();
        match run_stage(stage, config, event, runner, &mut ctx, output).await {
            Ok(()) => {
                log::info!("stage {stage} succeeded");
                report.record_success(stage, started_at);
                if stage == Stage::Build
                    && let Some(artifacts) = &ctx.artifacts
                {
                    report.artifacts = artifacts.file_names();
                }
            }
            Err(e) => {
                log::error!("stage {stage} failed: {e}");
                output.error(&format!("{stage} failed: {e}"));
                report.record_failure(stage, started_at, e.to_string());
                return report;
            }
        }
    }

    report.finish();
    report
}

async fn run_stage<R: CommandRunner>(
    stage: Stage,
    config: &RunConfig,
    event: &ReleaseEvent,
    runner: &R,
    ctx: &mut RunContext,
    output: &OutputManager,
) -> Result<()> {
    match stage {
        Stage::Acquire => {
            let working_copy = stages::acquire(config, event, runner).await?;
            output.success(&format!(
                "Checked out {} at {}",
                event.reference(),
                working_copy.display()
            ));
            ctx.working_copy = Some(working_copy);
        }
        Stage::Provision => {
            let working_copy = require(ctx.working_copy.as_deref(), "working copy")?;
            let toolchain = stages::provision(config, runner, working_copy).await?;
            output.success(&format!(
                "Toolchain ready: uv {} / runtime {}",
                toolchain.uv_version, toolchain.runtime_version
            ));
            ctx.toolchain = Some(toolchain);
        }
        Stage::Build => {
            let working_copy = require(ctx.working_copy.as_deref(), "working copy")?;
            let artifacts = stages::build(config, runner, working_copy).await?;
            output.success(&format!("Built {} artifact(s)", artifacts.len()));
            for name in artifacts.file_names() {
                output.indent(&name);
            }
            ctx.artifacts = Some(artifacts);
        }
        Stage::Publish => {
            let working_copy = require(ctx.working_copy.as_deref(), "working copy")?;
            let artifacts = require(ctx.artifacts.as_ref(), "artifact set")?;
            stages::publish(config, runner, working_copy, artifacts).await?;
            output.success(&format!(
                "Uploaded {} artifact(s) to the index",
                artifacts.len()
            ));
        }
        Stage::Cleanup => {
            stages::cleanup(config, runner).await?;
            output.success("Pruned tool cache");
        }
    }
    Ok(())
}

fn require<'a, T: ?Sized>(value: Option<&'a T>, what: &str) -> Result<&'a T> {
    value.ok_or_else(|| PublisherError::Internal(format!("{what} missing before its stage ran")))
}
