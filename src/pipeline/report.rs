//! Run report: what happened, stage by stage.
//!
//! The report is the run's entire feedback surface: terminal status plus the
//! first failing stage's diagnostics. It can be serialized to JSON for the
//! host scheduler with `--report`.

use super::{RunStatus, Stage};
use crate::event::ReleaseEvent;
use serde::{Deserialize, Serialize};

/// Outcome of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageOutcome {
    /// Stage completed successfully
    Succeeded,
    /// Stage failed; the run aborted here
    Failed,
}

/// Record of one executed stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    /// Which stage this records
    pub stage: Stage,
    /// When the stage started
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// When the stage finished
    pub finished_at: chrono::DateTime<chrono::Utc>,
    /// How the stage ended
    pub outcome: StageOutcome,
}

/// Identity and diagnostics of the first failing stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageFailure {
    /// Stage that failed
    pub stage: Stage,
    /// Rendered error, diagnostics included
    pub message: String,
}

/// Complete record of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Repository the run was triggered for ("owner/name")
    pub repository: String,
    /// Release ref the run was triggered for
    pub reference: String,
    /// When the run started
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// When the run reached a terminal state
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Current (or terminal) run status
    pub status: RunStatus,
    /// Stages executed so far, in order
    pub stages: Vec<StageRecord>,
    /// First failure, if the run failed
    pub failure: Option<StageFailure>,
    /// Artifact file names uploaded (or staged) by this run
    pub artifacts: Vec<String>,
}

impl RunReport {
    /// Start a report for the given event
    pub fn new(event: &ReleaseEvent) -> Self {
        Self {
            repository: event.repository_name().to_string(),
            reference: event.reference().to_string(),
            started_at: chrono::Utc::now(),
            finished_at: None,
            status: RunStatus::Pending,
            stages: Vec::new(),
            failure: None,
            artifacts: Vec::new(),
        }
    }

    /// Record a stage that completed successfully
    pub fn record_success(&mut self, stage: Stage, started_at: chrono::DateTime<chrono::Utc>) {
        self.stages.push(StageRecord {
            stage,
            started_at,
            finished_at: chrono::Utc::now(),
            outcome: StageOutcome::Succeeded,
        });
    }

    /// Record a failed stage and move the run to its terminal `Failed` state
    pub fn record_failure(
        &mut self,
        stage: Stage,
        started_at: chrono::DateTime<chrono::Utc>,
        message: String,
    ) {
        self.stages.push(StageRecord {
            stage,
            started_at,
            finished_at: chrono::Utc::now(),
            outcome: StageOutcome::Failed,
        });
        self.failure = Some(StageFailure { stage, message });
        self.status = RunStatus::Failed { stage };
        self.finished_at = Some(chrono::Utc::now());
    }

    /// Mark the run succeeded
    pub fn finish(&mut self) {
        self.status = RunStatus::Succeeded;
        self.finished_at = Some(chrono::Utc::now());
    }

    /// Whether the run ended successfully
    pub fn succeeded(&self) -> bool {
        matches!(self.status, RunStatus::Succeeded)
    }

    /// One-line summary for the operator
    pub fn summary(&self) -> String {
        match &self.status {
            RunStatus::Succeeded => format!(
                "Release {} of {} published ({} artifact(s))",
                self.reference,
                self.repository,
                self.artifacts.len()
            ),
            RunStatus::Failed { stage } => format!(
                "Release {} of {} failed at {} stage",
                self.reference, self.repository, stage
            ),
            other => format!(
                "Release {} of {} in progress ({})",
                self.reference, self.repository, other
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ReleaseEvent;

    fn event() -> ReleaseEvent {
        ReleaseEvent::from_json(
            r#"{
                "action": "published",
                "release": { "tag_name": "v1.2.0" },
                "repository": {
                    "full_name": "acme/limelight",
                    "clone_url": "https://example.com/acme/limelight.git"
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn failure_is_terminal_and_names_the_stage() {
        let mut report = RunReport::new(&event());
        report.record_failure(Stage::Build, chrono::Utc::now(), "boom".to_string());

        assert!(!report.succeeded());
        assert!(report.finished_at.is_some());
        assert_eq!(report.status, RunStatus::Failed { stage: Stage::Build });
        let failure = report.failure.as_ref().unwrap();
        assert_eq!(failure.stage, Stage::Build);
        assert_eq!(failure.message, "boom");
        assert!(report.summary().contains("failed at Build stage"));
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut report = RunReport::new(&event());
        report.record_success(Stage::Acquire, chrono::Utc::now());
        report.finish();

        let raw = serde_json::to_string(&report).unwrap();
        let parsed: RunReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.status, RunStatus::Succeeded);
        assert_eq!(parsed.stages.len(), 1);
        assert_eq!(parsed.stages[0].stage, Stage::Acquire);
    }
}
