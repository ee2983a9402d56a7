//! Command line argument parsing and validation.

use crate::config::DEFAULT_UV_VERSION;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release pipeline for publishing a Python package to PyPI
#[derive(Parser, Debug)]
#[command(
    name = "pypi_release_runner",
    version,
    about = "Publishes a package release to PyPI when its tag goes live",
    long_about = "Runs the five-stage release pipeline for one published-release event:
checkout, toolchain provisioning, build, publish, cache cleanup.

Usage:
  pypi_release_runner run --event /path/to/event.json
  pypi_release_runner plan"
)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Show extra detail while running
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress everything except errors
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute the pipeline for one release event
    Run {
        /// Path to the release event payload (JSON)
        #[arg(long, env = "RELEASE_EVENT_PATH", value_name = "PATH")]
        event: PathBuf,

        /// Directory to check the release ref out into (default: a fresh temp dir)
        #[arg(long, value_name = "DIR")]
        workdir: Option<PathBuf>,

        /// Exact build tool version the worker must provide
        #[arg(long, value_name = "VERSION", default_value = DEFAULT_UV_VERSION)]
        uv_version: String,

        /// Upload endpoint override (default: the index's own)
        #[arg(long, value_name = "URL")]
        index_url: Option<String>,

        /// Write the run report as JSON to this path
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },

    /// Print the ordered stage plan without executing anything
    Plan,
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Run { .. } => "run",
            Command::Plan => "plan",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Run { uv_version, .. } = &self.command
            && semver::Version::parse(uv_version).is_err()
        {
            return Err(format!(
                "--uv-version '{uv_version}' is not a valid semantic version"
            ));
        }
        Ok(())
    }
}
