//! External command invocation.
//!
//! Every stage is a blocking invocation of an opaque external tool. The
//! `CommandRunner` trait is the seam between the pipeline and the operating
//! system: production code spawns real processes through tokio, tests script
//! tool behavior without spawning anything.

use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Description of one external command invocation
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Start a spec for the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the invocation
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Inject one environment variable into the child process only
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument list
    pub fn arg_list(&self) -> &[String] {
        &self.args
    }

    /// Working directory, if set
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Injected environment pairs
    pub fn env_list(&self) -> &[(String, String)] {
        &self.env
    }

    /// Command line for logs; never includes environment values
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    /// Whether the command exited zero
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Captured stdout, lossily decoded
    pub stdout: String,
    /// Captured stderr, lossily decoded
    pub stderr: String,
}

impl CapturedOutput {
    /// A successful output with the given stdout (test construction helper)
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Diagnostic text for error messages: stderr if present, else stdout
    pub fn diagnostic(&self) -> String {
        let text = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };
        text.to_string()
    }
}

/// Seam for invoking external tools
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Locate a tool binary; `Err` carries a human-readable reason
    fn locate(&self, program: &str) -> std::result::Result<PathBuf, String>;

    /// Run the command to completion, capturing output
    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CapturedOutput>;
}

/// Production runner backed by real processes
///
/// The host scheduler supplies the publish credentials in the runner's own
/// environment, and child processes inherit that environment by default.
/// The runner therefore scrubs the credential variables from every child;
/// a variable injected explicitly through `CommandSpec::env` still reaches
/// that one child, which is how the Publish invocation gets them.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    scrub_env: Vec<String>,
}

impl ProcessRunner {
    /// Create a process runner scrubbing the conventional credential variables
    pub fn new() -> Self {
        Self::with_scrubbed_env([
            crate::config::USERNAME_VAR.to_string(),
            crate::config::TOKEN_VAR.to_string(),
        ])
    }

    /// Create a process runner scrubbing the given variables from children
    pub fn with_scrubbed_env(vars: impl IntoIterator<Item = String>) -> Self {
        Self {
            scrub_env: vars.into_iter().collect(),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ProcessRunner {
    fn locate(&self, program: &str) -> std::result::Result<PathBuf, String> {
        which::which(program).map_err(|e| e.to_string())
    }

    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CapturedOutput> {
        log::debug!("exec: {}", spec.display_line());

        let mut command = Command::new(spec.program());
        command.args(spec.arg_list());
        if let Some(cwd) = spec.cwd() {
            command.current_dir(cwd);
        }
        // Removals first: an explicit injection below overrides the scrub,
        // so only specs that ask for a credential ever pass one on.
        for key in &self.scrub_env {
            command.env_remove(key);
        }
        for (key, value) in spec.env_list() {
            command.env(key, value);
        }

        let output = command.output().await?;
        Ok(CapturedOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_line_joins_program_and_args() {
        let spec = CommandSpec::new("uv")
            .arg("build")
            .args(["--out-dir", "dist"]);
        assert_eq!(spec.display_line(), "uv build --out-dir dist");
    }

    #[test]
    fn display_line_omits_injected_environment() {
        let spec = CommandSpec::new("uv")
            .arg("publish")
            .env("UV_PUBLISH_TOKEN", "pypi-secret");
        assert!(!spec.display_line().contains("pypi-secret"));
    }

    #[test]
    fn diagnostic_prefers_stderr() {
        let output = CapturedOutput {
            success: false,
            code: Some(1),
            stdout: "progress noise".to_string(),
            stderr: "fatal: not found\n".to_string(),
        };
        assert_eq!(output.diagnostic(), "fatal: not found");
    }

    #[test]
    fn diagnostic_falls_back_to_stdout() {
        let output = CapturedOutput {
            success: false,
            code: Some(2),
            stdout: "error on stdout\n".to_string(),
            stderr: "  ".to_string(),
        };
        assert_eq!(output.diagnostic(), "error on stdout");
    }
}
