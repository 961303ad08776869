//! Test utilities and mocks for extconf unit tests.
//!
//! [`MockExecutor`] stands in for real subprocesses so the resolvers can be
//! driven with scripted `pkg-config` / `cython` output.
//!
//! # Example
//!
//! ```rust,ignore
//! use extconf::test_support::{MockExecutor, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let exec = MockExecutor::new();
//!     exec.expect("pkg-config --libs-only-l osd", MockProcessOutput::success("-losd"));
//!
//!     // Hand `&exec` to anything taking a ProcessExecutor...
//! }
//! ```

use std::path::Path;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::util::process::{ProcessBuilder, ProcessExecutor, ProcessOutput};

/// Mock process output for testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(mock: MockProcessOutput) -> Self {
        ProcessOutput {
            code: Some(mock.status),
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if a command matches this pattern.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s.as_str()),
            CommandPattern::Contains(s) => cmd.contains(s.as_str()),
        }
    }
}

/// What a matched command produces.
#[derive(Debug, Clone)]
enum MockResult {
    Output(MockProcessOutput),
    /// The program could not be started at all.
    SpawnError(String),
}

#[derive(Debug, Clone)]
struct CommandExpectation {
    pattern: CommandPattern,
    result: MockResult,
    /// Dropped after its first match.
    once: bool,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    default_output: Option<MockProcessOutput>,
}

/// Mock executor that returns scripted output for matching commands.
///
/// Expectations are checked in the order they were added; the first match
/// wins. A one-shot expectation is removed once matched, so the same command
/// can answer differently on a later call. Commands matching nothing fail to
/// spawn unless a default is set.
#[derive(Debug, Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    fn push(&self, pattern: CommandPattern, result: MockResult, once: bool) -> &Self {
        self.state
            .lock()
            .unwrap()
            .expectations
            .push(CommandExpectation {
                pattern,
                result,
                once,
            });
        self
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(
            CommandPattern::Exact(cmd.to_string()),
            MockResult::Output(output),
            false,
        )
    }

    /// Add an exact-match expectation that answers a single call.
    pub fn expect_once(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(
            CommandPattern::Exact(cmd.to_string()),
            MockResult::Output(output),
            true,
        )
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(
            CommandPattern::StartsWith(prefix.to_string()),
            MockResult::Output(output),
            false,
        )
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.push(
            CommandPattern::Contains(substring.to_string()),
            MockResult::Output(output),
            false,
        )
    }

    /// Commands starting with `prefix` fail to spawn.
    pub fn expect_spawn_error(&self, prefix: &str, message: &str) -> &Self {
        self.push(
            CommandPattern::StartsWith(prefix.to_string()),
            MockResult::SpawnError(message.to_string()),
            false,
        )
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.state.lock().unwrap().default_output = Some(output);
        self
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl ProcessExecutor for MockExecutor {
    fn exec(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let full_cmd = cmd.display_command();
        let mut state = self.state.lock().unwrap();
        state.calls.push(full_cmd.clone());

        let position = state
            .expectations
            .iter()
            .position(|exp| exp.pattern.matches(&full_cmd));
        let matched = match position {
            Some(idx) if state.expectations[idx].once => {
                Some(state.expectations.remove(idx).result)
            }
            Some(idx) => Some(state.expectations[idx].result.clone()),
            None => None,
        };

        match matched {
            Some(MockResult::Output(output)) => Ok(output.into()),
            Some(MockResult::SpawnError(message)) => {
                bail!("failed to spawn `{}`: {}", cmd.get_program().display(), message)
            }
            None => match state.default_output.clone() {
                Some(output) => Ok(output.into()),
                None => bail!("unexpected command: {}", full_cmd),
            },
        }
    }
}

/// Write a file, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_first_match_wins() {
        let exec = MockExecutor::new();
        exec.expect("pkg-config --libs-only-l osd", MockProcessOutput::success("-losd"));
        exec.expect_prefix("pkg-config", MockProcessOutput::failure(1, "nope"));

        let out = exec
            .exec(&ProcessBuilder::new("pkg-config").args(["--libs-only-l", "osd"]))
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "-losd");

        let out = exec
            .exec(&ProcessBuilder::new("pkg-config").args(["--libs-only-L", "osd"]))
            .unwrap();
        assert!(!out.success());
        assert_eq!(exec.calls().len(), 2);
    }

    #[test]
    fn test_mock_executor_once_then_fallback() {
        let exec = MockExecutor::new();
        exec.expect_once("pkg-config --libs-only-l osd", MockProcessOutput::success("-losd"));
        exec.expect("pkg-config --libs-only-l osd", MockProcessOutput::failure(1, ""));

        let cmd = ProcessBuilder::new("pkg-config").args(["--libs-only-l", "osd"]);
        assert!(exec.exec(&cmd).unwrap().success());
        assert!(!exec.exec(&cmd).unwrap().success());
        assert!(!exec.exec(&cmd).unwrap().success());
    }

    #[test]
    fn test_mock_executor_unmatched_and_default() {
        let exec = MockExecutor::new();
        assert!(exec.exec(&ProcessBuilder::new("cython")).is_err());

        exec.set_default(MockProcessOutput::success("ok"));
        assert_eq!(exec.exec(&ProcessBuilder::new("cython")).unwrap().stdout, "ok");
    }

    #[test]
    fn test_mock_executor_spawn_error() {
        let exec = MockExecutor::new();
        exec.expect_spawn_error("cython", "not found");
        let err = exec.exec(&ProcessBuilder::new("cython")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
