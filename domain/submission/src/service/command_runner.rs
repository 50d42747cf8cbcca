//! Capability to run an external command line.

use std::path::PathBuf;

use async_trait::async_trait;

/// A shell command line and where to run it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellCommand {
    pub line: String,
    /// Working directory of the child, the caller's own when `None`.
    pub working_dir: Option<PathBuf>,
}

impl ShellCommand {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            working_dir: None,
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Captured result of one command invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[inline]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &ShellCommand) -> anyhow::Result<CommandOutput>;
}
