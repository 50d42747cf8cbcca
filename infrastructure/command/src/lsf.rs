//! LSF text protocol: `bsub` for submission, `bjobs` for the queue listing.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use domain_submission::{
    exception::{SubmissionException, SubmissionResult},
    model::vo::{JobHandle, RunningSet},
    service::{CommandRunner, SchedulerClient, ShellCommand},
};
use tracing::Span;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct LsfClient {
    runner: Arc<dyn CommandRunner>,
    #[builder(default = LsfClient::default_submit_command(), setter(into))]
    submit_command: String,
    #[builder(default = LsfClient::default_list_command(), setter(into))]
    list_command: String,
    /// First token `bjobs` prints on its header line.
    #[builder(default = LsfClient::default_header_sentinel(), setter(into))]
    header_sentinel: String,
    #[builder(default = Span::none())]
    span: Span,
}

impl LsfClient {
    pub fn default_submit_command() -> String {
        "bsub".to_string()
    }
    pub fn default_list_command() -> String {
        "bjobs".to_string()
    }
    pub fn default_header_sentinel() -> String {
        "JOBID".to_string()
    }
}

#[async_trait]
impl SchedulerClient for LsfClient {
    async fn submit_script(&self, script_path: &Path) -> SubmissionResult<JobHandle> {
        let path = script_path.to_str().ok_or_else(|| {
            SubmissionException::validation(
                "script_path",
                format!("{} is not valid UTF-8", script_path.display()),
            )
        })?;
        let mut command = ShellCommand::new(format!("{} < {}", self.submit_command, shell_quote(path)));
        if let Some(dir) = script_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            command = command.current_dir(dir);
        }
        let out = self.runner.run(&command).await.map_err(|e| SubmissionException::Submission {
            status: None,
            stderr: format!("{e:#}"),
        })?;
        tracing::debug!(parent: &self.span, command = %command.line, status = ?out.status, "Ran submit command");
        if !out.success() {
            tracing::error!(parent: &self.span, "Submit command failed: {}", out.stderr.trim());
            return Err(SubmissionException::Submission {
                status: out.status,
                stderr: out.stderr,
            });
        }
        parse_submit_output(&out.stdout).map_err(|e| {
            tracing::error!(parent: &self.span, "Unexpected submit output:\n{}", out.stdout);
            e
        })
    }

    async fn list_running(&self) -> SubmissionResult<RunningSet> {
        let command = ShellCommand::new(self.list_command.as_str());
        let out = self.runner.run(&command).await.map_err(|e| {
            SubmissionException::UnexpectedResult {
                reason: format!("unable to run `{}`: {e:#}", self.list_command),
                output: String::new(),
            }
        })?;
        tracing::debug!(parent: &self.span, command = %command.line, status = ?out.status, "Ran list command");
        // LSF reports "No unfinished job found" on stderr with nothing on stdout.
        if out.stdout.trim().is_empty() {
            return Ok(RunningSet::default());
        }
        if !out.success() {
            tracing::error!(parent: &self.span, "List command failed, stdout:\n{}", out.stdout);
            return Err(SubmissionException::UnexpectedResult {
                reason: format!("`{}` exited with {:?}", self.list_command, out.status),
                output: out.stdout,
            });
        }
        parse_job_listing(&out.stdout, &self.header_sentinel).map_err(|e| {
            tracing::error!(parent: &self.span, "Failed to parse job listing:\n{}", out.stdout);
            e
        })
    }
}

/// Extracts the id from `Job <123> is submitted to queue <normal>.`
///
/// Only the second whitespace token of the first non-blank line is used, and it
/// must be wrapped in angle brackets.
pub fn parse_submit_output(output: &str) -> SubmissionResult<JobHandle> {
    let parse_error = || SubmissionException::Parse {
        output: output.to_owned(),
    };
    let line = output.lines().find(|l| !l.trim().is_empty()).ok_or_else(parse_error)?;
    line.split_whitespace()
        .nth(1)
        .and_then(|token| token.strip_prefix('<'))
        .and_then(|token| token.split_once('>'))
        .map(|(id, _)| id)
        .filter(|id| !id.is_empty())
        .map(JobHandle::from)
        .ok_or_else(parse_error)
}

/// Collects the first token of every listing line after the header.
///
/// A first line that doesn't start with `header_sentinel` means the output
/// can't be trusted, so nothing is returned for it.
pub fn parse_job_listing(output: &str, header_sentinel: &str) -> SubmissionResult<RunningSet> {
    let mut ids = output.lines().filter_map(|line| line.split_whitespace().next());
    match ids.next() {
        None => Ok(RunningSet::default()),
        Some(first) if first == header_sentinel => Ok(ids.map(JobHandle::from).collect()),
        Some(first) => Err(SubmissionException::UnexpectedResult {
            reason: format!("expected header `{header_sentinel}`, found `{first}`"),
            output: output.to_owned(),
        }),
    }
}

/// Single-quote `s` for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
