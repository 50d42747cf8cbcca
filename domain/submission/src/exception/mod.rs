use std::time::Duration;

use thiserror::Error;

pub type SubmissionResult<T> = Result<T, SubmissionException>;

#[derive(Error, Debug)]
pub enum SubmissionException {
    #[error("Invalid resource parameter `{field}`: {reason}.")]
    Validation { field: &'static str, reason: String },

    #[error("Scheduler rejected the submission (exit status: {status:?}): {stderr}")]
    Submission { status: Option<i32>, stderr: String },

    #[error("Unable to find a job id in submission output: {output:?}.")]
    Parse { output: String },

    #[error("Scheduler queue listing is malformed, {reason}: {output:?}")]
    UnexpectedResult { reason: String, output: String },

    #[error("Gave up waiting after {waited:?}, {still_running} tracked jobs still running.")]
    WaitTimeout {
        waited: Duration,
        still_running: usize,
    },

    #[error("Submission internal error: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl SubmissionException {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<anyhow::Error> for SubmissionException {
    fn from(e: anyhow::Error) -> Self {
        SubmissionException::Internal { source: e }
    }
}
