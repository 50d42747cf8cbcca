//! Narrow interface over a batch scheduler's command line tools.

use std::path::Path;

use async_trait::async_trait;

use crate::exception::SubmissionResult;
use crate::model::vo::{JobHandle, RunningSet};

#[async_trait]
pub trait SchedulerClient: Send + Sync {
    /// Submit the job document at `script_path`, returning the assigned id.
    async fn submit_script(&self, script_path: &Path) -> SubmissionResult<JobHandle>;

    /// Jobs the scheduler currently reports.
    async fn list_running(&self) -> SubmissionResult<RunningSet>;
}
