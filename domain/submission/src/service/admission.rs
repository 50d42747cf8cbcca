use async_trait::async_trait;

use crate::exception::SubmissionResult;
use crate::model::vo::{AdmissionPolicy, JobHandle, RunningSet};

#[async_trait]
pub trait AdmissionService: Send + Sync {
    /// Jobs currently known to the scheduler.
    async fn list_running(&self) -> SubmissionResult<RunningSet>;

    /// Block until at most the ceiling of `jobs` are running, or none of them
    /// when `wait_for_full_drain` is set.
    async fn wait(&self, jobs: &[JobHandle], wait_for_full_drain: bool) -> SubmissionResult<()>;

    /// Log files the scheduler writes for `jobs`.
    fn submission_log_names(&self, jobs: &[JobHandle]) -> Vec<String>;

    /// The policy this controller enforces.
    fn config(&self) -> &AdmissionPolicy;
}
