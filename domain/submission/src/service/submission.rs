use std::path::Path;

use async_trait::async_trait;

use crate::exception::SubmissionResult;
use crate::model::vo::{CommandBody, JobHandle, ResourceSpec};

#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Render, persist and submit a job script.
    ///
    /// `output_dir` and `output_name` fall back to the service defaults. The
    /// script file is overwritten if it exists.
    async fn submit(
        &self,
        spec: &ResourceSpec,
        body: &CommandBody,
        output_dir: Option<&Path>,
        output_name: Option<&str>,
    ) -> SubmissionResult<JobHandle>;
}
