use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use domain_submission::{
    exception::{SubmissionException, SubmissionResult},
    model::vo::{CommandBody, JobHandle, ResourceSpec},
    service::{script_builder, SchedulerClient, SubmissionService},
};
use tracing::Span;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct SubmissionServiceImpl {
    scheduler: Arc<dyn SchedulerClient>,
    /// Where scripts go when the caller names no directory.
    #[builder(default = PathBuf::from("."), setter(into))]
    default_output_dir: PathBuf,
    #[builder(default = SubmissionServiceImpl::default_script_name(), setter(into))]
    default_script_name: String,
    #[builder(default = Span::none())]
    span: Span,
}

impl SubmissionServiceImpl {
    pub fn default_script_name() -> String {
        "lsf_submission".to_string()
    }
}

#[async_trait]
impl SubmissionService for SubmissionServiceImpl {
    async fn submit(
        &self,
        spec: &ResourceSpec,
        body: &CommandBody,
        output_dir: Option<&Path>,
        output_name: Option<&str>,
    ) -> SubmissionResult<JobHandle> {
        spec.validate()?;
        let name = output_name.unwrap_or(&self.default_script_name);
        if name.trim().is_empty() {
            return Err(SubmissionException::validation("output_name", "must not be empty"));
        }
        let dir = absolute_dir(output_dir.unwrap_or(&self.default_output_dir))?;
        let script = script_builder::render(spec, body);

        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Unable to create output directory {}", dir.display()))?;
        let path = dir.join(name);
        tokio::fs::write(&path, script.as_str())
            .await
            .with_context(|| format!("Unable to write job script {}", path.display()))?;
        tracing::debug!(parent: &self.span, path = %path.display(), "Wrote job script");

        let job = self.scheduler.submit_script(&path).await?;
        tracing::info!(
            parent: &self.span,
            job = %job,
            queue = %spec.queue,
            "Submitted {}", spec.job_name
        );
        Ok(job)
    }
}

/// Anchors a relative directory at the process working directory without
/// changing it.
fn absolute_dir(dir: &Path) -> anyhow::Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Unable to read the working directory")?;
    Ok(cwd.join(dir))
}
