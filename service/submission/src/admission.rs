use std::sync::Arc;

use async_trait::async_trait;
use domain_submission::{
    exception::{SubmissionException, SubmissionResult},
    model::vo::{AdmissionPolicy, Ceiling, JobHandle, RunningSet},
    service::{AdmissionService, SchedulerClient},
};
use tokio::time::Instant;
use tracing::Span;
use typed_builder::TypedBuilder;

/// Gates callers on how many of their jobs the scheduler still runs.
#[derive(TypedBuilder)]
pub struct AdmissionControllerImpl {
    scheduler: Arc<dyn SchedulerClient>,
    #[builder(default)]
    policy: AdmissionPolicy,
    #[builder(default = Span::none())]
    span: Span,
}

#[async_trait]
impl AdmissionService for AdmissionControllerImpl {
    async fn list_running(&self) -> SubmissionResult<RunningSet> {
        self.scheduler.list_running().await
    }

    async fn wait(&self, jobs: &[JobHandle], wait_for_full_drain: bool) -> SubmissionResult<()> {
        let ceiling = self.policy.effective_ceiling(wait_for_full_drain);
        if ceiling == Ceiling::Unbounded {
            return Ok(());
        }
        let started = Instant::now();
        loop {
            // A listing error ends the wait, retrying could block forever.
            let running = self.scheduler.list_running().await?.count_tracked(jobs);
            if !ceiling.is_exceeded_by(running) {
                tracing::debug!(
                    parent: &self.span,
                    "{running} of {} tracked jobs running, admitted after {:?}",
                    jobs.len(),
                    started.elapsed()
                );
                return Ok(());
            }
            if let Some(max_wait) = self.policy.max_wait {
                let waited = started.elapsed();
                if waited >= max_wait {
                    tracing::warn!(parent: &self.span, "Stopped waiting for {running} running jobs");
                    return Err(SubmissionException::WaitTimeout {
                        waited,
                        still_running: running,
                    });
                }
            }
            tracing::trace!(
                parent: &self.span,
                "{running} of {} tracked jobs running, ceiling {ceiling:?}",
                jobs.len()
            );
            tokio::time::sleep(self.policy.poll_interval).await;
        }
    }

    fn submission_log_names(&self, jobs: &[JobHandle]) -> Vec<String> {
        jobs.iter().map(JobHandle::log_file_name).collect()
    }

    fn config(&self) -> &AdmissionPolicy {
        &self.policy
    }
}
