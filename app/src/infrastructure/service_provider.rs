use std::sync::Arc;

use domain_submission::service::{AdmissionService, SchedulerClient, SubmissionService};
use infrastructure_command::{LsfClient, ShellCommandRunner};
use service_submission::{AdmissionControllerImpl, SubmissionServiceImpl};

use super::config::GateConfig;

pub struct ServiceProvider {
    pub submission: Arc<dyn SubmissionService>,
    pub admission: Arc<dyn AdmissionService>,
}

impl ServiceProvider {
    pub fn build(config: &GateConfig) -> Self {
        let runner = Arc::new(ShellCommandRunner::new(config.scheduler.shell.as_str()));
        let scheduler: Arc<dyn SchedulerClient> = Arc::new(
            LsfClient::builder()
                .runner(runner)
                .submit_command(config.scheduler.submit_command.as_str())
                .list_command(config.scheduler.list_command.as_str())
                .header_sentinel(config.scheduler.header_sentinel.as_str())
                .span(tracing::info_span!("lsf"))
                .build(),
        );
        Self::with_scheduler(config, scheduler)
    }

    pub fn with_scheduler(config: &GateConfig, scheduler: Arc<dyn SchedulerClient>) -> Self {
        let submission = SubmissionServiceImpl::builder()
            .scheduler(scheduler.clone())
            .default_output_dir(config.submission.output_dir.as_path())
            .default_script_name(config.submission.script_name.as_str())
            .span(tracing::info_span!("submission"))
            .build();
        let admission = AdmissionControllerImpl::builder()
            .scheduler(scheduler)
            .policy(config.admission.policy())
            .span(tracing::info_span!("admission"))
            .build();
        Self {
            submission: Arc::new(submission),
            admission: Arc::new(admission),
        }
    }
}
