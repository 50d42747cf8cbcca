use std::path::Path;

use async_trait::async_trait;
use mockall::mock;

use crate::{
    exception::SubmissionResult,
    model::vo::{JobHandle, RunningSet},
    service::{CommandOutput, CommandRunner, SchedulerClient, ShellCommand},
};

mock! {
    pub CommandRunner {}
    #[async_trait]
    impl CommandRunner for CommandRunner {
        async fn run(&self, command: &ShellCommand) -> anyhow::Result<CommandOutput>;
    }
}

mock! {
    pub SchedulerClient {}
    #[async_trait]
    impl SchedulerClient for SchedulerClient {
        async fn submit_script(&self, script_path: &Path) -> SubmissionResult<JobHandle>;
        async fn list_running(&self) -> SubmissionResult<RunningSet>;
    }
}
