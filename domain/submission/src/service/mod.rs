mod admission;
mod command_runner;
mod scheduler_client;
pub mod script_builder;
mod submission;

#[rustfmt::skip]
pub use {
    admission::AdmissionService,
    command_runner::{CommandOutput, CommandRunner, ShellCommand},
    scheduler_client::SchedulerClient,
    submission::SubmissionService,
};
