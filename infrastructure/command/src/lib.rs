//! Command line collaborators: a shell runner and the LSF scheduler client.

mod lsf;
mod shell;

pub use lsf::{parse_job_listing, parse_submit_output, LsfClient};
pub use shell::ShellCommandRunner;
