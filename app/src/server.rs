//! Submits the configured jobs, keeping at most `admission.ceiling` of them
//! running at once.

use anyhow::Context;
use domain_submission::model::vo::{CommandBody, JobHandle};

use crate::infrastructure::config::{GateConfig, JobConfig};
use crate::infrastructure::ServiceProvider;

/// Returns the log file names of every submitted job once all have finished.
pub async fn run(config: &GateConfig, sp: &ServiceProvider) -> anyhow::Result<Vec<String>> {
    if config.jobs.is_empty() {
        tracing::warn!("No jobs configured");
        return Ok(vec![]);
    }
    let resources = config
        .submission
        .resources
        .as_ref()
        .context("`submission.resources` is required to submit jobs")?;

    let mut submitted: Vec<JobHandle> = Vec::with_capacity(config.jobs.len());
    for (i, job) in config.jobs.iter().enumerate() {
        let mut spec = resources.clone();
        if let Some(name) = &job.name {
            spec.job_name = name.clone();
        }
        let id = sp
            .submission
            .submit(
                &spec,
                &command_body(job),
                job.output_dir.as_deref(),
                job.script_name.as_deref(),
            )
            .await
            .with_context(|| format!("Failed to submit job #{i} ({})", spec.job_name))?;
        tracing::info!("Job #{i} ({}) is running as {id}", spec.job_name);
        submitted.push(id);
        sp.admission
            .wait(&submitted, false)
            .await
            .context("Failed while waiting for a free slot")?;
    }

    tracing::info!("Waiting for {} jobs to finish", submitted.len());
    sp.admission
        .wait(&submitted, true)
        .await
        .context("Failed while waiting for jobs to finish")?;
    Ok(sp.admission.submission_log_names(&submitted))
}

/// One script line per configured command.
fn command_body(job: &JobConfig) -> CommandBody {
    CommandBody::Sequence(
        job.commands
            .iter()
            .map(|cmd| if cmd.ends_with('\n') { cmd.clone() } else { format!("{cmd}\n") })
            .collect(),
    )
}
