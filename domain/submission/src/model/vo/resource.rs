//! Resources requested by a job submission.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::exception::{SubmissionException, SubmissionResult};

/// Upper bound of the exported `NUMEXPR_MAX_THREADS`.
pub const MAX_WORKER_THREADS: usize = 64;

/// Typed job-resource parameters that fully determine a rendered script header.
#[derive(TypedBuilder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Queue to submit to.
    #[builder(setter(into))]
    pub queue: String,
    /// Number of tasks (slots) requested.
    #[builder(default = ResourceSpec::default_task_count())]
    #[serde(default = "ResourceSpec::default_task_count")]
    pub task_count: usize,
    /// Wall-clock limit in hours.
    #[builder(default = ResourceSpec::default_max_time_hours())]
    #[serde(default = "ResourceSpec::default_max_time_hours")]
    pub max_time_hours: u32,
    #[builder(default = ResourceSpec::default_job_name(), setter(into))]
    #[serde(default = "ResourceSpec::default_job_name")]
    pub job_name: String,
    /// Value exported as `PYTHONPATH`, written verbatim.
    #[builder(default = ResourceSpec::default_python_path(), setter(into))]
    #[serde(default = "ResourceSpec::default_python_path")]
    pub python_path: String,
    /// Extra exports, rendered in order after the fixed ones.
    #[builder(default)]
    #[serde(default)]
    pub environment: Vec<EnvVar>,
    /// Host placement hint, rendered as `#BSUB -m`.
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub placement: Option<String>,
    /// Arbitrary `#BSUB -<flag> <value>` lines, rendered in order.
    #[builder(default)]
    #[serde(default)]
    pub extra_directives: Vec<Directive>,
}

/// A single `export NAME=VALUE` line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// A single `#BSUB -<flag> <value>` line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub flag: char,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Directive {
    pub fn new(flag: char, value: impl Into<String>) -> Self {
        Self {
            flag,
            value: value.into(),
        }
    }
}

impl ResourceSpec {
    pub fn default_task_count() -> usize {
        1
    }
    pub fn default_max_time_hours() -> u32 {
        1500
    }
    pub fn default_job_name() -> String {
        "LSF_Sub".to_string()
    }
    pub fn default_python_path() -> String {
        r#""""#.to_string()
    }

    /// `min(task_count * 4, 64)`, exported as `NUMEXPR_MAX_THREADS`.
    pub fn max_worker_threads(&self) -> usize {
        self.task_count.saturating_mul(4).min(MAX_WORKER_THREADS)
    }

    /// Checks the invariants a scheduler would otherwise reject after submission.
    pub fn validate(&self) -> SubmissionResult<()> {
        if self.queue.trim().is_empty() {
            return Err(SubmissionException::validation("queue", "must not be empty"));
        }
        if self.task_count < 1 {
            return Err(SubmissionException::validation(
                "task_count",
                format!("must be at least 1, got {}", self.task_count),
            ));
        }
        if self.max_time_hours < 1 {
            return Err(SubmissionException::validation(
                "max_time_hours",
                format!("must be at least 1, got {}", self.max_time_hours),
            ));
        }
        if self.job_name.trim().is_empty() {
            return Err(SubmissionException::validation("job_name", "must not be empty"));
        }
        single_line("queue", &self.queue)?;
        single_line("job_name", &self.job_name)?;
        single_line("python_path", &self.python_path)?;
        if let Some(placement) = &self.placement {
            single_line("placement", placement)?;
        }
        for var in self.environment.iter() {
            if var.name.is_empty()
                || var.name.contains('=')
                || var.name.contains(char::is_whitespace)
            {
                return Err(SubmissionException::validation(
                    "environment",
                    format!("{:?} is not a valid variable name", var.name),
                ));
            }
            single_line("environment", &var.value)?;
        }
        if let Some(flag) = self
            .extra_directives
            .iter()
            .map(|d| d.flag)
            .find(|f| !f.is_ascii_alphabetic())
        {
            return Err(SubmissionException::validation(
                "extra_directives",
                format!("{flag:?} is not a scheduler flag"),
            ));
        }
        for directive in self.extra_directives.iter() {
            single_line("extra_directives", &directive.value)?;
        }
        Ok(())
    }

    /// The submission parameters as an ordered listing.
    pub fn config(&self) -> Vec<(String, String)> {
        let mut config = vec![
            ("queue".to_string(), self.queue.clone()),
            ("n_tasks".to_string(), self.task_count.to_string()),
            ("max_time".to_string(), self.max_time_hours.to_string()),
            ("job_name".to_string(), self.job_name.clone()),
        ];
        config.extend(self.extra_directives.iter().map(|d| (d.flag.to_string(), d.value.clone())));
        config
    }
}

/// Every value lands on one header line.
fn single_line(field: &'static str, value: &str) -> SubmissionResult<()> {
    if value.contains(['\n', '\r']) {
        return Err(SubmissionException::validation(
            field,
            format!("{value:?} must not contain line breaks"),
        ));
    }
    Ok(())
}
