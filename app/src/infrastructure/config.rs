use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use domain_submission::model::vo::{AdmissionPolicy, Ceiling, ResourceSpec};
use infrastructure_command::LsfClient;
use serde::Deserialize;

use super::telemetry::TelemetryConfig;

/// Environment variables override files, e.g. `GATE__ADMISSION__CEILING=4`.
const ENV_PREFIX: &str = "GATE";

#[derive(Default, Clone, Deserialize, Debug)]
pub struct GateConfig {
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub admission: AdmissionConfig,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct SchedulerConfig {
    #[serde(default = "SchedulerConfig::default_shell")]
    pub shell: String,
    #[serde(default = "LsfClient::default_submit_command")]
    pub submit_command: String,
    #[serde(default = "LsfClient::default_list_command")]
    pub list_command: String,
    #[serde(default = "LsfClient::default_header_sentinel")]
    pub header_sentinel: String,
}

#[derive(Clone, Deserialize, Debug)]
pub struct SubmissionConfig {
    #[serde(default = "SubmissionConfig::default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "SubmissionConfig::default_script_name")]
    pub script_name: String,
    /// Shared by every job, `jobs[].name` overrides the job name.
    #[serde(default)]
    pub resources: Option<ResourceSpec>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct AdmissionConfig {
    #[serde(default)]
    pub ceiling: Ceiling,
    #[serde(default = "AdmissionConfig::default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub max_wait_secs: Option<u64>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct JobConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub commands: Vec<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub script_name: Option<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            shell: Self::default_shell(),
            submit_command: LsfClient::default_submit_command(),
            list_command: LsfClient::default_list_command(),
            header_sentinel: LsfClient::default_header_sentinel(),
        }
    }
}

impl SchedulerConfig {
    pub fn default_shell() -> String {
        "/bin/sh".to_string()
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
            script_name: Self::default_script_name(),
            resources: None,
        }
    }
}

impl SubmissionConfig {
    pub fn default_output_dir() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn default_script_name() -> String {
        "lsf_submission".to_string()
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            ceiling: Default::default(),
            poll_interval_secs: Self::default_poll_interval_secs(),
            max_wait_secs: None,
        }
    }
}

impl AdmissionConfig {
    pub fn default_poll_interval_secs() -> u64 {
        2
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_secs == 0 {
            anyhow::bail!("admission.poll_interval_secs must be at least 1");
        }
        Ok(())
    }

    pub fn policy(&self) -> AdmissionPolicy {
        AdmissionPolicy {
            ceiling: self.ceiling,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            max_wait: self.max_wait_secs.map(Duration::from_secs),
        }
    }
}

/// Loads `config.yaml` from the working directory, then every yaml file given
/// on the command line, then `GATE__*` environment variables.
pub fn build_config() -> anyhow::Result<GateConfig> {
    let files: Vec<PathBuf> = std::env::args()
        .skip(1)
        .filter(|arg| arg.ends_with("yaml") || arg.ends_with("yml"))
        .map(PathBuf::from)
        .collect();
    build_config_from(&files)
}

pub fn build_config_from(files: &[PathBuf]) -> anyhow::Result<GateConfig> {
    let mut config = config::Config::builder().add_source(
        config::File::with_name("config")
            .required(false)
            .format(config::FileFormat::Yaml),
    );
    for file in files {
        config = config.add_source(
            config::File::from(Path::new(file))
                .format(config::FileFormat::Yaml)
                .required(true),
        );
    }
    config = config.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );
    let config: GateConfig = config
        .build()?
        .try_deserialize()
        .context("Invalid configuration")?;
    config.admission.validate()?;
    Ok(config)
}
