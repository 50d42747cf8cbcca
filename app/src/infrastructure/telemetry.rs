use serde::Deserialize;
use tracing::metadata::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Logging configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct TelemetryConfig {
    #[serde(default = "default_enabled")]
    pub enable: bool,
    /// Level used when no filter rule matches.
    #[serde(default = "Default::default")]
    pub max_level: LoggingLevel,
    /// Extra `EnvFilter` directives, e.g. `infrastructure_command=debug`.
    #[serde(default = "Default::default")]
    pub level_filter: String,
    /// Environment variable to read directives from.
    #[serde(default = "Default::default")]
    pub level_filter_env: String,
    #[serde(default = "Default::default")]
    pub console: ConsoleConfig,
    #[serde(default = "Default::default")]
    pub file: FileConfig,
}

#[derive(Default, Deserialize, Clone, Debug)]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Off,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ConsoleConfig {
    #[serde(default = "default_enabled")]
    pub enable: bool,
    /// Print file, line, thread and target.
    #[serde(default = "Default::default")]
    pub enable_debug_logging: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct FileConfig {
    #[serde(default = "Default::default")]
    pub enable: bool,
    #[serde(default = "Default::default")]
    pub enable_debug_logging: bool,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "Default::default")]
    pub rolling_time: RotationLevel,
}

#[derive(Default, Deserialize, Clone, Debug)]
pub enum RotationLevel {
    Minutely,
    Hourly,
    Daily,
    #[default]
    Never,
}

fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "./logs".to_string()
}

fn default_prefix() -> String {
    "submission-gate.log".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable: default_enabled(),
            max_level: Default::default(),
            level_filter: Default::default(),
            level_filter_env: Default::default(),
            console: Default::default(),
            file: Default::default(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enable: default_enabled(),
            enable_debug_logging: Default::default(),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enable: Default::default(),
            enable_debug_logging: Default::default(),
            path: default_path(),
            prefix: default_prefix(),
            rolling_time: Default::default(),
        }
    }
}

impl From<LoggingLevel> for LevelFilter {
    fn from(val: LoggingLevel) -> Self {
        match val {
            LoggingLevel::Error => LevelFilter::ERROR,
            LoggingLevel::Warn => LevelFilter::WARN,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Debug => LevelFilter::DEBUG,
            LoggingLevel::Trace => LevelFilter::TRACE,
            LoggingLevel::Off => LevelFilter::OFF,
        }
    }
}

impl From<LoggingLevel> for Directive {
    fn from(val: LoggingLevel) -> Self {
        let level: LevelFilter = val.into();
        level.into()
    }
}

impl From<RotationLevel> for Rotation {
    fn from(val: RotationLevel) -> Self {
        match val {
            RotationLevel::Minutely => Rotation::MINUTELY,
            RotationLevel::Hourly => Rotation::HOURLY,
            RotationLevel::Daily => Rotation::DAILY,
            RotationLevel::Never => Rotation::NEVER,
        }
    }
}

impl TelemetryConfig {
    fn filter(&self) -> EnvFilter {
        let mut filter_builder = EnvFilter::builder();
        if !self.level_filter_env.is_empty() {
            filter_builder = filter_builder.with_env_var(self.level_filter_env.as_str());
        }
        filter_builder
            .with_default_directive(self.max_level.clone().into())
            .parse_lossy(self.level_filter.as_str())
    }
}

/// Installs the global subscriber: a console layer and an optional file layer.
pub fn initialize_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    if !config.enable {
        return Ok(());
    }
    let console = config.console.enable.then(|| {
        let debug = config.console.enable_debug_logging;
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(debug)
            .with_line_number(debug)
            .with_thread_ids(debug)
            .with_target(debug)
            .with_filter(config.filter())
    });
    let file = config.file.enable.then(|| {
        let file = &config.file;
        let debug = file.enable_debug_logging;
        let appender = RollingFileAppender::new(
            file.rolling_time.clone().into(),
            &file.path,
            &file.prefix,
        );
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
            .with_file(debug)
            .with_line_number(debug)
            .with_thread_ids(debug)
            .with_target(debug)
            .with_filter(config.filter())
    });
    Registry::default()
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}
