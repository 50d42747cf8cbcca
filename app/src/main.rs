mod infrastructure;
mod server;

use std::process::ExitCode;

use colored::Colorize;

use crate::infrastructure::{config::build_config, telemetry, ServiceProvider};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match build_config() {
        Ok(x) => x,
        Err(e) => {
            eprintln!("{}: {e:#}", "Failed to build config".red());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::initialize_telemetry(&config.telemetry) {
        eprintln!("{}: {e:#}", "Failed to initialize logger".red());
        return ExitCode::FAILURE;
    };

    let service_provider = ServiceProvider::build(&config);
    match server::run(&config, &service_provider).await {
        Ok(logs) => {
            for log in logs {
                println!("{log}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("{}: {e:#}", "Batch failed".red());
            ExitCode::FAILURE
        }
    }
}
