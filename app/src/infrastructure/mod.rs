pub mod config;
mod service_provider;
pub mod telemetry;

pub use service_provider::ServiceProvider;
