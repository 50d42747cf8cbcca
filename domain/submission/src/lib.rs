//! Job submission and admission control over an external batch scheduler.

pub mod exception;
#[cfg(feature = "mock")]
pub mod mock;
pub mod model;
pub mod service;
