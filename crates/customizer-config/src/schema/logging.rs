//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing_subscriber` filter directive scoped to the customizer crates.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "customizer=trace",
            LogLevel::Debug => "customizer=debug",
            LogLevel::Info => "customizer=info",
            LogLevel::Warn => "customizer=warn",
            LogLevel::Error => "customizer=error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
