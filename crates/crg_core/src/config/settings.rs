//! Settings struct with TOML-based sections.
//!
//! Every field has a serde default so a partial (or absent) config file
//! still yields a complete `Settings`.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Automation interface settings.
    #[serde(default)]
    pub automation: AutomationSettings,

    /// File chooser settings.
    #[serde(default)]
    pub dialog: DialogSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which automation object to drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSettings {
    /// Registered prog id of the application's automation object.
    #[serde(default = "default_prog_id")]
    pub prog_id: String,
}

fn default_prog_id() -> String {
    "CANoe.Application".to_string()
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            prog_id: default_prog_id(),
        }
    }
}

/// File chooser filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogSettings {
    /// Filter label shown in the native dialog.
    #[serde(default = "default_filter_label")]
    pub filter_label: String,

    /// Accepted extension, without the leading dot.
    #[serde(default = "default_filter_extension")]
    pub filter_extension: String,
}

fn default_filter_label() -> String {
    "Configuration files".to_string()
}

fn default_filter_extension() -> String {
    "cfg".to_string()
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            filter_label: default_filter_label(),
            filter_extension: default_filter_extension(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is not set.
    #[serde(default)]
    pub level: LogLevel,
}
