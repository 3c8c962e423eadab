//! `[logging]` section of the desk file

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Modules that accept a per-component level under
/// `[logging.component_levels]`.
pub const COMPONENTS: [&str; 8] = [
    "cli",
    "config",
    "executor",
    "matching",
    "roster",
    "rules",
    "sequencer",
    "service",
];

/// How log lines are rendered on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line, coloured, for someone watching a terminal
    #[default]
    Pretty,
    /// One JSON object per event, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected pretty or json)", other)),
        }
    }
}

/// Log settings stored alongside the roster.
///
/// The desk defaults to `warn` so command output is not buried in events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base filter level, e.g. `warn` or `info`
    pub level: String,
    pub format: LogFormat,
    /// Overrides keyed by desk component, e.g. `executor = "debug"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<HashMap<String, String>>,
}

impl LoggingConfig {
    /// First component override that names no desk module, if any.
    pub fn unknown_component(&self) -> Option<&str> {
        let levels = self.component_levels.as_ref()?;
        let mut names: Vec<&str> = levels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.into_iter().find(|name| !COMPONENTS.contains(name))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
        }
    }
}
