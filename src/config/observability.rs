use serde::{Deserialize, Serialize};

/// Crates whose logs are capped at `warn` unless a filter says otherwise.
const NOISY_TARGETS: [&str; 3] = ["hyper", "h2", "reqwest"];

/// `[observability]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[observability.logging]` section. Logs always go to stderr.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default = "default_true")]
    pub timestamps: bool,

    /// Include source file and line in each event.
    #[serde(default)]
    pub file_line: bool,

    /// Extra filter directives, e.g. `"scim_provider_admin::api=trace"`.
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            timestamps: true,
            file_line: false,
            filter: None,
        }
    }
}

impl LoggingConfig {
    /// Filter directives for this config.
    ///
    /// Without an explicit `filter` the HTTP client stack is quieted to `warn`.
    pub fn directives(&self) -> String {
        let level = self.level.as_str();
        match self.filter.as_deref().map(str::trim) {
            Some(filter) if !filter.is_empty() => format!("{level},{filter}"),
            _ => NOISY_TARGETS
                .iter()
                .fold(level.to_string(), |acc, target| format!("{acc},{target}=warn")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// Newline-delimited JSON for log shippers.
    Json,
}

fn default_true() -> bool {
    true
}
