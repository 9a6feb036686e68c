use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{LoggerError, LoggerFormat, LoggerLevel};

/// Environment variable overriding [`LoggerConfig::level`].
pub const ENV_LOG_LEVEL: &str = "RELAY_LOG";
/// Environment variable overriding [`LoggerConfig::format`].
pub const ENV_LOG_FORMAT: &str = "RELAY_LOG_FORMAT";

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter expression (e.g., "info", "relay_core=debug,info").
    pub level: LoggerLevel,
    /// Include module/target names in log output.
    pub with_targets: bool,
    /// Colored output; honored only when stdout is a terminal.
    pub use_color: bool,
    /// Emit an event when an instrumented span closes (one per driver operation), with its timing.
    pub span_events: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            with_targets: true,
            use_color: true,
            span_events: false,
        }
    }
}

impl LoggerConfig {
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }

    /// Apply `RELAY_LOG` / `RELAY_LOG_FORMAT` from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, LoggerError> {
        self.with_overrides(
            std::env::var(ENV_LOG_LEVEL).ok().as_deref(),
            std::env::var(ENV_LOG_FORMAT).ok().as_deref(),
        )
    }

    /// Replace level and/or format; blank values are ignored.
    pub fn with_overrides(
        mut self,
        level: Option<&str>,
        format: Option<&str>,
    ) -> Result<Self, LoggerError> {
        if let Some(level) = level.filter(|s| !s.trim().is_empty()) {
            self.level = level.parse()?;
        }
        if let Some(format) = format.filter(|s| !s.trim().is_empty()) {
            self.format = format.parse()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = LoggerConfig::default();
        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
        assert!(!config.span_events);
    }

    #[test]
    fn partial_deserialization() {
        let config: LoggerConfig =
            serde_json::from_str(r#"{"format": "json", "spanEvents": true}"#).unwrap();
        assert_eq!(config.format, LoggerFormat::Json);
        assert!(config.span_events);
        assert_eq!(config.level, LoggerLevel::default());
    }

    #[test]
    fn overrides_replace_values() {
        let config = LoggerConfig::default()
            .with_overrides(Some("relay_core=debug,info"), Some("json"))
            .unwrap();
        assert_eq!(config.level.as_str(), "relay_core=debug,info");
        assert_eq!(config.format, LoggerFormat::Json);
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let config = LoggerConfig::default().with_overrides(Some(" "), None).unwrap();
        assert_eq!(config, LoggerConfig::default());
    }

    #[test]
    fn invalid_override_is_an_error() {
        assert!(LoggerConfig::default().with_overrides(None, Some("xml")).is_err());
    }
}
