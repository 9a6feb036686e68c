use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::json;

use relay_core::DriverConfig;
use relay_model::{PollStrategy, Property};
use relay_observe::LoggerConfig;

/// Environment variable naming the JSON config file.
pub const ENV_CONFIG: &str = "RELAY_CONFIG";

/// Agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub logger: LoggerConfig,
    pub driver: DriverConfig,
    /// Digest used for cache keys (`sha256`, `sha512`).
    pub digest: String,
    /// Upper bound for the whole remote task, enforced by the supervisor.
    pub task_timeout_ms: u64,
    pub task: TaskConfig,
}

/// The task the agent fingerprints and runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskConfig {
    pub code: i64,
    pub version: i32,
    pub cache: bool,
    /// Id of the task instance whose result would be reused.
    pub source_task_id: u64,
    /// Raw task parameter text.
    pub params: String,
    /// Upstream var pool as JSON text.
    pub var_pool: String,
    pub globals: Vec<Property>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            logger: LoggerConfig::default(),
            driver: DriverConfig::default().with_poll(PollStrategy::fixed(200, 60_000)),
            digest: "sha256".to_string(),
            task_timeout_ms: 120_000,
            task: TaskConfig::default(),
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        let params = json!({
            "identifier": "relay-demo-${env}",
            "payload": {
                "MigrationType": "full-load",
                "TableMappings": "{\"rules\": [{\"object-locator\": {\"schema-name\": \"${schema}\"}}]}"
            },
            "connectivity": [
                {"instance": "rep-instance", "endpoint": "source-endpoint"}
            ],
            "deleteOnFinish": true,
            "localParams": [
                {"prop": "schema", "direct": "IN", "type": "VARCHAR", "value": "sales"}
            ]
        });
        Self {
            code: 100,
            version: 3,
            cache: true,
            source_task_id: 1,
            params: params.to_string(),
            var_pool: "[]".to_string(),
            globals: vec![Property::input("env", "dev")],
        }
    }
}

impl AgentConfig {
    /// Load from the file named by `RELAY_CONFIG`, or fall back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var(ENV_CONFIG) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.driver.validate().context("invalid driver config")?;
        Ok(cfg)
    }
}
