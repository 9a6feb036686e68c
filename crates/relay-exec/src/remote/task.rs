use std::fmt;

use relay_cache::render_placeholders;
use relay_model::{
    GlobalParams, JobHandle, JobSpec, Labels, Property, StartMode, VarPool,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::ExecError;

/// Endpoint pair whose connectivity is verified before the job is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityCheck {
    /// Execution instance reference (e.g. a replication instance ARN).
    pub instance: String,
    pub endpoint: String,
}

/// User-facing parameters of a remote task, as stored in the task definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTaskParams {
    /// Identifier of the job to create. Ignored when `restartHandle` is set.
    #[serde(default)]
    pub identifier: String,
    /// Provider request body. String leaves may reference `${name}` placeholders.
    #[serde(default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Reuse this existing job instead of creating a new one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_handle: Option<JobHandle>,
    /// Start mode for a restarted job. Fresh jobs always use `start-replication`.
    #[serde(default)]
    pub start_mode: StartMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connectivity: Vec<ConnectivityCheck>,
    /// Delete the job once it stopped.
    #[serde(default)]
    pub delete_on_finish: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_params: Vec<Property>,
}

impl RemoteTaskParams {
    /// Parse raw parameter text; fails before any remote call is made.
    pub fn parse(raw: &str) -> Result<Self, ExecError> {
        let params: Self = serde_json::from_str(raw)?;
        params.validate()?;
        Ok(params)
    }

    /// Rules:
    /// - `identifier` is not blank unless `restartHandle` is set;
    /// - `restartHandle` is not blank;
    /// - connectivity checks name both sides;
    /// - label keys are usable as provider tag keys.
    pub fn validate(&self) -> Result<(), ExecError> {
        self.labels.validate()?;
        match &self.restart_handle {
            Some(handle) if handle.as_str().trim().is_empty() => {
                return Err(ExecError::InvalidSpec("restartHandle is empty".into()));
            }
            None if self.identifier.trim().is_empty() => {
                return Err(ExecError::InvalidSpec(
                    "identifier is required unless restartHandle is set".into(),
                ));
            }
            _ => {}
        }
        if let Some(check) = self
            .connectivity
            .iter()
            .find(|c| c.instance.trim().is_empty() || c.endpoint.trim().is_empty())
        {
            return Err(ExecError::InvalidSpec(format!(
                "connectivity check needs both instance and endpoint: {check:?}"
            )));
        }
        Ok(())
    }

    pub fn is_restart(&self) -> bool {
        self.restart_handle.is_some()
    }

    /// Render placeholders and settle the start mode.
    ///
    /// Local params take precedence over global ones with the same name.
    pub fn resolve(&self, globals: &GlobalParams) -> RemoteTaskConfig {
        let mut values: VarPool = self.local_params.iter().cloned().collect();
        for (name, property) in globals.iter() {
            if !values.contains(name) {
                values.push(property.clone());
            }
        }

        let spec = match &self.restart_handle {
            Some(_) => None,
            None => {
                let mut payload = self.payload.clone();
                render_value(&mut payload, &values);
                let mut labels = self.labels.clone();
                labels.map_values(|v| render_placeholders(v, &values));
                Some(JobSpec {
                    identifier: render_placeholders(&self.identifier, &values),
                    payload,
                    labels,
                })
            }
        };
        let start_mode = if self.is_restart() {
            self.start_mode
        } else {
            StartMode::StartReplication
        };

        RemoteTaskConfig {
            spec,
            restart: self.restart_handle.clone(),
            start_mode,
            connectivity: self.connectivity.clone(),
            delete_on_finish: self.delete_on_finish,
        }
    }
}

fn render_value(value: &mut Value, values: &VarPool) {
    match value {
        Value::String(s) => {
            let rendered = render_placeholders(s, values);
            *s = rendered;
        }
        Value::Array(items) => items.iter_mut().for_each(|v| render_value(v, values)),
        Value::Object(map) => map.values_mut().for_each(|v| render_value(v, values)),
        _ => {}
    }
}

/// Resolved configuration of one remote task run.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTaskConfig {
    /// Creation request; `None` for a restart.
    pub spec: Option<JobSpec>,
    pub restart: Option<JobHandle>,
    pub start_mode: StartMode,
    pub connectivity: Vec<ConnectivityCheck>,
    pub delete_on_finish: bool,
}

impl RemoteTaskConfig {
    /// Emit a trace-level log with the essential configuration fields.
    pub fn trace_state(&self, task: &str) {
        trace!(
            task,
            identifier = self.spec.as_ref().map(|s| s.identifier.as_str()),
            restart = self.restart.as_ref().map(|h| h.as_str()),
            start_mode = %self.start_mode,
            checks = self.connectivity.len(),
            delete_on_finish = self.delete_on_finish,
            "remote task config resolved"
        );
    }
}

impl fmt::Display for RemoteTaskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.spec, &self.restart) {
            (_, Some(handle)) => write!(f, "RemoteTaskConfig(restart={handle}, mode={})", self.start_mode),
            (Some(spec), None) => write!(f, "RemoteTaskConfig(create={}, mode={})", spec.identifier, self.start_mode),
            (None, None) => f.write_str("RemoteTaskConfig(<empty>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_rejects_malformed_text() {
        assert!(matches!(
            RemoteTaskParams::parse("{not json"),
            Err(ExecError::InvalidSpec(_))
        ));
    }

    #[test]
    fn parse_requires_identifier_for_fresh_jobs() {
        let err = RemoteTaskParams::parse(r#"{"payload": {}}"#).unwrap_err();
        assert!(err.to_string().contains("identifier"));

        let ok = RemoteTaskParams::parse(r#"{"restartHandle": "arn:task:1"}"#).unwrap();
        assert!(ok.is_restart());
    }

    #[test]
    fn parse_rejects_half_connectivity_checks() {
        let raw = r#"{"identifier": "t", "connectivity": [{"instance": "rep", "endpoint": " "}]}"#;
        assert!(RemoteTaskParams::parse(raw).is_err());
    }

    #[test]
    fn parse_rejects_blank_label_keys() {
        let raw = r#"{"identifier": "t", "labels": {"": "x"}}"#;
        assert!(matches!(RemoteTaskParams::parse(raw), Err(ExecError::InvalidSpec(_))));
    }

    #[test]
    fn resolve_renders_label_values() {
        let raw = r#"{"identifier": "t", "labels": {"env": "${env}", "team": "data"}}"#;
        let globals: GlobalParams = [Property::input("env", "prod")].into_iter().collect();
        let spec = RemoteTaskParams::parse(raw).unwrap().resolve(&globals).spec.unwrap();
        assert_eq!(spec.labels.get("env"), Some("prod"));
        assert_eq!(spec.labels.get("team"), Some("data"));
    }

    #[test]
    fn resolve_renders_string_leaves_with_local_precedence() {
        let raw = json!({
            "identifier": "task-${suffix}",
            "payload": {
                "TableMappings": "{\"schema\": \"${schema}\"}",
                "Nested": ["${region}", 5, "${unknown}"]
            },
            "localParams": [
                {"prop": "schema", "direct": "IN", "type": "VARCHAR", "value": "sales"}
            ]
        })
        .to_string();
        let params = RemoteTaskParams::parse(&raw).unwrap();

        let globals: GlobalParams = [
            Property::input("schema", "ignored"),
            Property::input("region", "eu-west-1"),
            Property::input("suffix", "7"),
        ]
        .into_iter()
        .collect();

        let cfg = params.resolve(&globals);
        let spec = cfg.spec.unwrap();
        assert_eq!(spec.identifier, "task-7");
        assert_eq!(spec.payload["TableMappings"], "{\"schema\": \"sales\"}");
        assert_eq!(spec.payload["Nested"], json!(["eu-west-1", 5, "${unknown}"]));
        assert_eq!(cfg.start_mode, StartMode::StartReplication);
    }

    #[test]
    fn restart_keeps_handle_and_mode() {
        let raw = r#"{"restartHandle": "arn:task:1", "startMode": "reload-target"}"#;
        let cfg = RemoteTaskParams::parse(raw).unwrap().resolve(&GlobalParams::new());
        assert!(cfg.spec.is_none());
        assert_eq!(cfg.restart, Some(JobHandle::new("arn:task:1")));
        assert_eq!(cfg.start_mode, StartMode::ReloadTarget);
        assert_eq!(cfg.to_string(), "RemoteTaskConfig(restart=arn:task:1, mode=reload-target)");
    }

    #[test]
    fn fresh_job_ignores_start_mode() {
        let raw = r#"{"identifier": "t", "startMode": "resume-processing"}"#;
        let cfg = RemoteTaskParams::parse(raw).unwrap().resolve(&GlobalParams::new());
        assert_eq!(cfg.start_mode, StartMode::StartReplication);
    }
}
