use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{LABEL_PROVIDER, Labels};

/// Creation request for a remote job.
///
/// The driver never looks inside `payload`: it is handed to the provider as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    /// Caller-chosen identifier for the job (e.g. a replication task identifier).
    pub identifier: String,
    /// Provider-specific request body.
    #[serde(default)]
    pub payload: Value,
    /// Optional metadata for providers and logs.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

impl JobSpec {
    pub fn new(identifier: impl Into<String>, payload: Value) -> Self {
        Self {
            identifier: identifier.into(),
            payload,
            labels: Labels::default(),
        }
    }

    /// Attach the provider label.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.labels.set(LABEL_PROVIDER, provider);
        self
    }

    pub fn provider(&self) -> Option<&str> {
        self.labels.get(LABEL_PROVIDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_label_roundtrip() {
        let spec = JobSpec::new("task-1", json!({"MigrationType": "full-load"})).with_provider("dms");
        assert_eq!(spec.provider(), Some("dms"));

        let json = serde_json::to_string(&spec).unwrap();
        let back: JobSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn labels_are_skipped_when_empty() {
        let spec = JobSpec::new("task-1", Value::Null);
        let json = serde_json::to_string(&spec).unwrap();
        assert!(!json.contains("labels"));
    }
}
