use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// How a provider should start (or restart) a job.
///
/// - `StartReplication`: first run of a freshly created job.
/// - `ResumeProcessing`: continue a previously stopped job where it left off.
/// - `ReloadTarget`: rerun an existing job from scratch.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartMode {
    #[default]
    StartReplication,
    ResumeProcessing,
    ReloadTarget,
}

impl StartMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartMode::StartReplication => "start-replication",
            StartMode::ResumeProcessing => "resume-processing",
            StartMode::ReloadTarget => "reload-target",
        }
    }
}

impl fmt::Display for StartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartMode {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start-replication" | "start" | "" => Ok(StartMode::StartReplication),
            "resume-processing" | "resume" => Ok(StartMode::ResumeProcessing),
            "reload-target" | "reload" => Ok(StartMode::ReloadTarget),
            other => Err(ModelError::UnknownStartMode(other.to_string())),
        }
    }
}
