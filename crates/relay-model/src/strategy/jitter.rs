use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::error::{ModelError, ModelResult};

/// Controls how random jitter is applied to poll delays.
///
/// Jitter spreads describe calls of many concurrently polled jobs so they do not hit the provider in lock-step.
///
/// Strategies:
/// - `None`: delays are deterministic.
/// - `Full`: delay uniformly sampled from `[0, base]`.
/// - `Equal`: `base/2` plus a uniform sample from `[0, base/2]`.
/// - `Decorrelated`: uniform sample from `[first, base * 3]`, capped at the strategy maximum.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum JitterStrategy {
    #[default]
    None,
    Full,
    Equal,
    Decorrelated,
}

impl FromStr for JitterStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(JitterStrategy::Equal),
            "" | "none" => Ok(JitterStrategy::None),
            "full" => Ok(JitterStrategy::Full),
            "decorrelated" => Ok(JitterStrategy::Decorrelated),
            other => Err(ModelError::UnknownJitter(other.to_string())),
        }
    }
}
