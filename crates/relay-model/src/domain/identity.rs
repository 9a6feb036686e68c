use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CacheFlag;

/// Identity of a resolved task definition version.
///
/// Together with the resolved input variables this is everything the cache fingerprint depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskIdentity {
    /// Stable task definition code.
    pub code: i64,
    /// Version of the task definition.
    pub definition_version: i32,
    /// Whether caching is enabled for this definition.
    pub cache: CacheFlag,
}

impl TaskIdentity {
    pub fn new(code: i64, definition_version: i32, cache: impl Into<CacheFlag>) -> Self {
        Self {
            code,
            definition_version,
            cache: cache.into(),
        }
    }
}

impl fmt::Display for TaskIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@v{} (cache={})",
            self.code,
            self.definition_version,
            self.cache.code()
        )
    }
}
