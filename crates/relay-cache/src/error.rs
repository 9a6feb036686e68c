use thiserror::Error;

use relay_model::ModelError;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("unsupported digest algorithm: {0} (expected: sha256|sha512)")]
    UnsupportedDigest(String),

    #[error("invalid task params: {0}")]
    Params(#[from] ModelError),

    #[error("failed to serialize var pool: {0}")]
    Serialize(#[from] serde_json::Error),
}
