use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use tracing::trace;

use relay_model::{PARAM_SEPARATOR, TaskIdentity};

use crate::CacheError;

/// Separator between the source task id and the cache key in a tag key.
pub const TAG_SEPARATOR: char = '-';

/// Digest used to turn a canonical input into a cache key.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    /// Width of the rendered key in hex characters.
    pub fn hex_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 64,
            DigestAlgorithm::Sha512 => 128,
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CacheError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            other => Err(CacheError::UnsupportedDigest(other.to_string())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha512 => "sha512",
        })
    }
}

/// Lowercase hex digest identifying a task's execution inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Computes cache keys with a fixed digest algorithm.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fingerprinter {
    algorithm: DigestAlgorithm,
}

impl Fingerprinter {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Build from a configured algorithm name.
    ///
    /// An unknown name is a configuration error; there is no fallback digest.
    pub fn from_name(name: &str) -> Result<Self, CacheError> {
        Ok(Self::new(name.parse()?))
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Digest `identity` and the resolved input variables into a cache key.
    pub fn cache_key(&self, identity: &TaskIdentity, resolved_input_data: &str) -> CacheKey {
        let data = canonical_input(identity, resolved_input_data);
        let key = match self.algorithm {
            DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(data.as_bytes())),
            DigestAlgorithm::Sha512 => hex::encode(Sha512::digest(data.as_bytes())),
        };
        trace!(task = %identity, algorithm = %self.algorithm, key = %key, "cache key computed");
        CacheKey(key)
    }
}

/// The exact string that gets digested: `code_version_cache_data`.
pub fn canonical_input(identity: &TaskIdentity, resolved_input_data: &str) -> String {
    [
        identity.code.to_string(),
        identity.definition_version.to_string(),
        identity.cache.code().to_string(),
        resolved_input_data.to_string(),
    ]
    .join(PARAM_SEPARATOR)
}

/// SHA-256 cache key for a task.
pub fn generate_cache_key(identity: &TaskIdentity, resolved_input_data: &str) -> CacheKey {
    Fingerprinter::default().cache_key(identity, resolved_input_data)
}

/// Tag a cache key with the id of the task instance whose output was reused.
pub fn generate_tag_cache_key(source_task_id: u64, cache_key: &str) -> String {
    format!("{source_task_id}{TAG_SEPARATOR}{cache_key}")
}

/// Recover the plain cache key from a tag key.
///
/// Splits at the first separator only and keeps the whole remainder, so keys that themselves contain the separator survive.
/// Input without a separator is returned unchanged; `None` yields an empty string.
pub fn revert_cache_key(tag: Option<&str>) -> String {
    match tag {
        None => String::new(),
        Some(tag) => match tag.split_once(TAG_SEPARATOR) {
            Some((_, key)) => key.to_string(),
            None => tag.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LITERAL_SHA256: &str = "2aea68f7aaef68e628b0cfafa05540df8809d87b742cfffb72630d6c5c456414";

    fn identity() -> TaskIdentity {
        TaskIdentity::new(100, 3, true)
    }

    #[test]
    fn canonical_input_joins_elements() {
        assert_eq!(canonical_input(&identity(), "[]"), "100_3_1_[]");
    }

    #[test]
    fn literal_scenario_matches_sha256() {
        let key = generate_cache_key(&identity(), "[]");
        assert_eq!(key.as_str(), LITERAL_SHA256);
    }

    #[test]
    fn key_is_deterministic() {
        let a = generate_cache_key(&identity(), r#"[{"prop":"a"}]"#);
        let b = generate_cache_key(&identity(), r#"[{"prop":"a"}]"#);
        assert_eq!(a, b);
    }

    #[test]
    fn key_is_lowercase_hex_of_fixed_width() {
        for algorithm in [DigestAlgorithm::Sha256, DigestAlgorithm::Sha512] {
            let key = Fingerprinter::new(algorithm).cache_key(&identity(), "[]");
            assert_eq!(key.as_str().len(), algorithm.hex_len());
            assert!(
                key.as_str()
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            );
        }
    }

    #[test]
    fn every_identity_field_changes_the_key() {
        let base = generate_cache_key(&identity(), "[]");
        let variants = [
            TaskIdentity::new(101, 3, true),
            TaskIdentity::new(100, 4, true),
            TaskIdentity::new(100, 3, false),
        ];
        for v in variants {
            assert_ne!(generate_cache_key(&v, "[]"), base, "{v} collided with base");
        }
        assert_ne!(generate_cache_key(&identity(), "[ ]"), base);
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!(
            Fingerprinter::from_name("SHA-256").unwrap().algorithm(),
            DigestAlgorithm::Sha256
        );
        assert_eq!(
            "sha512".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha512
        );
    }

    #[test]
    fn unavailable_digest_is_a_configuration_error() {
        let err = Fingerprinter::from_name("md5").unwrap_err();
        assert!(matches!(err, CacheError::UnsupportedDigest(name) if name == "md5"));
    }

    #[test]
    fn tag_key_roundtrip() {
        let key = generate_cache_key(&identity(), "[]");
        let tag = generate_tag_cache_key(42, key.as_str());
        assert_eq!(tag, format!("42-{LITERAL_SHA256}"));
        assert_eq!(revert_cache_key(Some(&tag)), key.as_str());
    }

    #[test]
    fn revert_handles_absent_and_untagged_input() {
        assert_eq!(revert_cache_key(None), "");
        assert_eq!(revert_cache_key(Some("abc")), "abc");
        assert_eq!(revert_cache_key(Some("")), "");
    }

    #[test]
    fn revert_keeps_everything_after_first_separator() {
        let tag = generate_tag_cache_key(7, "ab-cd-ef");
        assert_eq!(revert_cache_key(Some(&tag)), "ab-cd-ef");
    }
}
