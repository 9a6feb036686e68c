use serde::{Deserialize, Serialize};

/// Whether a task definition opted into result caching.
///
/// Serialized as the numeric code used by task definitions (`0` or `1`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct CacheFlag(bool);

impl CacheFlag {
    /// Caching enabled.
    pub const fn enabled() -> Self {
        Self(true)
    }

    /// Caching disabled.
    pub const fn disabled() -> Self {
        Self(false)
    }

    pub const fn is_enabled(&self) -> bool {
        self.0
    }

    /// Numeric code that takes part in the cache fingerprint.
    pub const fn code(&self) -> u8 {
        if self.0 { 1 } else { 0 }
    }
}

impl From<bool> for CacheFlag {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

impl From<u8> for CacheFlag {
    fn from(code: u8) -> Self {
        Self(code != 0)
    }
}

impl From<CacheFlag> for u8 {
    fn from(f: CacheFlag) -> Self {
        f.code()
    }
}

#[cfg(test)]
mod tests {
    use super::CacheFlag;

    #[test]
    fn default_is_disabled() {
        let f = CacheFlag::default();
        assert!(!f.is_enabled());
        assert_eq!(f.code(), 0);
    }

    #[test]
    fn codes_match_constructors() {
        assert_eq!(CacheFlag::enabled().code(), 1);
        assert_eq!(CacheFlag::disabled().code(), 0);
        assert_eq!(CacheFlag::from(7u8), CacheFlag::enabled());
        assert_eq!(CacheFlag::from(false), CacheFlag::disabled());
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&CacheFlag::enabled()).unwrap();
        assert_eq!(json, "1");

        let back: CacheFlag = serde_json::from_str("0").unwrap();
        assert!(!back.is_enabled());
    }
}
