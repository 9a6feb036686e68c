use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Longest label key providers accept as a resource tag key.
pub const MAX_LABEL_KEY_LEN: usize = 128;

/// Job metadata forwarded to the provider as resource tags.
///
/// Keys are unique and iterate in sorted order, so two specs with the same labels serialize identically.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Rewrite every value in place, e.g. to render placeholders.
    pub fn map_values(&mut self, mut f: impl FnMut(&str) -> String) {
        for value in self.0.values_mut() {
            *value = f(value);
        }
    }

    /// Keys must be non-blank and at most [`MAX_LABEL_KEY_LEN`] bytes.
    pub fn validate(&self) -> ModelResult<()> {
        match self
            .0
            .keys()
            .find(|k| k.trim().is_empty() || k.len() > MAX_LABEL_KEY_LEN)
        {
            Some(key) => Err(ModelError::Invalid(format!("invalid label key: {key:?}"))),
            None => Ok(()),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_value_wins() {
        let mut labels: Labels = [("team", "data")].into_iter().collect();
        labels.set("team", "infra");
        assert_eq!(labels.get("team"), Some("infra"));
    }

    #[test]
    fn blank_or_oversized_keys_are_rejected() {
        let blank: Labels = [(" ", "x")].into_iter().collect();
        assert!(blank.validate().is_err());

        let long: Labels = [("k".repeat(MAX_LABEL_KEY_LEN + 1), "x".to_string())]
            .into_iter()
            .collect();
        assert!(long.validate().is_err());

        let ok: Labels = [("owner", "")].into_iter().collect();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn map_values_keeps_keys() {
        let mut labels: Labels = [("env", "${env}"), ("team", "data")].into_iter().collect();
        labels.map_values(|v| v.replace("${env}", "prod"));
        assert_eq!(labels.get("env"), Some("prod"));
        assert_eq!(labels.get("team"), Some("data"));
    }

    #[test]
    fn serializes_as_plain_map() {
        let labels: Labels = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(serde_json::to_string(&labels).unwrap(), r#"{"a":"1","b":"2"}"#);
    }
}
