use serde::Deserialize;

use crate::{
    Property,
    error::{ModelError, ModelResult},
};

/// Structured view over a task's raw parameter text.
///
/// Only the declared local parameters are interpreted here; everything else in the JSON object belongs to the task type and is kept verbatim in [`TaskParams::raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskParams {
    local_params: Vec<Property>,
    raw: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Declared {
    #[serde(default)]
    local_params: Option<Vec<Property>>,
}

impl TaskParams {
    /// Parse raw task parameter text.
    ///
    /// The text must be a JSON object. A missing or `null` `localParams` means no declared parameters.
    pub fn parse(raw: impl Into<String>) -> ModelResult<Self> {
        let raw = raw.into();
        let declared: Declared = serde_json::from_str(&raw)
            .map_err(|e| ModelError::InvalidParams(e.to_string()))?;

        Ok(Self {
            local_params: declared.local_params.unwrap_or_default(),
            raw,
        })
    }

    /// Declared local parameters in declaration order.
    pub fn local_params(&self) -> &[Property] {
        &self.local_params
    }

    /// Names of local parameters declared with direction `IN`.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.local_params
            .iter()
            .filter(|p| p.is_input())
            .map(|p| p.prop.as_str())
    }

    /// The unmodified parameter text.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_params() {
        let raw = r#"{
            "localParams": [
                {"prop": "a", "direct": "IN", "type": "VARCHAR", "value": ""},
                {"prop": "b", "direct": "OUT", "type": "VARCHAR", "value": ""}
            ],
            "rawScript": "echo ${c}"
        }"#;
        let params = TaskParams::parse(raw).unwrap();
        assert_eq!(params.local_params().len(), 2);
        assert_eq!(params.input_names().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(params.raw(), raw);
    }

    #[test]
    fn missing_or_null_local_params_is_empty() {
        assert!(TaskParams::parse("{}").unwrap().local_params().is_empty());
        assert!(
            TaskParams::parse(r#"{"localParams": null}"#)
                .unwrap()
                .local_params()
                .is_empty()
        );
    }

    #[test]
    fn malformed_text_fails_fast() {
        for bad in ["", "not json", r#"{"localParams": "oops"}"#, "[1,2]"] {
            let err = TaskParams::parse(bad).unwrap_err();
            assert!(
                matches!(err, ModelError::InvalidParams(_)),
                "expected InvalidParams for {bad:?}, got {err:?}"
            );
        }
    }
}
