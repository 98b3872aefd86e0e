use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::ContextTag;

/// Engine configuration.
///
/// Every field has a default, so an empty JSON object is a valid config.
///
/// ```
/// use template_rules::{ContextTag, VerifyConfig};
///
/// let config = VerifyConfig::from_json(r#"{"rule_annotations": {"IsReadOnly": "readonly"}}"#).unwrap();
/// assert_eq!(
///     config.rule_annotations.get("IsReadOnly"),
///     Some(&ContextTag::Other("readonly".into()))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyConfig {
    /// Template annotation key to the rule class its text is parsed as.
    pub rule_annotations: BTreeMap<String, ContextTag>,
    /// Playbook-only control flags and the constant value rules observe
    /// for them. These never come back from the controller.
    pub local_params: BTreeMap<String, serde_json::Value>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            rule_annotations: default_rule_annotations(),
            local_params: BTreeMap::from([("DEPLOY".to_owned(), serde_json::Value::Bool(true))]),
        }
    }
}

/// `IsShow` carries the applicability condition, `IsMandatory` the
/// requirement condition.
#[must_use]
pub fn default_rule_annotations() -> BTreeMap<String, ContextTag> {
    BTreeMap::from([
        ("IsShow".to_owned(), ContextTag::NotApplicable),
        ("IsMandatory".to_owned(), ContextTag::Mandatory),
    ])
}

impl VerifyConfig {
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if `input` is not a valid config document.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on I/O or deserialization failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&input)?)
    }

    /// Whether `name` is a playbook-only control flag.
    #[must_use]
    pub fn is_local(&self, name: &str) -> bool {
        self.local_param(name).is_some()
    }

    /// Constant value of the local param `name`, matched case-insensitively.
    #[must_use]
    pub fn local_param(&self, name: &str) -> Option<&serde_json::Value> {
        self.local_params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}
