use std::collections::BTreeMap;

use serde::Deserialize;

use super::error::{json_type_name, TypeError, ValueError};

/// A controller template, checked to be mapping-shaped.
///
/// Its `parameters` content is only inspected by `refresh()`, which reports
/// structural problems as [`ValueError`].
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDefinition {
    raw: serde_json::Map<String, serde_json::Value>,
}

/// One entry of the template's `parameters` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParameterDescriptor {
    pub name: String,
    #[serde(default)]
    pub parameter_type: Option<String>,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub meta_properties: MetaProperties,
    #[serde(default)]
    pub annotations: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaProperties {
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub valid_values: Option<serde_json::Value>,
    #[serde(default)]
    pub min: Option<serde_json::Value>,
    #[serde(default)]
    pub max: Option<serde_json::Value>,
}

impl TemplateDefinition {
    /// Accept `value` as a template if it is a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Template`] naming `owner` and the received type.
    pub fn new(owner: &'static str, value: serde_json::Value) -> Result<Self, TypeError> {
        match value {
            serde_json::Value::Object(raw) => Ok(Self { raw }),
            other => Err(TypeError::Template {
                owner,
                type_name: json_type_name(&other),
                value: other.to_string(),
            }),
        }
    }

    /// Deserialize every parameter descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] if `parameters` is missing or not a list, or an
    /// entry lacks `name` or does not deserialize.
    pub fn descriptors(
        &self,
        owner: &'static str,
    ) -> Result<Vec<TemplateParameterDescriptor>, ValueError> {
        let parameters = self
            .raw
            .get("parameters")
            .ok_or(ValueError::NoParameters { owner })?
            .as_array()
            .ok_or(ValueError::ParametersNotList { owner })?;

        parameters
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                if entry.get("name").is_none() {
                    return Err(ValueError::NameKeyMissing { owner, index });
                }
                serde_json::from_value(entry.clone()).map_err(|e| ValueError::InvalidParameter {
                    owner,
                    index,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

impl TemplateParameterDescriptor {
    /// The annotation stored under `key`, as text. Booleans are rendered
    /// `true`/`false`; other non-string values are ignored.
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<String> {
        match self.annotations.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The declared default, from the top level or `metaProperties`.
    #[must_use]
    pub fn default_value(&self) -> Option<&serde_json::Value> {
        self.default_value
            .as_ref()
            .filter(|v| !v.is_null())
            .or_else(|| {
                self.meta_properties
                    .default_value
                    .as_ref()
                    .filter(|v| !v.is_null())
            })
    }
}
