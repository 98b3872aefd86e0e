use std::collections::BTreeMap;
use std::fmt;

use super::error::{TypeError, ValueError};
use super::template::{TemplateDefinition, TemplateParameterDescriptor};
use super::value::{parse_bool, Value};

const OWNER: &str = "ParamInfo";

/// Declared type of a template parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
    Boolean,
    Integer,
    String,
    Enum,
    Structured,
    Other(String),
}

impl ParameterType {
    #[must_use]
    pub fn from_template(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => ParameterType::Boolean,
            "integer" | "int" | "long" => ParameterType::Integer,
            "string" => ParameterType::String,
            "enum" => ParameterType::Enum,
            lower if lower.ends_with("[]") || lower.starts_with("structure") => {
                ParameterType::Structured
            }
            _ => ParameterType::Other(raw.to_owned()),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Boolean => write!(f, "boolean"),
            ParameterType::Integer => write!(f, "integer"),
            ParameterType::String => write!(f, "string"),
            ParameterType::Enum => write!(f, "enum"),
            ParameterType::Structured => write!(f, "structured"),
            ParameterType::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// Static metadata of one template parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub param_type: ParameterType,
    pub default: Option<Value>,
    pub choices: Vec<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Per-parameter type, default, choices and bounds for one template.
///
/// Lookups are case-insensitive. Built independently of rule parsing.
#[derive(Debug, Clone, Default)]
pub struct ParamInfo {
    template: Option<TemplateDefinition>,
    info: BTreeMap<String, ParamSpec>,
}

impl ParamInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`TypeError::Template`] if `template` is not a JSON object.
    pub fn set_template(&mut self, template: serde_json::Value) -> Result<(), TypeError> {
        self.template = Some(TemplateDefinition::new(OWNER, template)?);
        Ok(())
    }

    pub(crate) fn set_definition(&mut self, template: TemplateDefinition) {
        self.template = Some(template);
    }

    /// Rebuild the metadata from the current template.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] if the template is unset or structurally invalid.
    pub fn refresh(&mut self) -> Result<(), ValueError> {
        let template = self
            .template
            .as_ref()
            .ok_or(ValueError::TemplateNotSet { owner: OWNER })?;
        let info = template
            .descriptors(OWNER)?
            .iter()
            .map(|d| (d.name.to_lowercase(), build_spec(d)))
            .collect();
        self.info = info;
        tracing::debug!(parameters = self.info.len(), "param info refreshed");
        Ok(())
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParamSpec> {
        self.info.get(&name.to_lowercase())
    }

    /// Declared default of `name`, already coerced to its type.
    #[must_use]
    pub fn default_value(&self, name: &str) -> Option<&Value> {
        self.parameter(name)?.default.as_ref()
    }

    /// Coerce a raw configuration value for `name` into the representation
    /// rule comparisons use. `None` for null, lists and mappings.
    #[must_use]
    pub fn coerce(&self, name: &str, raw: &serde_json::Value) -> Option<Value> {
        let param_type = self.parameter(name).map(|spec| &spec.param_type);
        coerce_as(param_type, raw)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.info.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.info.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }
}

fn build_spec(descriptor: &TemplateParameterDescriptor) -> ParamSpec {
    let param_type = descriptor
        .parameter_type
        .as_deref()
        .map_or(ParameterType::Other(String::new()), ParameterType::from_template);

    let default = descriptor
        .default_value()
        .and_then(|raw| coerce_as(Some(&param_type), raw));

    let mut choices: Vec<Value> = match &descriptor.meta_properties.valid_values {
        Some(serde_json::Value::String(list)) => list
            .split(',')
            .map(str::trim)
            .filter(|choice| !choice.is_empty())
            .filter_map(|choice| {
                coerce_as(
                    Some(&param_type),
                    &serde_json::Value::String(choice.to_owned()),
                )
            })
            .collect(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| coerce_as(Some(&param_type), item))
            .collect(),
        _ => Vec::new(),
    };
    if choices.is_empty() && param_type == ParameterType::Boolean {
        choices = vec![Value::Bool(false), Value::Bool(true)];
    }

    ParamSpec {
        param_type,
        default,
        choices,
        min: bound(&descriptor.name, "min", descriptor.meta_properties.min.as_ref()),
        max: bound(&descriptor.name, "max", descriptor.meta_properties.max.as_ref()),
    }
}

fn bound(parameter: &str, which: &str, raw: Option<&serde_json::Value>) -> Option<f64> {
    let raw = raw?;
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) if s.trim().is_empty() => return None,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };
    if parsed.is_none() {
        tracing::debug!(parameter, bound = which, %raw, "ignoring unparseable bound");
    }
    parsed
}

/// Coerce by declared type. Undeclared and unrecognized types still turn
/// boolean-looking strings into booleans.
fn coerce_as(param_type: Option<&ParameterType>, raw: &serde_json::Value) -> Option<Value> {
    let scalar = Value::from_json(raw)?;
    Some(match (param_type, scalar) {
        (Some(ParameterType::Integer), Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => Value::String(s),
        },
        (Some(ParameterType::Boolean | ParameterType::Other(_)) | None, Value::String(s)) => {
            match parse_bool(s.trim()) {
                Some(b) => Value::Bool(b),
                None => Value::String(s),
            }
        }
        (_, scalar) => scalar,
    })
}
