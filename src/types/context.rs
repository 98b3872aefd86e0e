use std::collections::HashMap;

use crate::config::VerifyConfig;
use crate::evaluate::Resolve;

use super::param_info::ParamInfo;
use super::value::Value;

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// The merged configuration one validation pass evaluates rules against.
///
/// Controller values are overlaid by playbook values. Keys are matched
/// case-insensitively. A comparison observes, in order: the constant of a
/// local param, the merged value, the declared default.
#[derive(Debug)]
pub struct ValidationContext<'a> {
    merged: HashMap<String, &'a serde_json::Value>,
    param_info: &'a ParamInfo,
    config: &'a VerifyConfig,
}

impl<'a> ValidationContext<'a> {
    #[must_use]
    pub fn new(
        playbook: &'a JsonMap,
        controller: Option<&'a JsonMap>,
        param_info: &'a ParamInfo,
        config: &'a VerifyConfig,
    ) -> Self {
        let mut merged = HashMap::new();
        for (key, value) in controller.into_iter().flatten().chain(playbook) {
            merged.insert(key.to_lowercase(), value);
        }
        Self {
            merged,
            param_info,
            config,
        }
    }

    /// The raw merged value of `name`; `None` if absent or null.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&'a serde_json::Value> {
        self.merged
            .get(&name.to_lowercase())
            .copied()
            .filter(|v| !v.is_null())
    }

    /// Whether `name` has a usable value: a non-blank merged value, or a
    /// non-blank default.
    #[must_use]
    pub fn is_satisfied(&self, name: &str) -> bool {
        match self.raw(name) {
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
            None => self
                .param_info
                .default_value(name)
                .is_some_and(|v| !v.is_blank()),
        }
    }
}

impl Resolve for ValidationContext<'_> {
    fn resolve(&self, parameter: &str) -> Option<Value> {
        if let Some(constant) = self.config.local_param(parameter) {
            return Value::from_json(constant);
        }
        match self.raw(parameter) {
            Some(raw) => self.param_info.coerce(parameter, raw),
            None => self.param_info.default_value(parameter).cloned(),
        }
    }
}
