use thiserror::Error;

/// Malformed input handed to a setter. Raised by the setter itself, never
/// deferred to `refresh()` or `commit()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("{owner}.template: template must be a dict. Got type {type_name} for value {value}.")]
    Template {
        owner: &'static str,
        type_name: &'static str,
        value: String,
    },

    #[error("VerifyPlaybookParams.config_playbook: config_playbook must be a dict. Got type {type_name} for value {value}.")]
    ConfigPlaybook {
        type_name: &'static str,
        value: String,
    },

    #[error("VerifyPlaybookParams.config_controller: config_controller must be a dict or None. Got type {type_name} for value {value}.")]
    ConfigController {
        type_name: &'static str,
        value: String,
    },

    #[error("VerifyPlaybookParams.config_playbook: {parameter} must be a scalar or a list. Got type {type_name}.")]
    PlaybookValue {
        parameter: String,
        type_name: &'static str,
    },
}

/// Structurally invalid template content or a missing precondition.
/// Aborts the whole pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("{owner}.refresh: template is not set.")]
    TemplateNotSet { owner: &'static str },

    #[error("{owner}.refresh: No parameters in template.")]
    NoParameters { owner: &'static str },

    #[error("{owner}.refresh: template[parameters] is not a list.")]
    ParametersNotList { owner: &'static str },

    #[error("{owner}.refresh: name key missing from parameter at index {index}.")]
    NameKeyMissing { owner: &'static str, index: usize },

    #[error("{owner}.refresh: invalid parameter at index {index}: {message}")]
    InvalidParameter {
        owner: &'static str,
        index: usize,
        message: String,
    },

    #[error("VerifyPlaybookParams.commit: config_playbook is not set.")]
    ConfigPlaybookNotSet,
}

/// Failure of `commit()` before any result is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// JSON type name used in setter diagnostics.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_f64() => "float",
        serde_json::Value::Number(_) => "integer",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_type_error_message() {
        let err = TypeError::Template {
            owner: "RuleSet",
            type_name: "integer",
            value: "10".into(),
        };
        assert_eq!(
            err.to_string(),
            "RuleSet.template: template must be a dict. Got type integer for value 10."
        );
    }

    #[test]
    fn playbook_value_message() {
        let err = TypeError::PlaybookValue {
            parameter: "BGP_AS".into(),
            type_name: "dict",
        };
        assert_eq!(
            err.to_string(),
            "VerifyPlaybookParams.config_playbook: BGP_AS must be a scalar or a list. Got type dict."
        );
    }

    #[test]
    fn precondition_messages() {
        assert_eq!(
            ValueError::TemplateNotSet { owner: "RuleSet" }.to_string(),
            "RuleSet.refresh: template is not set."
        );
        assert_eq!(
            ValueError::NoParameters { owner: "ParamInfo" }.to_string(),
            "ParamInfo.refresh: No parameters in template."
        );
        assert_eq!(
            ValueError::ParametersNotList { owner: "RuleSet" }.to_string(),
            "RuleSet.refresh: template[parameters] is not a list."
        );
        assert_eq!(
            ValueError::NameKeyMissing {
                owner: "RuleSet",
                index: 3
            }
            .to_string(),
            "RuleSet.refresh: name key missing from parameter at index 3."
        );
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&serde_json::json!(10)), "integer");
        assert_eq!(json_type_name(&serde_json::json!(1.5)), "float");
        assert_eq!(json_type_name(&serde_json::json!([10, "foo"])), "list");
        assert_eq!(json_type_name(&serde_json::json!({})), "dict");
        assert_eq!(json_type_name(&serde_json::json!(null)), "null");
    }
}
