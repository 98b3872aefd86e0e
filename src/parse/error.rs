use thiserror::Error;

/// A rule text that did not form a well-formed boolean expression after
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to parse rule for parameter {parameter}: {message} (rule: {rule})")]
pub struct RuleParseError {
    pub parameter: String,
    pub rule: String,
    pub message: String,
}

impl RuleParseError {
    pub(crate) fn new(
        parameter: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}
