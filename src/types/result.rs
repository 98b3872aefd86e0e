use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::expr::RuleTerm;
use super::rule::ContextTag;
use super::value::Value;

/// Why a parameter was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// The parameter's rule requires a value that the configuration lacks.
    RuleMismatch,
    /// The parameter is not applicable to this configuration but was set.
    NotApplicableButSet,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::RuleMismatch => write!(f, "rule_mismatch"),
            Reason::NotApplicableButSet => write!(f, "not_applicable_but_set"),
        }
    }
}

/// One parameter found inconsistent with its rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadParam {
    pub parameter: String,
    pub reason: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_term: Option<RuleTerm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_value: Option<Value>,
}

/// A rule text that could not be parsed and was treated as no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDiagnostic {
    pub parameter: String,
    pub tag: ContextTag,
    pub rule: String,
    pub message: String,
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[must_use]
pub struct ValidationResult {
    pub bad_params: Vec<BadParam>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<RuleDiagnostic>,
}

impl ValidationResult {
    /// No parameter failed. Unparseable rules do not count as failures.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.bad_params.is_empty()
    }

    #[must_use]
    pub fn bad_param_names(&self) -> BTreeSet<&str> {
        self.bad_params
            .iter()
            .map(|b| b.parameter.as_str())
            .collect()
    }

    #[must_use]
    pub fn bad_param(&self, name: &str) -> Option<&BadParam> {
        self.bad_params.iter().find(|b| b.parameter == name)
    }
}

impl fmt::Display for BadParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.parameter, self.reason)?;
        if let Some(term) = &self.failing_term {
            write!(f, " ({term}")?;
            match &self.observed_value {
                Some(observed) => write!(f, ", observed {observed})")?,
                None => write!(f, ")")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bad: Vec<String> = self.bad_params.iter().map(ToString::to_string).collect();
        write!(f, "bad_params: [{}]", bad.join(", "))?;
        if !self.diagnostics.is_empty() {
            write!(f, ", unparseable rules: {}", self.diagnostics.len())?;
        }
        Ok(())
    }
}
