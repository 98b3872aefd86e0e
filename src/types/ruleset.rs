use std::collections::BTreeMap;
use std::fmt;

use super::error::{TypeError, ValueError};
use super::result::RuleDiagnostic;
use super::rule::{Clause, ContextTag, Rule};
use super::template::TemplateDefinition;
use crate::config::default_rule_annotations;
use crate::normalize::normalize;
use crate::parse::parse_rule;

const OWNER: &str = "RuleSet";

static ALWAYS: Rule = Rule::always();

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: String,
    rule: Rule,
}

/// Parameter name to parsed [`Rule`] for one template.
///
/// Populated by [`refresh()`](Self::refresh) after a template is set, and
/// rebuilt wholesale on every refresh. Lookups are case-insensitive.
///
/// # Example
///
/// ```
/// use template_rules::{ContextTag, RuleSet};
/// use serde_json::json;
///
/// let ruleset = RuleSet::from_template(json!({"parameters": [
///     {"name": "ADVERTISE_PIP_ON_BORDER", "annotations": {"IsShow": "\"ADVERTISE_PIP_BGP!=true\""}}
/// ]}))
/// .unwrap();
///
/// let terms = ruleset.get_rule("advertise_pip_on_border").terms(&ContextTag::NotApplicable);
/// assert_eq!(terms[0].parameter, "ADVERTISE_PIP_BGP");
/// ```
#[derive(Debug, Clone)]
pub struct RuleSet {
    template: Option<TemplateDefinition>,
    annotations: BTreeMap<String, ContextTag>,
    rules: BTreeMap<String, Entry>,
    diagnostics: Vec<RuleDiagnostic>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::with_annotations(default_rule_annotations())
    }
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A ruleset reading rule text from the given annotation keys.
    #[must_use]
    pub fn with_annotations(annotations: BTreeMap<String, ContextTag>) -> Self {
        Self {
            template: None,
            annotations,
            rules: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Set the template and build the ruleset in one step.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) if the template is not a mapping or is
    /// structurally invalid.
    pub fn from_template(template: serde_json::Value) -> Result<Self, crate::Error> {
        let mut ruleset = Self::new();
        ruleset.set_template(template)?;
        ruleset.refresh()?;
        Ok(ruleset)
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

    /// Parse every parameter's rule text.
    ///
    /// A rule text that fails to parse leaves that clause out, so the
    /// parameter is unconstrained by it, and is recorded in
    /// [`diagnostics()`](Self::diagnostics).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] if the template is unset or structurally invalid.
    /// On error the previous contents are kept.
    pub fn refresh(&mut self) -> Result<(), ValueError> {
        let template = self
            .template
            .as_ref()
            .ok_or(ValueError::TemplateNotSet { owner: OWNER })?;
        let descriptors = template.descriptors(OWNER)?;

        let mut rules = BTreeMap::new();
        let mut diagnostics = Vec::new();
        for descriptor in &descriptors {
            let mut rule = Rule::always();
            for (key, tag) in &self.annotations {
                let Some(text) = descriptor.annotation(key) else {
                    continue;
                };
                if normalize(&text).trim().is_empty() {
                    continue;
                }
                match parse_rule(&descriptor.name, &text) {
                    Ok(condition) => rule.insert(Clause {
                        tag: tag.clone(),
                        source: text,
                        condition,
                    }),
                    Err(e) => {
                        tracing::warn!(
                            parameter = %descriptor.name,
                            %tag,
                            rule = %text,
                            error = %e.message,
                            "unparseable rule treated as no constraint"
                        );
                        diagnostics.push(RuleDiagnostic {
                            parameter: e.parameter,
                            tag: tag.clone(),
                            rule: e.rule,
                            message: e.message,
                        });
                    }
                }
            }
            rules.insert(
                descriptor.name.to_lowercase(),
                Entry {
                    name: descriptor.name.clone(),
                    rule,
                },
            );
        }

        self.rules = rules;
        self.diagnostics = diagnostics;
        tracing::debug!(
            parameters = self.rules.len(),
            unparseable = self.diagnostics.len(),
            "ruleset refreshed"
        );
        Ok(())
    }

    /// The rule of `parameter_name`, or the always-applicable rule when the
    /// parameter is unknown.
    #[must_use]
    pub fn get_rule(&self, parameter_name: &str) -> &Rule {
        self.rules
            .get(&parameter_name.to_lowercase())
            .map_or(&ALWAYS, |entry| &entry.rule)
    }

    #[must_use]
    pub fn contains(&self, parameter_name: &str) -> bool {
        self.rules.contains_key(&parameter_name.to_lowercase())
    }

    /// Parameters and their rules, keyed by the template's spelling of the
    /// name, in case-insensitive name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules
            .values()
            .map(|entry| (entry.name.as_str(), &entry.rule))
    }

    /// Rule texts the last refresh could not parse.
    #[must_use]
    pub fn diagnostics(&self) -> &[RuleDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl PartialEq for RuleSet {
    /// Two rulesets are equal when they hold the same rules and diagnostics.
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules && self.diagnostics == other.diagnostics
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: usize = self.rules.values().map(|e| e.rule.clauses().len()).sum();
        write!(
            f,
            "RuleSet({} parameters, {} clauses, {} unparseable)",
            self.rules.len(),
            clauses,
            self.diagnostics.len(),
        )
    }
}
