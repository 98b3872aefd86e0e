use crate::config::VerifyConfig;
use crate::evaluate::{evaluate, Evaluation, Truth};
use crate::types::error::json_type_name;
use crate::types::template::TemplateDefinition;
use crate::{
    BadParam, ContextTag, ParamInfo, Reason, Rule, RuleSet, TypeError, ValidationContext,
    ValidationError, ValidationResult, ValueError,
};

const OWNER: &str = "VerifyPlaybookParams";

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Validates a flat playbook configuration against a template's
/// parameter rules.
///
/// Each [`commit()`](Self::commit) builds a fresh [`RuleSet`] and
/// [`ParamInfo`] from the template and evaluates, against the merged
/// controller and playbook configuration:
///
/// - the applicability (`na`) clause of every playbook key: a key whose
///   condition is false must not be set;
/// - the mandatory clause of every template parameter: a parameter whose
///   condition is true must have a value.
///
/// Comparisons on parameters without any value are unknown and never fail
/// a parameter.
///
/// # Example
///
/// ```
/// use template_rules::{Reason, VerifyPlaybookParams};
/// use serde_json::json;
///
/// let mut verify = VerifyPlaybookParams::new();
/// verify.set_template(json!({"parameters": [
///     {"name": "REPLICATION_MODE", "parameterType": "enum"},
///     {"name": "BGP_AS", "parameterType": "string",
///      "annotations": {"IsMandatory": "\"REPLICATION_MODE==Multicast\""}}
/// ]})).unwrap();
/// verify.set_config_playbook(json!({"REPLICATION_MODE": "Multicast"})).unwrap();
///
/// let result = verify.commit().unwrap();
/// assert_eq!(result.bad_params[0].parameter, "BGP_AS");
/// assert_eq!(result.bad_params[0].reason, Reason::RuleMismatch);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VerifyPlaybookParams {
    config: VerifyConfig,
    config_playbook: Option<JsonMap>,
    config_controller: Option<JsonMap>,
    template: Option<TemplateDefinition>,
}

impl VerifyPlaybookParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: VerifyConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Set the user's desired configuration. Values may be scalars or lists.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError`] if `cfg` is not a mapping or holds a nested mapping.
    pub fn set_config_playbook(&mut self, cfg: serde_json::Value) -> Result<(), TypeError> {
        let serde_json::Value::Object(map) = cfg else {
            return Err(TypeError::ConfigPlaybook {
                type_name: json_type_name(&cfg),
                value: cfg.to_string(),
            });
        };
        if let Some((parameter, value)) = map.iter().find(|(_, v)| v.is_object()) {
            return Err(TypeError::PlaybookValue {
                parameter: parameter.clone(),
                type_name: json_type_name(value),
            });
        }
        self.config_playbook = Some(map);
        Ok(())
    }

    /// Set the configuration the controller currently holds. `None` and
    /// JSON null both clear it.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::ConfigController`] if `cfg` is neither a mapping
    /// nor null.
    pub fn set_config_controller(
        &mut self,
        cfg: Option<serde_json::Value>,
    ) -> Result<(), TypeError> {
        self.config_controller = match cfg {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(TypeError::ConfigController {
                    type_name: json_type_name(&other),
                    value: other.to_string(),
                });
            }
        };
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`TypeError::Template`] if `template` is not a JSON object.
    pub fn set_template(&mut self, template: serde_json::Value) -> Result<(), TypeError> {
        self.template = Some(TemplateDefinition::new(OWNER, template)?);
        Ok(())
    }

    #[must_use]
    pub fn config_playbook(&self) -> Option<&JsonMap> {
        self.config_playbook.as_ref()
    }

    #[must_use]
    pub fn config_controller(&self) -> Option<&JsonMap> {
        self.config_controller.as_ref()
    }

    /// Run one validation pass.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the template or playbook is unset, or
    /// the template is structurally invalid. No partial result is produced.
    pub fn commit(&self) -> Result<ValidationResult, ValidationError> {
        let template = self
            .template
            .as_ref()
            .ok_or(ValueError::TemplateNotSet { owner: OWNER })?;
        let playbook = self
            .config_playbook
            .as_ref()
            .ok_or(ValueError::ConfigPlaybookNotSet)?;

        let mut ruleset = RuleSet::with_annotations(self.config.rule_annotations.clone());
        ruleset.set_definition(template.clone());
        ruleset.refresh()?;

        let mut param_info = ParamInfo::new();
        param_info.set_definition(template.clone());
        param_info.refresh()?;

        let ctx = ValidationContext::new(
            playbook,
            self.config_controller.as_ref(),
            &param_info,
            &self.config,
        );

        let mut bad_params: Vec<BadParam> = playbook
            .iter()
            .filter(|(name, value)| !value.is_null() && !self.config.is_local(name))
            .filter_map(|(name, _)| check_applicability(name, ruleset.get_rule(name), &ctx))
            .collect();

        bad_params.extend(
            ruleset
                .iter()
                .filter(|(name, _)| !self.config.is_local(name))
                .filter_map(|(name, rule)| check_mandatory(name, rule, &ctx)),
        );
        bad_params.sort_by(|a, b| a.parameter.cmp(&b.parameter));

        tracing::debug!(
            playbook_params = playbook.len(),
            template_params = ruleset.len(),
            bad_params = bad_params.len(),
            "playbook params verified"
        );

        Ok(ValidationResult {
            bad_params,
            diagnostics: ruleset.diagnostics().to_vec(),
        })
    }
}

fn applicability(rule: &Rule, ctx: &ValidationContext<'_>) -> Option<Evaluation> {
    rule.clause(&ContextTag::NotApplicable)
        .map(|clause| evaluate(&clause.condition, ctx))
}

/// A set parameter whose applicability condition is false. The reported
/// term is the comparison that decided the condition.
fn check_applicability(
    name: &str,
    rule: &Rule,
    ctx: &ValidationContext<'_>,
) -> Option<BadParam> {
    let eval = applicability(rule, ctx)?;
    if eval.truth != Truth::False {
        return None;
    }
    let failed = eval.deciding_term();
    tracing::debug!(parameter = %name, "parameter set but not applicable");
    Some(BadParam {
        parameter: name.to_owned(),
        reason: Reason::NotApplicableButSet,
        failing_term: failed.map(|o| o.term.clone()),
        observed_value: failed.and_then(|o| o.observed.clone()),
    })
}

/// An applicable parameter whose mandatory condition holds but which has
/// no value. The reported term is the comparison that made it mandatory.
fn check_mandatory(name: &str, rule: &Rule, ctx: &ValidationContext<'_>) -> Option<BadParam> {
    let clause = rule.clause(&ContextTag::Mandatory)?;
    if applicability(rule, ctx).is_some_and(|eval| eval.truth == Truth::False) {
        return None;
    }
    let eval = evaluate(&clause.condition, ctx);
    if eval.truth != Truth::True || ctx.is_satisfied(name) {
        return None;
    }
    let trigger = eval.deciding_term();
    tracing::debug!(parameter = %name, rule = %clause.source, "mandatory parameter missing");
    Some(BadParam {
        parameter: name.to_owned(),
        reason: Reason::RuleMismatch,
        failing_term: trigger.map(|o| o.term.clone()),
        observed_value: trigger.and_then(|o| o.observed.clone()),
    })
}
