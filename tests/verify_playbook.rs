use serde_json::json;
use template_rules::{
    ContextTag, Reason, TermOperator, ValidationError, Value, ValueError, VerifyConfig,
    VerifyPlaybookParams,
};

fn easy_fabric() -> serde_json::Value {
    json!({
        "name": "Easy_Fabric",
        "parameters": [
            {"name": "FABRIC_NAME", "parameterType": "string",
             "annotations": {"IsMandatory": "true"}},
            {"name": "BGP_AS", "parameterType": "string",
             "annotations": {"IsMandatory": "\"REPLICATION_MODE==Multicast\""}},
            {"name": "REPLICATION_MODE", "parameterType": "enum",
             "metaProperties": {"validValues": "Multicast,Ingress", "defaultValue": "Multicast"}},
            {"name": "MULTICAST_GROUP_SUBNET", "parameterType": "ipV4AddressWithSubnet",
             "annotations": {"IsShow": "\"REPLICATION_MODE==Multicast\"",
                             "IsMandatory": "\"REPLICATION_MODE==Multicast\""}},
            {"name": "UNDERLAY_IS_V6", "parameterType": "boolean",
             "metaProperties": {"defaultValue": "false"}},
            {"name": "ENABLE_TRM", "parameterType": "boolean",
             "annotations": {"IsShow": "\"(REPLICATION_MODE==Multicast)&&(UNDERLAY_IS_V6!=true)\""}},
            {"name": "BROKEN", "parameterType": "string",
             "annotations": {"IsShow": "\"REPLICATION_MODE=>Multicast\""}}
        ]
    })
}

fn commit(playbook: serde_json::Value) -> template_rules::ValidationResult {
    let mut verify = VerifyPlaybookParams::new();
    verify.set_template(easy_fabric()).unwrap();
    verify.set_config_playbook(playbook).unwrap();
    verify.commit().unwrap()
}

#[test]
fn multicast_requires_bgp_as() {
    let result = commit(json!({
        "FABRIC_NAME": "f1",
        "REPLICATION_MODE": "Multicast",
        "MULTICAST_GROUP_SUBNET": "239.1.1.0/25"
    }));
    let names: Vec<&str> = result.bad_param_names().into_iter().collect();
    assert_eq!(names, ["BGP_AS"]);

    let bad = result.bad_param("BGP_AS").unwrap();
    assert_eq!(bad.reason, Reason::RuleMismatch);
    let term = bad.failing_term.as_ref().unwrap();
    assert_eq!(term.operator, TermOperator::Eq);
    assert_eq!(term.parameter, "REPLICATION_MODE");
    assert_eq!(bad.observed_value, Some(Value::from("Multicast")));
}

#[test]
fn ingress_does_not_require_bgp_as() {
    let result = commit(json!({"FABRIC_NAME": "f1", "REPLICATION_MODE": "Ingress"}));
    assert!(result.is_valid(), "{result}");
}

#[test]
fn default_value_drives_rules() {
    // REPLICATION_MODE defaults to Multicast
    let result = commit(json!({"FABRIC_NAME": "f1", "BGP_AS": "65001"}));
    let names: Vec<&str> = result.bad_param_names().into_iter().collect();
    assert_eq!(names, ["MULTICAST_GROUP_SUBNET"]);
}

#[test]
fn unconditional_mandatory() {
    let result = commit(json!({"REPLICATION_MODE": "Ingress"}));
    let bad = result.bad_param("FABRIC_NAME").unwrap();
    assert_eq!(bad.reason, Reason::RuleMismatch);
    assert_eq!(bad.failing_term, None);
    assert_eq!(bad.observed_value, None);
}

#[test]
fn set_while_not_applicable() {
    let result = commit(json!({
        "FABRIC_NAME": "f1",
        "REPLICATION_MODE": "Ingress",
        "MULTICAST_GROUP_SUBNET": "239.1.1.0/25"
    }));
    let bad = result.bad_param("MULTICAST_GROUP_SUBNET").unwrap();
    assert_eq!(bad.reason, Reason::NotApplicableButSet);
    assert_eq!(bad.observed_value, Some(Value::from("Ingress")));
}

#[test]
fn two_clause_applicability() {
    let result = commit(json!({
        "FABRIC_NAME": "f1",
        "REPLICATION_MODE": "Multicast",
        "BGP_AS": "65001",
        "MULTICAST_GROUP_SUBNET": "239.1.1.0/25",
        "UNDERLAY_IS_V6": "true",
        "ENABLE_TRM": true
    }));
    let bad = result.bad_param("ENABLE_TRM").unwrap();
    assert_eq!(bad.reason, Reason::NotApplicableButSet);
    let term = bad.failing_term.as_ref().unwrap();
    assert_eq!(term.parameter, "UNDERLAY_IS_V6");
    assert_eq!(term.operator, TermOperator::Neq);
    assert_eq!(bad.observed_value, Some(Value::Bool(true)));
}

#[test]
fn null_playbook_value_counts_as_unset() {
    let result = commit(json!({
        "FABRIC_NAME": "f1",
        "REPLICATION_MODE": "Ingress",
        "MULTICAST_GROUP_SUBNET": null
    }));
    assert!(result.is_valid(), "{result}");
}

#[test]
fn unparseable_rule_is_reported_not_enforced() {
    let result = commit(json!({
        "FABRIC_NAME": "f1",
        "REPLICATION_MODE": "Ingress",
        "BROKEN": "x"
    }));
    assert!(result.is_valid(), "{result}");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].parameter, "BROKEN");
    assert_eq!(result.diagnostics[0].tag, ContextTag::NotApplicable);
}

#[test]
fn controller_config_fills_gaps() {
    let mut verify = VerifyPlaybookParams::new();
    verify.set_template(easy_fabric()).unwrap();
    verify
        .set_config_playbook(json!({"FABRIC_NAME": "f1", "REPLICATION_MODE": "Multicast"}))
        .unwrap();
    verify
        .set_config_controller(Some(json!({
            "BGP_AS": "65001",
            "MULTICAST_GROUP_SUBNET": "239.1.1.0/25"
        })))
        .unwrap();
    assert!(verify.commit().unwrap().is_valid());
}

#[test]
fn lookups_ignore_case() {
    let result = commit(json!({"fabric_name": "f1", "replication_mode": "Ingress"}));
    assert!(result.is_valid(), "{result}");
}

#[test]
fn custom_local_params() {
    let config = VerifyConfig::from_json(r#"{"local_params": {"STAGE": "prod"}}"#).unwrap();
    let mut verify = VerifyPlaybookParams::with_config(config);
    verify
        .set_template(json!({"parameters": [
            {"name": "STAGE", "annotations": {"IsShow": "false"}},
            {"name": "AUDIT_TARGET", "annotations": {"IsMandatory": "STAGE==prod"}}
        ]}))
        .unwrap();
    verify.set_config_playbook(json!({"STAGE": "dev"})).unwrap();

    let result = verify.commit().unwrap();
    let names: Vec<&str> = result.bad_param_names().into_iter().collect();
    assert_eq!(names, ["AUDIT_TARGET"]);
}

#[test]
fn commit_does_not_mutate() {
    let mut verify = VerifyPlaybookParams::new();
    verify.set_template(easy_fabric()).unwrap();
    verify
        .set_config_playbook(json!({"REPLICATION_MODE": "Multicast"}))
        .unwrap();
    let first = verify.commit().unwrap();
    let second = verify.commit().unwrap();
    assert_eq!(first, second);
}

#[test]
fn structural_errors_abort_commit() {
    let mut verify = VerifyPlaybookParams::new();
    verify.set_template(json!({"parameters": 5})).unwrap();
    verify.set_config_playbook(json!({})).unwrap();
    let err = verify.commit().unwrap_err();
    assert_eq!(
        err,
        ValidationError::Value(ValueError::ParametersNotList {
            owner: "RuleSet"
        })
    );
}

#[test]
fn result_serializes() {
    let result = commit(json!({"FABRIC_NAME": "f1", "REPLICATION_MODE": "Multicast",
                               "MULTICAST_GROUP_SUBNET": "239.1.1.0/25"}));
    let wire = serde_json::to_value(&result).unwrap();
    assert_eq!(wire["bad_params"][0]["parameter"], "BGP_AS");
    assert_eq!(wire["bad_params"][0]["reason"], "rule_mismatch");
    assert_eq!(wire["bad_params"][0]["failing_term"]["operator"], "==");
    assert_eq!(wire["diagnostics"][0]["tag"], "na");
}

fn guarded_by(rule: &str, guard: serde_json::Value) -> VerifyPlaybookParams {
    let mut verify = VerifyPlaybookParams::new();
    verify
        .set_template(json!({"parameters": [
            guard,
            {"name": "X", "parameterType": "string", "annotations": {"IsShow": rule}}
        ]}))
        .unwrap();
    verify
}

#[test]
fn float_literal_matches_numeric_string() {
    let mut verify = guarded_by("VER==1.0", json!({"name": "VER", "parameterType": "string"}));
    verify
        .set_config_playbook(json!({"VER": "1.0", "X": "a"}))
        .unwrap();
    assert!(verify.commit().unwrap().is_valid());

    verify
        .set_config_playbook(json!({"VER": "1.5", "X": "a"}))
        .unwrap();
    let result = verify.commit().unwrap();
    assert_eq!(
        result.bad_param("X").map(|b| b.reason),
        Some(Reason::NotApplicableButSet)
    );
}

#[test]
fn boolean_spelling_ignored_for_enum_parameters() {
    let mut verify = guarded_by(
        "FLAG==true",
        json!({"name": "FLAG", "parameterType": "enum",
               "metaProperties": {"validValues": "True,False"}}),
    );
    for spelling in ["True", "true", "TRUE"] {
        verify
            .set_config_playbook(json!({"FLAG": spelling, "X": "a"}))
            .unwrap();
        let result = verify.commit().unwrap();
        assert!(result.is_valid(), "{spelling}: {result}");
    }
}

#[test]
fn integer_string_in_string_parameter_matches_integer_literal() {
    let mut verify = guarded_by("ASN==65000", json!({"name": "ASN", "parameterType": "string"}));
    verify
        .set_config_playbook(json!({"ASN": "65000", "X": "a"}))
        .unwrap();
    assert!(verify.commit().unwrap().is_valid());
}

#[test]
fn negated_rule_reports_deciding_term() {
    let mut verify = guarded_by("not (A==1)", json!({"name": "A", "parameterType": "integer"}));
    verify.set_config_playbook(json!({"A": 1, "X": "a"})).unwrap();
    let result = verify.commit().unwrap();

    let bad = result.bad_param("X").unwrap();
    assert_eq!(bad.reason, Reason::NotApplicableButSet);
    let term = bad.failing_term.as_ref().unwrap();
    assert_eq!(term.operator, TermOperator::Eq);
    assert_eq!(term.parameter, "A");
    assert_eq!(term.value, Value::Int(1));
    assert_eq!(bad.observed_value, Some(Value::Int(1)));
}

#[test]
fn disjunction_reports_the_operand_that_held() {
    let mut verify = VerifyPlaybookParams::new();
    verify
        .set_template(json!({"parameters": [
            {"name": "A", "parameterType": "integer"},
            {"name": "B", "parameterType": "integer"},
            {"name": "X", "parameterType": "string",
             "annotations": {"IsMandatory": "A==1||B==2"}}
        ]}))
        .unwrap();
    verify.set_config_playbook(json!({"A": 5, "B": 2})).unwrap();
    let result = verify.commit().unwrap();

    let bad = result.bad_param("X").unwrap();
    assert_eq!(bad.reason, Reason::RuleMismatch);
    assert_eq!(
        bad.failing_term.as_ref().map(|t| t.parameter.as_str()),
        Some("B")
    );
    assert_eq!(bad.observed_value, Some(Value::Int(2)));
}
