//! Validate a playbook against a small fabric template and print the result.
//!
//! Run with `RUST_LOG=template_rules=debug` to see the engine's events.

use serde_json::json;
use template_rules::{Error, VerifyPlaybookParams};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let template = json!({"parameters": [
        {"name": "FABRIC_NAME", "parameterType": "string",
         "annotations": {"IsMandatory": "true"}},
        {"name": "REPLICATION_MODE", "parameterType": "enum",
         "metaProperties": {"validValues": "Multicast,Ingress", "defaultValue": "Multicast"}},
        {"name": "BGP_AS", "parameterType": "string",
         "annotations": {"IsMandatory": "\"REPLICATION_MODE==Multicast\""}},
        {"name": "ADVERTISE_PIP_BGP", "parameterType": "boolean",
         "metaProperties": {"defaultValue": "false"}},
        {"name": "ADVERTISE_PIP_ON_BORDER", "parameterType": "boolean",
         "annotations": {"IsShow": "\"ADVERTISE_PIP_BGP!=true\""}},
        {"name": "ANYCAST_GW_MAC", "parameterType": "macAddress",
         "annotations": {"IsShow": "\"FABRIC_NAME=>x\""}}
    ]});

    let mut verify = VerifyPlaybookParams::new();
    verify.set_template(template)?;
    verify.set_config_playbook(json!({
        "FABRIC_NAME": "fabric-1",
        "REPLICATION_MODE": "Multicast",
        "ADVERTISE_PIP_BGP": true,
        "ADVERTISE_PIP_ON_BORDER": false,
        "DEPLOY": true
    }))?;
    verify.set_config_controller(Some(json!({"REPLICATION_MODE": "Ingress"})))?;

    let result = verify.commit()?;
    println!("{result}");
    for bad in &result.bad_params {
        println!("  {bad}");
    }
    for diagnostic in &result.diagnostics {
        println!("  unparseable {} rule on {}: {}", diagnostic.tag, diagnostic.parameter, diagnostic.message);
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
