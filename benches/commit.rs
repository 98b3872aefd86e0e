use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use template_rules::{parse_rule, RuleSet, VerifyPlaybookParams};

/// Build a template with `n` parameters. Every parameter after the first
/// carries an applicability rule and a mandatory rule on its predecessor.
fn build_template(n: usize) -> serde_json::Value {
    let parameters: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            if i == 0 {
                json!({"name": "P0", "parameterType": "boolean"})
            } else {
                json!({
                    "name": format!("P{i}"),
                    "parameterType": "boolean",
                    "annotations": {
                        "IsShow": format!("\"P{}!=false\"", i - 1),
                        "IsMandatory": format!("\"(P{}==true)&&(P0==true)\"", i - 1),
                    }
                })
            }
        })
        .collect();
    json!({ "parameters": parameters })
}

fn build_playbook(n: usize) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = (0..n)
        .map(|i| (format!("P{i}"), json!(true)))
        .collect();
    serde_json::Value::Object(map)
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_rule");
    for rule in [
        "\"ADVERTISE_PIP_BGP!=true\"",
        "\"(REPLICATION_MODE==Multicast)&&(UNDERLAY_IS_V6!=true)\"",
        "\"A==1&&B==2||C==3&&D!=4\"",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(rule), rule, |b, rule| {
            b.iter(|| parse_rule("P", black_box(rule)));
        });
    }
    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("ruleset_refresh");
    for &n in &[10, 100, 500] {
        let mut ruleset = RuleSet::new();
        ruleset.set_template(build_template(n)).unwrap();
        group.bench_function(format!("{n}_params"), |b| {
            b.iter(|| ruleset.refresh().unwrap());
        });
    }
    group.finish();
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit");
    for &n in &[10, 100, 500] {
        let mut verify = VerifyPlaybookParams::new();
        verify.set_template(build_template(n)).unwrap();
        verify.set_config_playbook(build_playbook(n)).unwrap();
        group.bench_function(format!("{n}_params"), |b| {
            b.iter(|| black_box(verify.commit().unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_refresh, bench_commit);
criterion_main!(benches);
