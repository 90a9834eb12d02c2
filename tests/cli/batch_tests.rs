use crate::common::{parse_json, TestContext};
use predicates::prelude::*;

#[test]
fn test_batch_all_pass() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();
    let batch = ctx.write(
        "queries.json",
        r#"[
            "1:0",
            [1, 31],
            {"line": 1, "column": 12, "label": "sum call", "expected_source": "src/cart.js"},
            {"generated_line": 2, "generated_column": 0}
        ]"#,
    );

    ctx.cmd()
        .args(["batch", "--map"])
        .arg(&map)
        .arg("--file")
        .arg(&batch)
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch Resolution Results"))
        .stdout(predicate::str::contains("sum call"));
}

#[test]
fn test_batch_expectation_mismatch_fails() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();
    let batch = ctx.write(
        "queries.json",
        r#"[{"line": 1, "column": 31, "expected_source": "src/cart.js"}]"#,
    );

    ctx.cmd()
        .args(["batch", "--map"])
        .arg(&map)
        .arg("--file")
        .arg(&batch)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stderr(predicate::str::contains("1 of 1 batch queries failed"));
}

#[test]
fn test_batch_invalid_query_is_reported_per_item() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();
    let batch = ctx.write("queries.json", r#"["1:0", "0:0"]"#);

    let assert = ctx
        .cmd()
        .args(["batch", "--format", "json", "--map"])
        .arg(&map)
        .arg("--file")
        .arg(&batch)
        .assert()
        .failure();

    let json = parse_json(&assert.get_output().stdout);
    assert_eq!(json["status"], "error");
    let summary = &json["result"]["summary"];
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["resolved"], 1);
    assert_eq!(summary["errors"], 1);

    let results = json["result"]["results"].as_array().unwrap();
    assert_eq!(results[0]["resolved"]["source"], "src/cart.js");
    assert!(results[1]["error"]
        .as_str()
        .unwrap()
        .contains("Invalid query position 0:0"));
}

#[test]
fn test_batch_rejects_non_array() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();
    let batch = ctx.write("queries.json", r#"{"line": 1}"#);

    ctx.cmd()
        .args(["batch", "--map"])
        .arg(&map)
        .arg("--file")
        .arg(&batch)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse batch file"));
}
