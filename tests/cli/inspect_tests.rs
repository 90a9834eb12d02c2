use crate::common::{parse_json, TestContext};
use predicates::prelude::*;

#[test]
fn test_inspect_summary() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["inspect", "--sources", "--names", "--map"])
        .arg(&map)
        .assert()
        .success()
        .stdout(predicate::str::contains("file: app.js"))
        .stdout(predicate::str::contains("sources: 2 (1 with embedded content)"))
        .stdout(predicate::str::contains("segments: 3"))
        .stdout(predicate::str::contains("[0] src/cart.js (embedded)"))
        .stdout(predicate::str::contains("[1] src/vendor.js"))
        .stdout(predicate::str::contains("[1] total"));
}

#[test]
fn test_inspect_json() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    let assert = ctx
        .cmd()
        .args(["inspect", "--format", "json", "--map"])
        .arg(&map)
        .assert()
        .success();

    let json = parse_json(&assert.get_output().stdout);
    let result = &json["result"];
    assert_eq!(result["version"], 3);
    assert_eq!(result["sources"], 2);
    assert_eq!(result["embedded_sources"], 1);
    assert_eq!(result["names"], 2);
    assert_eq!(result["mapped_lines"], 1);
    assert!(result.get("source_list").is_none());
}

#[test]
fn test_source_prints_embedded_content() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["source", "--map"])
        .arg(&map)
        .arg("src/cart.js")
        .assert()
        .success()
        .stdout("export function checkout() {\n  total.sum();\n}\n");
}

#[test]
fn test_source_accepts_raw_spelling() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["source", "--map"])
        .arg(&map)
        .arg("webpack:///./src/cart.js")
        .assert()
        .success()
        .stdout(predicate::str::contains("total.sum();"));
}

#[test]
fn test_source_without_content_fails() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["source", "--map"])
        .arg(&map)
        .arg("src/vendor.js")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no embedded content"));
}
