use crate::common::{parse_json, TestContext};
use predicates::prelude::*;

#[test]
fn test_resolve_text_output() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["resolve", "--map"])
        .arg(&map)
        .args(["1:0", "1:12", "2:0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1:0 -> src/cart.js:1:0 (checkout)"))
        .stdout(predicate::str::contains("1:12 -> src/cart.js:2:2 (total)"))
        .stdout(predicate::str::contains("2:0 -> <unmapped>"));
}

#[test]
fn test_resolve_with_context() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["resolve", "--context", "--map"])
        .arg(&map)
        .arg("1:10")
        .assert()
        .success()
        .stdout(predicate::str::contains("    2 |   total.sum();"));
}

#[test]
fn test_resolve_json_output() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    let assert = ctx
        .cmd()
        .args(["resolve", "--format", "json", "--map"])
        .arg(&map)
        .args(["1:31", "3:0"])
        .assert()
        .success();

    let json = parse_json(&assert.get_output().stdout);
    assert_eq!(json["status"], "success");
    let results = json["result"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["query"], "1:31");
    assert_eq!(results[0]["source"], "src/vendor.js");
    assert_eq!(results[0]["line"], 5);
    assert_eq!(results[0]["column"], 0);
    assert!(results[1]["source"].is_null());
}

#[test]
fn test_resolve_invalid_line_fails() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["resolve", "--map"])
        .arg(&map)
        .args(["1:0", "0:4"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("1:0 -> src/cart.js:1:0"))
        .stderr(predicate::str::contains("Invalid query position 0:4"));
}

#[test]
fn test_resolve_negative_column_fails() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["resolve", "--map"])
        .arg(&map)
        .arg("1:-1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid query position 1:-1"));
}

#[test]
fn test_resolve_bad_position_text() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["resolve", "--map"])
        .arg(&map)
        .arg("twelve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected LINE:COLUMN"));
}

#[test]
fn test_resolve_through_bundle_comment() {
    let ctx = TestContext::new();
    ctx.sample_map();
    let bundle = ctx
        .fixtures
        .write_bundle("app.js", "function t(){}", "app.js.map")
        .unwrap();

    ctx.cmd()
        .args(["resolve", "--map"])
        .arg(&bundle)
        .arg("1:0")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/cart.js:1:0"));
}

#[test]
fn test_resolve_from_stdin() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["resolve", "--map", "-", "1:10"])
        .write_stdin(crate::common::sample_map_json())
        .assert()
        .success()
        .stdout(predicate::str::contains("src/cart.js:2:2"));
}

#[test]
fn test_config_sets_default_format() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();
    ctx.write(".sourcemap-resolver.toml", "[output]\nformat = \"json\"\n");

    let assert = ctx
        .cmd()
        .args(["resolve", "--map"])
        .arg(&map)
        .arg("1:0")
        .assert()
        .success();
    let json = parse_json(&assert.get_output().stdout);
    assert_eq!(json["result"][0]["name"], "checkout");
}

#[test]
fn test_flag_overrides_config_format() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();
    ctx.write(".sourcemap-resolver.toml", "[output]\nformat = \"json\"\n");

    ctx.cmd()
        .args(["resolve", "--format", "text", "--map"])
        .arg(&map)
        .arg("1:0")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1:0 -> "));
}
