use crate::common::{parse_json, TestContext};
use predicates::prelude::*;

const STACK: &str = "TypeError: total is undefined
    at checkout (http://localhost/js/app.js:1:11)
    at http://localhost/js/app.js:1:31
    at node:internal/process/task_queues:2:5
";

#[test]
fn test_trace_resolves_frames() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();
    let stack = ctx.write("stack.txt", STACK);

    ctx.cmd()
        .args(["trace", "--only-file", "app.js", "--map"])
        .arg(&map)
        .arg("--stack")
        .arg(&stack)
        .assert()
        .success()
        .stdout(predicate::str::contains("    at total (src/cart.js:2:2)"))
        .stdout(predicate::str::contains("    at <anonymous> (src/vendor.js:5:0)"))
        .stdout(predicate::str::contains(
            "(node:internal/process/task_queues:2:5) [unmapped]",
        ));
}

#[test]
fn test_trace_reads_stdin() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["trace", "--map"])
        .arg(&map)
        .write_stdin("render@http://localhost/js/app.js:1:1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("    at checkout (src/cart.js:1:0)"));
}

#[test]
fn test_trace_json_output() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();
    let stack = ctx.write("stack.txt", STACK);

    let assert = ctx
        .cmd()
        .args(["trace", "--format", "json", "--only-file", "app.js", "--map"])
        .arg(&map)
        .arg("--stack")
        .arg(&stack)
        .assert()
        .success();

    let json = parse_json(&assert.get_output().stdout);
    let frames = json["result"].as_array().unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0]["function"], "checkout");
    assert_eq!(frames[0]["query"], "1:10");
    assert_eq!(frames[0]["source"], "src/cart.js");
    assert_eq!(frames[0]["name"], "total");
    assert!(frames[1].get("function").is_none());
    assert!(frames[2]["source"].is_null());
}

#[test]
fn test_trace_only_file_from_config() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();
    let stack = ctx.write("stack.txt", STACK);
    ctx.write(
        ".sourcemap-resolver.toml",
        "[resolve]\nonly_file = \"vendor.js\"\n",
    );

    ctx.cmd()
        .args(["trace", "--map"])
        .arg(&map)
        .arg("--stack")
        .arg(&stack)
        .assert()
        .success()
        .stdout(predicate::str::contains("(http://localhost/js/app.js:1:11) [unmapped]"));
}

#[test]
fn test_trace_without_frames_fails() {
    let ctx = TestContext::new();
    let map = ctx.sample_map();

    ctx.cmd()
        .args(["trace", "--map"])
        .arg(&map)
        .write_stdin("just a message\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no stack frames found"));
}

#[test]
fn test_trace_rejects_map_and_stack_both_on_stdin() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["trace", "--map", "-"])
        .write_stdin(crate::common::sample_map_json())
        .assert()
        .failure()
        .stderr(predicate::str::contains("both on stdin"));
}

#[test]
fn test_trace_map_on_stdin_with_stack_file() {
    let ctx = TestContext::new();
    let stack = ctx.write("stack.txt", STACK);

    ctx.cmd()
        .args(["trace", "--map", "-", "--stack"])
        .arg(&stack)
        .write_stdin(crate::common::sample_map_json())
        .assert()
        .success()
        .stdout(predicate::str::contains("    at total (src/cart.js:2:2)"));
}
