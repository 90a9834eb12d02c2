use sourcemap_fixtures::{FixtureDir, MapBuilder};
use std::path::PathBuf;

/// Helper struct for managing test resources
pub struct TestContext {
    pub fixtures: FixtureDir,
}

impl TestContext {
    pub fn new() -> Self {
        TestContext {
            fixtures: FixtureDir::new().expect("Failed to create fixture dir"),
        }
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        self.fixtures
            .write(name, content)
            .expect("Failed to write fixture")
    }

    /// Write the sample map and return its path
    pub fn sample_map(&self) -> PathBuf {
        self.write("app.js.map", &sample_map_json())
    }

    /// A command running inside the fixture dir, isolated from user config
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cmd();
        cmd.current_dir(self.fixtures.path())
            .env("XDG_CONFIG_HOME", self.fixtures.path())
            .env("HOME", self.fixtures.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("SMAP_RESOLVE_JSON");
        cmd
    }
}

/// Get the smap-resolve command
#[allow(deprecated)]
pub fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("smap-resolve").expect("Failed to find smap-resolve binary")
}

/// Two sources, embedded content for the first, two names.
///
/// Generated line 1: col 0 -> src/cart.js:1:0, col 10 -> src/cart.js:2:2 (total),
/// col 30 -> src/vendor.js:5:0. Line 2 has no segments.
pub fn sample_map_json() -> String {
    MapBuilder::new()
        .file("app.js")
        .source(
            "webpack:///./src/cart.js",
            Some("export function checkout() {\n  total.sum();\n}\n"),
        )
        .source("webpack:///./src/vendor.js", None)
        .name("checkout")
        .name("total")
        .map_named((1, 0), (0, 1, 0), 0)
        .map_named((1, 10), (0, 2, 2), 1)
        .map((1, 30), (1, 5, 0))
        .build_json()
}

/// Validate JSON output string
pub fn parse_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is not valid JSON")
}
