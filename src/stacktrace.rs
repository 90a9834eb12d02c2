//! JavaScript stack trace frames.
//!
//! Recognized shapes:
//!
//! ```text
//!     at render (https://example.com/js/app.3f2a.js:1:4821)
//!     at https://example.com/js/app.3f2a.js:1:4821
//! render@https://example.com/js/app.3f2a.js:1:4821
//! ```
//!
//! Stack trace columns are 1-based; [`Frame::query`] converts them to the
//! 0-based columns source maps use.

use crate::sourcemap::PositionQuery;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub function: Option<String>,
    pub file: String,
    pub line: i64,
    pub column: i64,
}

impl Frame {
    pub fn query(&self) -> PositionQuery {
        PositionQuery::new(self.line, self.column - 1)
    }
}

fn v8_frame() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*at (?:(?P<func>.+?) \()?(?P<file>[^()\s]+?):(?P<line>\d+):(?P<col>\d+)\)?\s*$")
            .expect("valid V8 frame regex")
    })
}

fn gecko_frame() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<func>[^@\s]*)@(?P<file>\S+?):(?P<line>\d+):(?P<col>\d+)\s*$")
            .expect("valid Gecko frame regex")
    })
}

/// Parse one stack trace line. Lines that are not frames return `None`.
pub fn parse_frame(line: &str) -> Option<Frame> {
    let captures = v8_frame()
        .captures(line)
        .or_else(|| gecko_frame().captures(line))?;

    let function = captures
        .name("func")
        .map(|m| m.as_str().trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string);

    Some(Frame {
        function,
        file: captures.name("file")?.as_str().to_string(),
        line: captures.name("line")?.as_str().parse().ok()?,
        column: captures.name("col")?.as_str().parse().ok()?,
    })
}

/// Parse every frame of a pasted stack trace, skipping the message lines.
pub fn parse_stack(text: &str) -> Vec<Frame> {
    text.lines().filter_map(parse_frame).collect()
}
