use crate::sourcemap::{PositionQuery, ResolvedPosition, SourceMapDocument};
use crate::stacktrace::Frame;
use crossterm::style::Stylize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pretty printing utilities for resolver output
pub struct Formatter;

impl Formatter {
    /// Format one query and where it resolved to.
    pub fn format_resolution(query: &PositionQuery, resolved: &ResolvedPosition<'_>) -> String {
        if resolved.is_resolved() {
            format!("{} -> {}", query, resolved)
        } else {
            format!("{} -> {}", query, Self::warning("<unmapped>"))
        }
    }

    /// Format the original source line under a resolution, with a caret
    /// under the original column.
    pub fn format_context_line(line_number: u32, line: &str, column: Option<u32>) -> String {
        let gutter = format!("{:>5} | ", line_number);
        let mut out = format!("{}{}", gutter, line);
        if let Some(column) = column {
            let offset: usize = line
                .chars()
                .take(column as usize)
                .map(|c| if c == '\t' { 4 } else { 1 })
                .sum();
            out.push('\n');
            out.push_str(&" ".repeat(gutter.len() + offset));
            out.push_str(&Self::info("^"));
        }
        out
    }

    /// Format a resolved stack frame.
    pub fn format_frame(frame: &Frame, resolved: Option<&ResolvedPosition<'_>>) -> String {
        let function = resolved
            .and_then(|r| r.name)
            .or(frame.function.as_deref())
            .unwrap_or("<anonymous>");

        match resolved.filter(|r| r.is_resolved()) {
            Some(resolved) => format!(
                "    at {} ({}:{}:{})",
                function,
                resolved.source.unwrap_or_default(),
                resolved.original_line.unwrap_or_default(),
                resolved.original_column.unwrap_or_default()
            ),
            None => format!(
                "    at {} ({}:{}:{}) {}",
                function,
                frame.file,
                frame.line,
                frame.column,
                Self::warning("[unmapped]")
            ),
        }
    }

    /// Format the overview printed by `inspect`.
    pub fn format_map_summary(document: &SourceMapDocument) -> String {
        let mut lines = vec!["Source Map".to_string()];
        lines.push(format!("  version: {}", document.version()));
        lines.push(format!("  file: {}", document.file().unwrap_or("-")));
        lines.push(format!(
            "  source root: {}",
            document.source_root().unwrap_or("-")
        ));
        lines.push(format!(
            "  sources: {} ({} with embedded content)",
            document.sources().len(),
            document.embedded_source_count()
        ));
        lines.push(format!("  names: {}", document.names().len()));
        lines.push(format!("  segments: {}", document.mappings().len()));
        lines.push(format!("  mapped lines: {}", document.mapped_line_count()));
        lines.join("\n")
    }

    /// Format an informational message in blue.
    pub fn info(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Info)
    }

    /// Format a success message in green.
    pub fn success(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Success)
    }

    /// Format a warning message in yellow.
    pub fn warning(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Warning)
    }

    /// Format an error message in red.
    pub fn error(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Error)
    }

    /// Configure whether ANSI colors are enabled.
    pub fn configure_colors(enable: bool) {
        COLOR_ENABLED.store(enable, Ordering::Relaxed);
    }

    /// Auto-configure color output based on environment.
    pub fn configure_colors_from_env() {
        use is_terminal::IsTerminal;

        let no_color = std::env::var_os("NO_COLOR").is_some();
        Self::configure_colors(!no_color && std::io::stdout().is_terminal());
    }

    fn apply_color(message: &str, kind: ColorKind) -> String {
        if !COLOR_ENABLED.load(Ordering::Relaxed) {
            return message.to_string();
        }

        match kind {
            ColorKind::Info => format!("{}", message.blue()),
            ColorKind::Success => format!("{}", message.green()),
            ColorKind::Warning => format!("{}", message.yellow()),
            ColorKind::Error => format!("{}", message.red()),
        }
    }
}

#[derive(Copy, Clone)]
enum ColorKind {
    Info,
    Success,
    Warning,
    Error,
}

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);
