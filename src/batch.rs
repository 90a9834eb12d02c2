use crate::sourcemap::{normalize_source_path, PositionQuery, ResolvedPosition, SourceMapDocument};
use crate::ResolverError;
use crate::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// A single batch query with an optional label and expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    pub query: PositionQuery,
    /// Optional label for this query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Source path the query is expected to resolve into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BatchItemInput {
    Text(String),
    Pair(i64, i64),
    Structured {
        #[serde(alias = "generated_line")]
        line: i64,
        #[serde(alias = "generated_column")]
        column: i64,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        expected_source: Option<String>,
    },
}

/// Result of a single batch query
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult<'a> {
    pub index: usize,
    pub label: Option<String>,
    pub query: PositionQuery,
    pub resolved: Option<ResolvedPosition<'a>>,
    pub error: Option<String>,
    pub expected_source: Option<String>,
    pub passed: bool,
}

/// Summary of batch resolution results
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub failed: usize,
    pub errors: usize,
    pub total_duration_ms: u128,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Resolves many queries against one shared document
pub struct BatchResolver<'a> {
    document: &'a SourceMapDocument,
}

impl<'a> BatchResolver<'a> {
    pub fn new(document: &'a SourceMapDocument) -> Self {
        Self { document }
    }

    /// Load batch items from a JSON file
    pub fn load_batch_file<P: AsRef<Path>>(path: P) -> Result<Vec<BatchItem>> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ResolverError::FileError(format!(
                "Failed to read batch file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Self::parse_batch(&content)
    }

    /// Parse a JSON array of `"LINE:COL"` strings, `[line, col]` pairs or objects
    pub fn parse_batch(content: &str) -> Result<Vec<BatchItem>> {
        let parsed: Vec<BatchItemInput> = serde_json::from_str(content).map_err(|e| {
            ResolverError::InvalidArguments(format!(
                "Failed to parse batch file as JSON array: {}",
                e
            ))
        })?;

        parsed.into_iter().map(BatchItem::try_from).collect()
    }

    /// Resolve all batch items in parallel
    pub fn execute_batch(&self, items: &[BatchItem]) -> Vec<BatchResult<'a>> {
        crate::logging::log_batch_start(items.len());
        items
            .par_iter()
            .enumerate()
            .map(|(index, item)| self.execute_single(index, item))
            .collect()
    }

    fn execute_single(&self, index: usize, item: &BatchItem) -> BatchResult<'a> {
        let document: &'a SourceMapDocument = self.document;
        let (resolved, error) = match document.original_position_for(item.query) {
            Ok(resolved) => (Some(resolved), None),
            Err(e) => (None, Some(e.to_string())),
        };

        let passed = match (&resolved, &item.expected_source) {
            (Some(resolved), Some(expected)) => {
                resolved.source == Some(self.expected_name(expected).as_str())
            }
            (Some(_), None) => true,
            (None, _) => false,
        };

        BatchResult {
            index,
            label: item.label.clone(),
            query: item.query,
            resolved,
            error,
            expected_source: item.expected_source.clone(),
            passed,
        }
    }

    /// The document's name for an expected source, accepting raw spellings.
    fn expected_name(&self, expected: &str) -> String {
        match self.document.canonical_source(expected) {
            Some(name) => name.to_string(),
            None => normalize_source_path(expected, self.document.source_root()),
        }
    }

    /// Summarize batch results
    pub fn summarize(results: &[BatchResult<'_>], started: Instant) -> BatchSummary {
        let resolved = results
            .iter()
            .filter(|r| r.resolved.map(|p| p.is_resolved()).unwrap_or(false))
            .count();
        let errors = results.iter().filter(|r| r.error.is_some()).count();
        let failed = results
            .iter()
            .filter(|r| r.error.is_none() && !r.passed)
            .count();

        BatchSummary {
            total: results.len(),
            resolved,
            unresolved: results.len() - resolved - errors,
            failed,
            errors,
            total_duration_ms: started.elapsed().as_millis(),
        }
    }

    /// Render results as a table followed by the summary
    pub fn render_results(results: &[BatchResult<'_>], summary: &BatchSummary) -> String {
        use crate::ui::formatter::Formatter;

        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(80));
        let _ = writeln!(out, "  Batch Resolution Results");
        let _ = writeln!(out, "{}", "=".repeat(80));
        let _ = writeln!(
            out,
            "{:<6} {:<8} {:<18} {:<12} {:<34}",
            "Index", "Status", "Label", "Query", "Original"
        );
        let _ = writeln!(out, "{}", "-".repeat(80));

        for result in results {
            let status = if result.error.is_some() {
                "ERROR"
            } else if !result.passed {
                "FAIL"
            } else {
                "OK"
            };

            let default_label = format!("#{}", result.index);
            let label = result.label.as_deref().unwrap_or(&default_label);
            let original = match (&result.resolved, &result.error) {
                (_, Some(error)) => error.clone(),
                (Some(resolved), None) => resolved.to_string(),
                (None, None) => "-".to_string(),
            };

            let _ = writeln!(
                out,
                "{:<6} {:<8} {:<18} {:<12} {:<34}",
                result.index,
                status,
                truncate_for_table(label, 18),
                result.query.to_string(),
                truncate_for_table(&original, 34),
            );
            if status == "FAIL" {
                if let Some(expected) = &result.expected_source {
                    let _ = writeln!(
                        out,
                        "       {}",
                        Formatter::warning(format!("expected source {}", expected))
                    );
                }
            }
        }

        let _ = writeln!(out, "{}", "=".repeat(80));
        let _ = writeln!(out, "  Total:      {}", summary.total);
        let _ = writeln!(
            out,
            "  {}",
            Formatter::success(format!("Resolved:   {}", summary.resolved))
        );
        let _ = writeln!(out, "  Unresolved: {}", summary.unresolved);
        if summary.failed > 0 {
            let _ = writeln!(
                out,
                "  {}",
                Formatter::warning(format!("Failed:     {}", summary.failed))
            );
        }
        if summary.errors > 0 {
            let _ = writeln!(
                out,
                "  {}",
                Formatter::error(format!("Errors:     {}", summary.errors))
            );
        }
        let _ = writeln!(out, "  Duration:   {}ms", summary.total_duration_ms);
        let _ = write!(out, "{}", "=".repeat(80));
        out
    }
}

impl TryFrom<BatchItemInput> for BatchItem {
    type Error = ResolverError;

    fn try_from(value: BatchItemInput) -> Result<Self> {
        Ok(match value {
            BatchItemInput::Text(text) => Self {
                query: text.parse()?,
                label: None,
                expected_source: None,
            },
            BatchItemInput::Pair(line, column) => Self {
                query: PositionQuery::new(line, column),
                label: None,
                expected_source: None,
            },
            BatchItemInput::Structured {
                line,
                column,
                label,
                expected_source,
            } => Self {
                query: PositionQuery::new(line, column),
                label,
                expected_source,
            },
        })
    }
}

fn truncate_for_table(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }

    let mut truncated = value
        .chars()
        .take(limit.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}
