use super::document::{MappingSegment, SourceMapDocument};
use super::paths::{normalize_source_path, normalize_source_path_with_query};
use crate::{ResolverError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// A position in generated code: 1-based line, 0-based column.
///
/// Fields are signed so that out-of-range input can be represented and
/// rejected by [`PositionQuery::validate`] instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionQuery {
    #[serde(alias = "line")]
    pub generated_line: i64,
    #[serde(alias = "column")]
    pub generated_column: i64,
}

impl PositionQuery {
    pub fn new(generated_line: i64, generated_column: i64) -> Self {
        Self {
            generated_line,
            generated_column,
        }
    }

    /// Reject line 0, negative lines and negative columns.
    ///
    /// Positions past `u32::MAX` are valid but no segment can cover them,
    /// so they come back as `None`.
    pub fn validate(&self) -> Result<Option<(u32, u32)>> {
        if self.generated_line < 1 || self.generated_column < 0 {
            return Err(ResolverError::InvalidQuery {
                line: self.generated_line,
                column: self.generated_column,
            });
        }
        Ok(u32::try_from(self.generated_line)
            .ok()
            .zip(u32::try_from(self.generated_column).ok()))
    }
}

impl fmt::Display for PositionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generated_line, self.generated_column)
    }
}

impl FromStr for PositionQuery {
    type Err = ResolverError;

    /// Parse `LINE:COLUMN`.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || {
            ResolverError::InvalidArguments(format!(
                "expected LINE:COLUMN, got {:?}",
                s
            ))
        };
        let (line, column) = s.trim().split_once(':').ok_or_else(bad)?;
        let line = line.trim().parse::<i64>().map_err(|_| bad())?;
        let column = column.trim().parse::<i64>().map_err(|_| bad())?;
        Ok(Self::new(line, column))
    }
}

/// Where a generated position came from.
///
/// Every field is `None` when no mapping covers the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedPosition<'a> {
    pub source: Option<&'a str>,
    pub original_line: Option<u32>,
    pub original_column: Option<u32>,
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_content: Option<&'a str>,
}

impl ResolvedPosition<'_> {
    pub fn is_resolved(&self) -> bool {
        self.source.is_some()
    }
}

impl fmt::Display for ResolvedPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.source, self.original_line, self.original_column) {
            (Some(source), Some(line), Some(column)) => {
                write!(f, "{}:{}:{}", source, line, column)?;
                if let Some(name) = self.name {
                    write!(f, " ({})", name)?;
                }
                Ok(())
            }
            _ => write!(f, "<unmapped>"),
        }
    }
}

/// Segments grouped by generated line, each line ordered by column.
///
/// `ordered` holds indices into the document's segment list. Within a line,
/// segments sharing a column keep their file order.
#[derive(Debug, Clone, Default)]
pub(crate) struct LineIndex {
    lines: Vec<Range<usize>>,
    ordered: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn build(segments: &[MappingSegment]) -> Self {
        let line_count = segments
            .last()
            .map(|s| s.generated_line as usize)
            .unwrap_or(0);
        let mut lines = vec![0..0; line_count];
        let mut ordered: Vec<usize> = (0..segments.len()).collect();

        let mut start = 0;
        while start < segments.len() {
            let line = segments[start].generated_line;
            let end = start
                + segments[start..]
                    .iter()
                    .take_while(|s| s.generated_line == line)
                    .count();
            ordered[start..end].sort_by_key(|&i| segments[i].generated_column);
            lines[line as usize - 1] = start..end;
            start = end;
        }

        Self { lines, ordered }
    }

    pub(crate) fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn mapped_line_count(&self) -> usize {
        self.lines.iter().filter(|range| !range.is_empty()).count()
    }

    /// Index of the first segment, in file order, at the greatest column
    /// not exceeding `column` on `line`.
    pub(crate) fn find(&self, segments: &[MappingSegment], line: u32, column: u32) -> Option<usize> {
        let range = self.lines.get((line as usize).checked_sub(1)?)?.clone();
        let ordered = &self.ordered[range];

        let upper = ordered.partition_point(|&i| segments[i].generated_column <= column);
        let mut found = upper.checked_sub(1)?;
        let target = segments[ordered[found]].generated_column;
        while found > 0 && segments[ordered[found - 1]].generated_column == target {
            found -= 1;
        }
        Some(ordered[found])
    }
}

impl SourceMapDocument {
    /// Resolve a generated position to its original location.
    ///
    /// Only segments on the query's own line are considered. An unmapped
    /// position is a normal outcome and yields an all-`None` result.
    pub fn original_position_for(&self, query: PositionQuery) -> Result<ResolvedPosition<'_>> {
        let Some((line, column)) = query.validate()? else {
            return Ok(ResolvedPosition::default());
        };

        let Some(found) = self.index.find(&self.mappings, line, column) else {
            return Ok(ResolvedPosition::default());
        };
        let segment = &self.mappings[found];

        let Some(source_index) = segment.source_index.map(|i| i as usize) else {
            return Ok(ResolvedPosition::default());
        };

        Ok(ResolvedPosition {
            source: Some(self.sources[source_index].as_str()),
            original_line: segment.original_line,
            original_column: segment.original_column,
            name: segment
                .name_index
                .map(|i| self.names[i as usize].as_str()),
            source_content: self.content_at(source_index),
        })
    }

    /// The segment a query resolves to, if any.
    pub fn segment_for(&self, query: PositionQuery) -> Result<Option<&MappingSegment>> {
        let Some((line, column)) = query.validate()? else {
            return Ok(None);
        };
        Ok(self
            .index
            .find(&self.mappings, line, column)
            .map(|i| &self.mappings[i]))
    }

    /// Embedded text for a source path. Raw and normalized spellings both match.
    pub fn source_content_for(&self, source: &str) -> Option<&str> {
        self.content_at(self.source_index_for(source)?)
    }

    /// The name this document uses for a source, given any spelling of it.
    pub fn canonical_source(&self, source: &str) -> Option<&str> {
        self.source_index_for(source)
            .map(|index| self.sources[index].as_str())
    }

    /// Exact raw spelling first, then the normalized forms. A bare name that
    /// several query-suffixed sources share matches none of them.
    fn source_index_for(&self, source: &str) -> Option<usize> {
        let root = self.source_root.as_deref();
        self.raw_source_ids
            .get(source)
            .or_else(|| self.source_ids.get(source))
            .or_else(|| {
                self.source_ids
                    .get(&normalize_source_path_with_query(source, root))
            })
            .or_else(|| self.source_ids.get(&normalize_source_path(source, root)))
            .copied()
    }

    /// The single original line a resolved position points at.
    pub fn source_line_for<'a>(&'a self, resolved: &ResolvedPosition<'a>) -> Option<&'a str> {
        let content = resolved.source_content?;
        let line = resolved.original_line?;
        content.lines().nth(line.saturating_sub(1) as usize)
    }

    fn content_at(&self, index: usize) -> Option<&str> {
        self.sources_content
            .as_ref()?
            .get(index)?
            .as_deref()
    }
}
