use super::lookup::LineIndex;
use super::paths::{normalize_source_path, normalize_source_path_with_query};
use super::vlq;
use crate::{MalformedMapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Prefix some servers put in front of JSON to defeat script inclusion.
const XSSI_PREFIX: &str = ")]}'";

/// One decoded entry of the `mappings` field.
///
/// Lines are 1-based and columns 0-based. `original_line` and
/// `original_column` are always set when `source_index` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSegment {
    pub generated_line: u32,
    pub generated_column: u32,
    pub source_index: Option<u32>,
    pub original_line: Option<u32>,
    pub original_column: Option<u32>,
    pub name_index: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
    #[serde(default)]
    version: Option<serde_json::Value>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    source_root: Option<String>,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    mappings: Option<String>,
}

/// A parsed, validated source map. Immutable once built.
#[derive(Debug, Clone)]
pub struct SourceMapDocument {
    pub(crate) file: Option<String>,
    pub(crate) source_root: Option<String>,
    pub(crate) sources: Vec<String>,
    pub(crate) sources_content: Option<Vec<Option<String>>>,
    pub(crate) names: Vec<String>,
    pub(crate) mappings: Vec<MappingSegment>,
    pub(crate) index: LineIndex,
    pub(crate) source_ids: HashMap<String, usize>,
    pub(crate) raw_source_ids: HashMap<String, usize>,
}

impl SourceMapDocument {
    /// Parse the text of a version 3 source map.
    pub fn parse(raw: &str) -> Result<Self> {
        let text = strip_preamble(raw);

        let mut deserializer = serde_json::Deserializer::from_str(text);
        let map: RawSourceMap =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
                let path = e.path().to_string();
                let inner = e.into_inner();
                MalformedMapError::Json {
                    path,
                    line: inner.line(),
                    column: inner.column(),
                    message: inner.to_string(),
                }
            })?;

        match map.version.as_ref().and_then(serde_json::Value::as_u64) {
            Some(3) => {}
            _ => {
                return Err(MalformedMapError::UnsupportedVersion {
                    found: map.version.map(|v| v.to_string()),
                }
                .into())
            }
        }

        let mappings = map
            .mappings
            .ok_or(MalformedMapError::MissingField("mappings"))?;

        if let Some(contents) = &map.sources_content {
            if contents.len() != map.sources.len() {
                return Err(MalformedMapError::SourcesContentLength {
                    sources: map.sources.len(),
                    contents: contents.len(),
                }
                .into());
            }
        }

        let segments = vlq::decode_mappings(&mappings, map.sources.len(), map.names.len())?;

        let source_root = map.source_root.filter(|root| !root.is_empty());
        let sources = canonical_sources(&map.sources, source_root.as_deref());

        let mut source_ids = HashMap::with_capacity(sources.len());
        for (index, source) in sources.iter().enumerate() {
            source_ids.entry(source.clone()).or_insert(index);
        }
        let mut raw_source_ids = HashMap::with_capacity(map.sources.len());
        for (index, raw) in map.sources.into_iter().enumerate() {
            raw_source_ids.entry(raw).or_insert(index);
        }

        let index = LineIndex::build(&segments);
        tracing::debug!(
            segments = segments.len(),
            lines = index.line_count(),
            sources = sources.len(),
            "Source map parsed"
        );

        Ok(Self {
            file: map.file,
            source_root,
            sources,
            sources_content: map.sources_content,
            names: map.names,
            mappings: segments,
            index,
            source_ids,
            raw_source_ids,
        })
    }

    pub fn version(&self) -> u32 {
        3
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    /// Normalized source paths, in the order the map lists them.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn sources_content(&self) -> Option<&[Option<String>]> {
        self.sources_content.as_deref()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Decoded segments in file order.
    pub fn mappings(&self) -> &[MappingSegment] {
        &self.mappings
    }

    /// Number of generated lines that carry at least one segment.
    pub fn mapped_line_count(&self) -> usize {
        self.index.mapped_line_count()
    }

    /// Number of sources that have embedded content.
    pub fn embedded_source_count(&self) -> usize {
        self.sources_content
            .as_ref()
            .map(|contents| contents.iter().filter(|c| c.is_some()).count())
            .unwrap_or(0)
    }

    /// Re-encode the decoded segments as a `mappings` string.
    pub fn encode_mappings(&self) -> String {
        vlq::encode_mappings(&self.mappings)
    }
}

impl FromStr for SourceMapDocument {
    type Err = crate::ResolverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Normalize every source. Sources that would collapse onto the same name
/// once their query string is dropped (`App.vue?vue&type=script` and
/// `App.vue?vue&type=template`) keep the query so each stays addressable.
fn canonical_sources(raw: &[String], source_root: Option<&str>) -> Vec<String> {
    let stripped: Vec<String> = raw
        .iter()
        .map(|source| normalize_source_path(source, source_root))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(stripped.len());
    for path in &stripped {
        *counts.entry(path.as_str()).or_insert(0) += 1;
    }

    raw.iter()
        .zip(&stripped)
        .map(|(source, path)| {
            if counts.get(path.as_str()).copied().unwrap_or(0) > 1 {
                normalize_source_path_with_query(source, source_root)
            } else {
                path.clone()
            }
        })
        .collect()
}

fn strip_preamble(raw: &str) -> &str {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    match text.strip_prefix(XSSI_PREFIX) {
        Some(rest) => rest.split_once('\n').map(|(_, body)| body).unwrap_or(""),
        None => text,
    }
}
