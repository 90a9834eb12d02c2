use crate::vlq;
use serde::Serialize;
use serde_json::Value;

/// One mapping in absolute coordinates: 1-based lines, 0-based columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub original: Option<(u32, u32, u32)>,
    pub name: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawMap<'a> {
    version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_root: Option<&'a str>,
    sources: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    sources_content: Option<Vec<Option<&'a str>>>,
    names: &'a [String],
    mappings: String,
}

#[derive(Default)]
pub struct MapBuilder {
    file: Option<String>,
    source_root: Option<String>,
    sources: Vec<String>,
    contents: Vec<Option<String>>,
    names: Vec<String>,
    mappings: Vec<Mapping>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }

    pub fn source_root(mut self, root: &str) -> Self {
        self.source_root = Some(root.to_string());
        self
    }

    pub fn source(mut self, path: &str, content: Option<&str>) -> Self {
        self.sources.push(path.to_string());
        self.contents.push(content.map(str::to_string));
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    /// Map a generated position to `(source, line, column)` in the original.
    pub fn map(mut self, generated: (u32, u32), original: (u32, u32, u32)) -> Self {
        self.mappings.push(Mapping {
            generated_line: generated.0,
            generated_column: generated.1,
            original: Some(original),
            name: None,
        });
        self
    }

    pub fn map_named(mut self, generated: (u32, u32), original: (u32, u32, u32), name: u32) -> Self {
        self.mappings.push(Mapping {
            generated_line: generated.0,
            generated_column: generated.1,
            original: Some(original),
            name: Some(name),
        });
        self
    }

    /// A generated-only segment that maps to nothing.
    pub fn unmapped(mut self, generated: (u32, u32)) -> Self {
        self.mappings.push(Mapping {
            generated_line: generated.0,
            generated_column: generated.1,
            original: None,
            name: None,
        });
        self
    }

    /// Encode mappings in insertion order, grouped onto their generated lines.
    pub fn mappings_string(&self) -> String {
        let mut ordered = self.mappings.clone();
        ordered.sort_by_key(|m| m.generated_line);

        let mut out = String::new();
        let mut line = 1;
        let mut first = true;
        let (mut column, mut source, mut orig_line, mut orig_column, mut name) =
            (0i64, 0i64, 0i64, 0i64, 0i64);

        for mapping in &ordered {
            while line < mapping.generated_line {
                out.push(';');
                line += 1;
                column = 0;
                first = true;
            }
            if !first {
                out.push(',');
            }
            first = false;

            vlq::encode(&mut out, i64::from(mapping.generated_column) - column);
            column = i64::from(mapping.generated_column);

            if let Some((s, l, c)) = mapping.original {
                vlq::encode(&mut out, i64::from(s) - source);
                vlq::encode(&mut out, i64::from(l) - 1 - orig_line);
                vlq::encode(&mut out, i64::from(c) - orig_column);
                source = i64::from(s);
                orig_line = i64::from(l) - 1;
                orig_column = i64::from(c);

                if let Some(n) = mapping.name {
                    vlq::encode(&mut out, i64::from(n) - name);
                    name = i64::from(n);
                }
            }
        }
        out
    }

    pub fn to_value(&self) -> Value {
        let has_content = self.contents.iter().any(Option::is_some);
        let raw = RawMap {
            version: 3,
            file: self.file.as_deref(),
            source_root: self.source_root.as_deref(),
            sources: &self.sources,
            sources_content: has_content
                .then(|| self.contents.iter().map(|c| c.as_deref()).collect()),
            names: &self.names,
            mappings: self.mappings_string(),
        };
        serde_json::to_value(raw).unwrap_or(Value::Null)
    }

    pub fn build_json(&self) -> String {
        self.to_value().to_string()
    }
}
