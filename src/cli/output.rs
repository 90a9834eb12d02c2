use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CommandOutput<T>
where
    T: Serialize,
{
    pub status: String,
    pub result: Option<T>,
    pub errors: Option<Vec<String>>,
}

impl<T: Serialize> CommandOutput<T> {
    pub fn success(result: T) -> Self {
        Self {
            status: "success".to_string(),
            result: Some(result),
            errors: None,
        }
    }

    pub fn partial(result: T, errors: Vec<String>) -> Self {
        Self {
            status: if errors.is_empty() { "success" } else { "error" }.to_string(),
            result: Some(result),
            errors: (!errors.is_empty()).then_some(errors),
        }
    }
}

/// One resolved position as printed by `resolve` and `trace`.
#[derive(Debug, Serialize)]
pub struct ResolutionOutput<'a> {
    pub query: String,
    pub source: Option<&'a str>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MapSummary<'a> {
    pub origin: String,
    pub version: u32,
    pub file: Option<&'a str>,
    pub source_root: Option<&'a str>,
    pub sources: usize,
    pub embedded_sources: usize,
    pub names: usize,
    pub segments: usize,
    pub mapped_lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_list: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_list: Option<&'a [String]>,
}
