pub mod batch;
pub mod cli;
pub mod config;
pub mod loader;
pub mod logging;
pub mod sourcemap;
pub mod stacktrace;
pub mod ui;

use miette::Diagnostic;

pub use sourcemap::{MappingSegment, PositionQuery, ResolvedPosition, SourceMapDocument};

/// Result type alias for the resolver
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Error types for the resolver
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ResolverError {
    #[error("Malformed source map: {0}")]
    #[diagnostic(
        code(resolver::malformed_map),
        help("The file is not a valid version 3 source map. Regenerate it with your bundler, or check that the path points at the .map file and not the bundle.")
    )]
    MalformedMap(#[from] MalformedMapError),

    #[error("Invalid query position {line}:{column}")]
    #[diagnostic(
        code(resolver::invalid_query),
        help("Lines are 1-based and columns are 0-based. Line 0 and negative values are rejected.")
    )]
    InvalidQuery { line: i64, column: i64 },

    #[error("File operation failed: {0}")]
    #[diagnostic(
        code(resolver::file_error),
        help("Check if you have necessary permissions and that the path exists.")
    )]
    FileError(String),

    #[error("Invalid arguments: {0}")]
    #[diagnostic(
        code(resolver::invalid_arguments),
        help("Positions are written as LINE:COLUMN, e.g. `12:345`. Batch files are JSON arrays of positions.")
    )]
    InvalidArguments(String),
}

/// Structural faults found while parsing a source map.
///
/// Offsets are byte offsets into the `mappings` string; segment indices
/// count decoded segments in file order, starting at 0.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedMapError {
    #[error("invalid JSON at `{path}`: {message}")]
    Json {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unsupported version {}, expected 3", .found.as_deref().unwrap_or("<missing>"))]
    UnsupportedVersion { found: Option<String> },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("`sourcesContent` has {contents} entries but `sources` has {sources}")]
    SourcesContentLength { sources: usize, contents: usize },

    #[error("invalid base64 character {character:?} at offset {offset}")]
    InvalidBase64 { offset: usize, character: char },

    #[error("unterminated VLQ value starting at offset {offset}")]
    UnterminatedVlq { offset: usize },

    #[error("VLQ value at offset {offset} does not fit in 32 bits")]
    VlqOverflow { offset: usize },

    #[error("segment {segment} at offset {offset} has {fields} fields, expected 1, 4 or 5")]
    InvalidSegmentLength {
        segment: usize,
        offset: usize,
        fields: usize,
    },

    #[error("segment {segment} at offset {offset} has negative {field} ({value})")]
    NegativeValue {
        segment: usize,
        offset: usize,
        field: &'static str,
        value: i64,
    },

    #[error("segment {segment} at offset {offset} references source {index} but only {len} sources exist")]
    SourceIndexOutOfBounds {
        segment: usize,
        offset: usize,
        index: u32,
        len: usize,
    },

    #[error("segment {segment} at offset {offset} references name {index} but only {len} names exist")]
    NameIndexOutOfBounds {
        segment: usize,
        offset: usize,
        index: u32,
        len: usize,
    },
}

impl MalformedMapError {
    /// Byte offset into `mappings` where the fault was found, if it lies there.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidBase64 { offset, .. }
            | Self::UnterminatedVlq { offset }
            | Self::VlqOverflow { offset }
            | Self::InvalidSegmentLength { offset, .. }
            | Self::NegativeValue { offset, .. }
            | Self::SourceIndexOutOfBounds { offset, .. }
            | Self::NameIndexOutOfBounds { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
