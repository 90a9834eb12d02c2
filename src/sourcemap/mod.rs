//! Source map v3 parsing and position lookup.

pub mod document;
pub mod lookup;
pub mod paths;
pub mod vlq;

pub use document::{MappingSegment, SourceMapDocument};
pub use lookup::{PositionQuery, ResolvedPosition};
pub use paths::{normalize_source_path, normalize_source_path_with_query};
