use proptest::prelude::*;
use sourcemap_resolver::{MappingSegment, PositionQuery, SourceMapDocument};

use crate::strategies::{builder_for, segments};

/// Linear-scan reference: the first segment in file order at the greatest
/// column not past the query, on the query's line only.
fn expected_segment(
    segments: &[MappingSegment],
    line: u32,
    column: u32,
) -> Option<&MappingSegment> {
    let best = segments
        .iter()
        .filter(|s| s.generated_line == line && s.generated_column <= column)
        .map(|s| s.generated_column)
        .max()?;
    segments
        .iter()
        .find(|s| s.generated_line == line && s.generated_column == best)
}

proptest! {
    #[test]
    fn test_lookup_matches_linear_scan(
        segments in segments(),
        queries in prop::collection::vec((1u32..40, 0u32..220), 1..40),
    ) {
        let doc = SourceMapDocument::parse(&builder_for(&segments).build_json()).unwrap();

        for (line, column) in queries {
            let query = PositionQuery::new(i64::from(line), i64::from(column));
            let resolved = doc.original_position_for(query).unwrap();
            let expected = expected_segment(&segments, line, column)
                .filter(|s| s.source_index.is_some());

            match expected {
                Some(segment) => {
                    let source = segment.source_index.map(|i| doc.sources()[i as usize].as_str());
                    prop_assert_eq!(resolved.source, source);
                    prop_assert_eq!(resolved.original_line, segment.original_line);
                    prop_assert_eq!(resolved.original_column, segment.original_column);
                    prop_assert_eq!(
                        resolved.name,
                        segment.name_index.map(|i| doc.names()[i as usize].as_str())
                    );
                }
                None => prop_assert!(!resolved.is_resolved()),
            }
        }
    }

    #[test]
    fn test_exact_positions_resolve_to_their_segment(segments in segments()) {
        let doc = SourceMapDocument::parse(&builder_for(&segments).build_json()).unwrap();

        for segment in &segments {
            let query = PositionQuery::new(
                i64::from(segment.generated_line),
                i64::from(segment.generated_column),
            );
            let found = doc.segment_for(query).unwrap().unwrap();
            let first = expected_segment(&segments, segment.generated_line, segment.generated_column).unwrap();
            prop_assert_eq!(found, first);
        }
    }

    #[test]
    fn test_lookup_is_idempotent(segments in segments(), line in 1i64..40, column in 0i64..220) {
        let doc = SourceMapDocument::parse(&builder_for(&segments).build_json()).unwrap();
        let query = PositionQuery::new(line, column);
        prop_assert_eq!(
            doc.original_position_for(query).unwrap(),
            doc.original_position_for(query).unwrap()
        );
    }

    #[test]
    fn test_invalid_positions_are_errors(line in -50i64..1, column in -50i64..50) {
        let doc = SourceMapDocument::parse(r#"{"version":3,"sources":[],"mappings":""}"#).unwrap();
        prop_assert!(doc.original_position_for(PositionQuery::new(line, column)).is_err());
    }
}
