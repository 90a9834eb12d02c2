use proptest::prelude::*;
use sourcemap_fixtures::MapBuilder;
use sourcemap_resolver::MappingSegment;

pub const SOURCES: usize = 3;
pub const NAMES: usize = 3;

type RawSegment = (u32, u32, Option<(u32, u32, u32, Option<u32>)>);

/// Segments in file order: generated lines never decrease, columns within a
/// line are arbitrary and may repeat.
pub fn segments() -> impl Strategy<Value = Vec<MappingSegment>> {
    let raw = (
        0u32..3,
        0u32..200,
        prop::option::weighted(
            0.85,
            (
                0u32..SOURCES as u32,
                1u32..500,
                0u32..200,
                prop::option::of(0u32..NAMES as u32),
            ),
        ),
    );

    prop::collection::vec(raw, 0..60).prop_map(|raw: Vec<RawSegment>| {
        let mut line = 1;
        raw.into_iter()
            .map(|(line_step, column, original)| {
                line += line_step;
                MappingSegment {
                    generated_line: line,
                    generated_column: column,
                    source_index: original.map(|o| o.0),
                    original_line: original.map(|o| o.1),
                    original_column: original.map(|o| o.2),
                    name_index: original.and_then(|o| o.3),
                }
            })
            .collect()
    })
}

/// A fixture builder holding exactly these segments.
pub fn builder_for(segments: &[MappingSegment]) -> MapBuilder {
    let mut builder = MapBuilder::new();
    for i in 0..SOURCES {
        builder = builder.source(&format!("src/s{}.js", i), None);
    }
    for i in 0..NAMES {
        builder = builder.name(&format!("n{}", i));
    }
    for s in segments {
        let generated = (s.generated_line, s.generated_column);
        builder = match (s.source_index, s.original_line, s.original_column, s.name_index) {
            (Some(src), Some(line), Some(col), Some(name)) => {
                builder.map_named(generated, (src, line, col), name)
            }
            (Some(src), Some(line), Some(col), None) => builder.map(generated, (src, line, col)),
            _ => builder.unmapped(generated),
        };
    }
    builder
}
