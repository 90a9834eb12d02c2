#![no_main]

use libfuzzer_sys::fuzz_target;
use sourcemap_resolver::{PositionQuery, SourceMapDocument};

fuzz_target!(|data: &[u8]| {
    if let Ok(json_str) = std::str::from_utf8(data) {
        if let Ok(document) = SourceMapDocument::parse(json_str) {
            for line in 0..4 {
                let _ = document.original_position_for(PositionQuery::new(line, 0));
            }
        }
    }
});
