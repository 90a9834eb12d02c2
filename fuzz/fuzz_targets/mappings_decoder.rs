#![no_main]

use libfuzzer_sys::fuzz_target;
use sourcemap_resolver::sourcemap::vlq;

fuzz_target!(|data: &[u8]| {
    if let Ok(mappings) = std::str::from_utf8(data) {
        let _ = vlq::decode_mappings(mappings, 16, 16);
    }
});
