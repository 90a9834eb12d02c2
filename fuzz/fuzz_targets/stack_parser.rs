#![no_main]

use libfuzzer_sys::fuzz_target;
use sourcemap_resolver::stacktrace;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for frame in stacktrace::parse_stack(text) {
            let _ = frame.query();
        }
    }
});
