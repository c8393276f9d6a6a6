#![no_main]

use libfuzzer_sys::fuzz_target;
use memfuse_core::RoutingResult;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Must never panic, only accept or reject.
        let _ = RoutingResult::from_json(text);
    }
});
