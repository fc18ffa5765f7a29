#![no_main]

use libfuzzer_sys::fuzz_target;
use trellis::domain::services::grammar;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let _ = grammar::parse(name, false);
        let _ = grammar::parse(name, true);
        let _ = grammar::parse_flat_resolver(name);
    }
});
