#![no_main]

extern crate hilbert;

use libfuzzer_sys::fuzz_target;

use hilbert::Formula;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(f) = Formula::parse(s) {
            // Display output must parse back to the same formula.
            assert_eq!(Formula::parse( &f.to_string() ), Ok(f));
        }
    }}
);
