//! Fuzz target for presenter query string parsing.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_query_params
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use prax_presenter_core::{ParamKeys, PresenterParams, parse_include_params};

fuzz_target!(|data: &[u8]| {
    if let Ok(query) = std::str::from_utf8(data) {
        // Malformed flags are errors, never panics
        if let Ok(params) = PresenterParams::from_query(query, &ParamKeys::default()) {
            let _ = parse_include_params(params.include.as_ref());
        }
    }
});
