//! Fuzz target for the presenter config parser.
//!
//! This target feeds arbitrary TOML strings to the config parser
//! to find crashes and panics.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use prax_presenter_core::PresenterConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // The parser should never panic, only return errors
        let _ = PresenterConfig::from_str(input);
    }
});
