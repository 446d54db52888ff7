//! Structured fuzzing for the include parameter parser.
//!
//! Generates delimited and list-shaped include parameters and checks that
//! parsing never panics and never yields duplicate names.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_include_parser
//! ```

#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use prax_presenter_core::{CollectionName, IncludeItem, IncludeParam, parse_include_params};

/// A generated list element.
#[derive(Debug, Arbitrary)]
enum FuzzItem {
    Text(String),
    Name(String),
}

/// A generated include parameter.
#[derive(Debug, Arbitrary)]
enum FuzzInclude {
    Delimited(String),
    Tokens(Vec<String>),
    List(Vec<FuzzItem>),
}

impl FuzzInclude {
    fn to_param(&self) -> IncludeParam {
        match self {
            Self::Delimited(text) => IncludeParam::from(text.as_str()),
            Self::Tokens(tokens) => IncludeParam::from(tokens.join(",")),
            Self::List(items) => IncludeParam::list(items.iter().map(|item| match item {
                FuzzItem::Text(text) => IncludeItem::Text(text.clone()),
                FuzzItem::Name(name) => IncludeItem::Name(CollectionName::from_canonical(name)),
            })),
        }
    }
}

fuzz_target!(|input: FuzzInclude| {
    let names = parse_include_params(Some(&input.to_param()));

    let mut seen = HashSet::new();
    for name in &names {
        assert!(seen.insert(name.as_str().to_string()), "duplicate name {name}");
    }

    // Canonical names survive a second pass unchanged
    let again = parse_include_params(Some(&IncludeParam::list(names.clone())));
    assert_eq!(again, names);
});
