//! Parsing of the `include` request parameter.
//!
//! Clients ask for related collections with a comma-delimited string
//! (`?include=categories,subCategories`) or a repeated parameter
//! (`?include[]=categories&include[]=users`). Both normalize to a list of
//! [`CollectionName`]s: blanks dropped, camelCase underscored, duplicates
//! removed with the first occurrence winning.
//!
//! ```rust
//! use prax_presenter_core::{IncludeParam, parse_include_params};
//!
//! let raw = IncludeParam::from("categories,subCategories,posts,posts, ,posts");
//! let names = parse_include_params(Some(&raw));
//!
//! let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
//! assert_eq!(names, ["categories", "sub_categories", "posts"]);
//! ```

use std::borrow::Borrow;
use std::fmt;

use convert_case::{Boundary, Case, Casing, Converter};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Word boundaries recognized inside one underscore-separated segment of a
/// requested name: `subCategories`, `HTMLPages`, `post2Tags`.
const SEGMENT_BOUNDARIES: [Boundary; 3] = [Boundary::LowerUpper, Boundary::DigitUpper, Boundary::Acronym];

/// Words whose plural and singular are the same.
const UNCOUNTABLE: [&str; 8] = [
    "series",
    "species",
    "news",
    "equipment",
    "information",
    "money",
    "sheep",
    "fish",
];

/// Plural words that do not follow the suffix rules.
const IRREGULAR_SINGULARS: [(&str, &str); 5] = [
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
];

/// Canonical name of an includable collection (e.g. `sub_categories`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(SmolStr);

impl CollectionName {
    /// Use a name that is already canonical, without conversion.
    pub fn from_canonical(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name))
    }

    /// Underscore a client-supplied name (`subCategories` → `sub_categories`).
    ///
    /// Existing underscores are kept as they are, including leading,
    /// trailing and repeated ones; hyphens become underscores.
    pub fn underscore(name: &str) -> Self {
        let converter = Converter::new()
            .set_boundaries(&SEGMENT_BOUNDARIES)
            .to_case(Case::Snake);

        let converted = name
            .replace('-', "_")
            .split('_')
            .map(|segment| converter.convert(segment))
            .collect::<Vec<_>>()
            .join("_");
        Self(SmolStr::from(converted))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the name is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Model whose list permission gates this collection
    /// (`sub_categories` → `SubCategory`).
    pub fn target_model(&self) -> String {
        let singular = match self.0.rsplit_once('_') {
            Some((head, last)) => format!("{head}_{}", singularize(last)),
            None => singularize(&self.0),
        };
        singular.to_case(Case::Pascal)
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CollectionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CollectionName {
    fn from(name: &str) -> Self {
        Self::from_canonical(name)
    }
}

impl From<String> for CollectionName {
    fn from(name: String) -> Self {
        Self(SmolStr::from(name))
    }
}

impl PartialEq<str> for CollectionName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CollectionName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Singularize one lowercase word with the common English rules.
fn singularize(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }

    if let Some((_, singular)) = IRREGULAR_SINGULARS.iter().find(|(plural, _)| *plural == word) {
        return (*singular).to_string();
    }

    if let Some(stem) = word.strip_suffix("movies") {
        format!("{stem}movie")
    } else if let Some(stem) = word.strip_suffix("quizzes") {
        format!("{stem}quiz")
    } else if word.ends_with("aliases") || word.ends_with("statuses") || word.ends_with("buses") {
        word[..word.len() - 2].to_string()
    } else if let Some(stem) = word.strip_suffix("ies").filter(|stem| !stem.is_empty()) {
        format!("{stem}y")
    } else if word.ends_with("sses")
        || word.ends_with("ches")
        || word.ends_with("shes")
        || word.ends_with("xes")
        || word.ends_with("zes")
    {
        word[..word.len() - 2].to_string()
    } else if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        word.to_string()
    } else if let Some(stem) = word.strip_suffix('s').filter(|stem| !stem.is_empty()) {
        stem.to_string()
    } else {
        word.to_string()
    }
}

/// One element of a list-shaped include parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum IncludeItem {
    /// Client text; underscored during parsing.
    Text(String),
    /// An already canonical name; kept as-is.
    Name(CollectionName),
}

impl From<String> for IncludeItem {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for IncludeItem {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<CollectionName> for IncludeItem {
    fn from(name: CollectionName) -> Self {
        Self::Name(name)
    }
}

/// Raw value of the include parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IncludeParam {
    /// Comma-delimited names.
    Delimited(String),
    /// Names given individually; elements are not split again.
    List(Vec<IncludeItem>),
}

impl IncludeParam {
    /// Build a list parameter.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<IncludeItem>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Check whether the parameter carries no text at all.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Delimited(text) => text.trim().is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Parse into collection names.
    pub fn parse(&self) -> Vec<CollectionName> {
        parse_include_params(Some(self))
    }
}

impl From<&str> for IncludeParam {
    fn from(text: &str) -> Self {
        Self::Delimited(text.to_string())
    }
}

impl From<String> for IncludeParam {
    fn from(text: String) -> Self {
        Self::Delimited(text)
    }
}

impl<T: Into<IncludeItem>> From<Vec<T>> for IncludeParam {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

/// Normalize a raw include parameter into collection names.
///
/// Absent or blank input yields an empty list. Delimited text is split on
/// commas; list elements are taken as given. Elements that are blank after
/// trimming are dropped, text is underscored, canonical names are kept, and
/// duplicates are removed keeping the first occurrence.
pub fn parse_include_params(raw: Option<&IncludeParam>) -> Vec<CollectionName> {
    let Some(raw) = raw.filter(|raw| !raw.is_blank()) else {
        return Vec::new();
    };

    let mut names: IndexSet<CollectionName> = IndexSet::new();
    match raw {
        IncludeParam::Delimited(text) => {
            for token in text.split(',') {
                push_text(&mut names, token);
            }
        }
        IncludeParam::List(items) => {
            for item in items {
                match item {
                    IncludeItem::Text(token) => push_text(&mut names, token),
                    IncludeItem::Name(name) if !name.is_blank() => {
                        names.insert(name.clone());
                    }
                    IncludeItem::Name(_) => {}
                }
            }
        }
    }

    names.into_iter().collect()
}

fn push_text(names: &mut IndexSet<CollectionName>, token: &str) {
    let token = token.trim();
    if !token.is_empty() {
        names.insert(CollectionName::underscore(token));
    }
}
