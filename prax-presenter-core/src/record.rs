//! Records and primary record sets.
//!
//! A presenter never inspects record fields. It only follows named
//! associations and reads identifiers, so a [`Record`] exposes exactly that.
//! The primary [`RecordSet`] is the queried collection handed over by the
//! controller; it may be a lazily loaded query that supports bulk preloading
//! and carries a pagination total, or a plain pre-materialized [`RecordList`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use prax_presenter_core::{Associated, AssociationKey, Record, RecordId, RecordList, RecordSet};
//!
//! #[derive(Debug)]
//! struct Tag {
//!     id: i64,
//! }
//!
//! impl Record for Tag {
//!     fn model_name(&self) -> &'static str {
//!         "Tag"
//!     }
//!
//!     fn id(&self) -> RecordId {
//!         self.id.into()
//!     }
//!
//!     fn associated(&self, _key: &AssociationKey) -> Associated {
//!         Associated::None
//!     }
//! }
//!
//! let list = RecordList::single(Arc::new(Tag { id: 7 }));
//! assert_eq!(list.model_name(), Some("Tag"));
//! assert_eq!(list.count(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use uuid::Uuid;

use crate::association::AssociationKey;

/// Identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer primary key.
    Int(i64),
    /// UUID primary key.
    Uuid(Uuid),
    /// Any other textual key.
    String(SmolStr),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Uuid(id) => write!(f, "{id}"),
            Self::String(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::String(SmolStr::new(id))
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::String(SmolStr::from(id))
    }
}

/// Identity used to deduplicate records reached through different paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// Base model of the record.
    pub model: &'static str,
    /// Identifier of the record.
    pub id: RecordId,
}

/// A record that can be presented.
pub trait Record: fmt::Debug + Send + Sync {
    /// Name of the record's model (e.g. `"Post"`).
    fn model_name(&self) -> &'static str;

    /// Name of the model at the root of the record's model hierarchy.
    ///
    /// Presenter lookup falls back to this name and policy records derive
    /// their identifier key from it.
    fn base_model_name(&self) -> &'static str {
        self.model_name()
    }

    /// The record's identifier.
    fn id(&self) -> RecordId;

    /// Follow an association. Unknown keys yield [`Associated::None`].
    fn associated(&self, key: &AssociationKey) -> Associated;

    /// Identity of this record for deduplication.
    fn key(&self) -> RecordKey {
        RecordKey {
            model: self.base_model_name(),
            id: self.id(),
        }
    }
}

/// Shared handle to a record.
pub type RecordRef = Arc<dyn Record>;

/// Records reachable through one association of one record.
#[derive(Debug, Clone, Default)]
pub enum Associated {
    /// Nothing is associated (a missing belongs-to, an unknown key).
    #[default]
    None,
    /// A single associated record.
    One(RecordRef),
    /// Any number of associated records.
    Many(Vec<RecordRef>),
}

impl Associated {
    /// Build from an optional single record.
    pub fn optional(record: Option<RecordRef>) -> Self {
        record.map_or(Self::None, Self::One)
    }

    /// Check whether nothing is reachable.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::One(_) => false,
            Self::Many(records) => records.is_empty(),
        }
    }
}

impl IntoIterator for Associated {
    type Item = RecordRef;
    type IntoIter = std::vec::IntoIter<RecordRef>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Self::None => Vec::new().into_iter(),
            Self::One(record) => vec![record].into_iter(),
            Self::Many(records) => records.into_iter(),
        }
    }
}

impl From<RecordRef> for Associated {
    fn from(record: RecordRef) -> Self {
        Self::One(record)
    }
}

impl From<Option<RecordRef>> for Associated {
    fn from(record: Option<RecordRef>) -> Self {
        Self::optional(record)
    }
}

impl From<Vec<RecordRef>> for Associated {
    fn from(records: Vec<RecordRef>) -> Self {
        Self::Many(records)
    }
}

/// Ordered, deduplicated set of associations to bulk-load with a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadHint {
    keys: indexmap::IndexSet<AssociationKey>,
}

impl PreloadHint {
    /// Create an empty hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an association key.
    pub fn add(&mut self, key: impl Into<AssociationKey>) -> &mut Self {
        self.keys.insert(key.into());
        self
    }

    /// Add an association key, builder style.
    pub fn with(mut self, key: impl Into<AssociationKey>) -> Self {
        self.add(key);
        self
    }

    /// Merge another hint into this one.
    pub fn merge(&mut self, other: &PreloadHint) -> &mut Self {
        self.keys.extend(other.keys.iter().cloned());
        self
    }

    /// Hinted keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &AssociationKey> {
        self.keys.iter()
    }

    /// Check if a key is hinted.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Number of hinted keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if nothing is hinted.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Into<AssociationKey>> FromIterator<K> for PreloadHint {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A record set that knows its total size beyond the current page.
pub trait Pageable {
    /// Total number of records across all pages.
    fn total_count(&self) -> u64;
}

/// A record set that can bulk-load associations ahead of traversal.
pub trait Preload {
    /// Extend the record set so that the hinted associations are loaded
    /// together with the records.
    fn preload(&mut self, hint: &PreloadHint);
}

/// The primary record set being presented.
pub trait RecordSet: Send + Sync {
    /// Declared model of the set, if known.
    fn model_name(&self) -> Option<&'static str>;

    /// Base model of the set; defaults to the declared model.
    fn base_model_name(&self) -> Option<&'static str> {
        self.model_name()
    }

    /// Materialize the records, in iteration order.
    fn records(&self) -> Vec<RecordRef>;

    /// Count the records.
    fn count(&self) -> u64 {
        self.records().len() as u64
    }

    /// Pagination capability.
    fn as_pageable(&self) -> Option<&dyn Pageable> {
        None
    }

    /// Bulk preload capability.
    fn as_preloadable(&mut self) -> Option<&mut dyn Preload> {
        None
    }
}

impl fmt::Debug for dyn RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSet")
            .field("model", &self.model_name())
            .finish_non_exhaustive()
    }
}

/// A pre-materialized list of records.
///
/// Lists are never preloadable: their records are already loaded.
#[derive(Debug, Clone, Default)]
pub struct RecordList {
    model: Option<&'static str>,
    base_model: Option<&'static str>,
    records: Vec<RecordRef>,
}

impl RecordList {
    /// Create a list; the model is taken from the first record.
    pub fn new(records: Vec<RecordRef>) -> Self {
        let model = records.first().map(|r| r.model_name());
        let base_model = records.first().map(|r| r.base_model_name());
        Self {
            model,
            base_model,
            records,
        }
    }

    /// Wrap a single record.
    pub fn single(record: RecordRef) -> Self {
        Self::new(vec![record])
    }

    /// Create a list with an explicitly declared model, which keeps the model
    /// known even when the list is empty.
    pub fn of_model(model: &'static str, records: Vec<RecordRef>) -> Self {
        Self {
            model: Some(model),
            base_model: Some(model),
            records,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<RecordRef> for RecordList {
    fn from_iter<T: IntoIterator<Item = RecordRef>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<RecordRef> for RecordList {
    fn from(record: RecordRef) -> Self {
        Self::single(record)
    }
}

impl RecordSet for RecordList {
    fn model_name(&self) -> Option<&'static str> {
        self.model
    }

    fn base_model_name(&self) -> Option<&'static str> {
        self.base_model
    }

    fn records(&self) -> Vec<RecordRef> {
        self.records.clone()
    }

    fn count(&self) -> u64 {
        self.records.len() as u64
    }
}

/// A record set decorated with a pre-computed pagination total.
#[derive(Debug, Clone)]
pub struct Paginated<S> {
    inner: S,
    total_count: u64,
}

impl<S: RecordSet> Paginated<S> {
    /// Wrap a page of records together with the total across all pages.
    pub fn new(inner: S, total_count: u64) -> Self {
        Self { inner, total_count }
    }

    /// Get the wrapped record set.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the record set.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RecordSet> Pageable for Paginated<S> {
    fn total_count(&self) -> u64 {
        self.total_count
    }
}

impl<S: RecordSet> RecordSet for Paginated<S> {
    fn model_name(&self) -> Option<&'static str> {
        self.inner.model_name()
    }

    fn base_model_name(&self) -> Option<&'static str> {
        self.inner.base_model_name()
    }

    fn records(&self) -> Vec<RecordRef> {
        self.inner.records()
    }

    fn count(&self) -> u64 {
        self.inner.count()
    }

    fn as_pageable(&self) -> Option<&dyn Pageable> {
        Some(self)
    }

    fn as_preloadable(&mut self) -> Option<&mut dyn Preload> {
        self.inner.as_preloadable()
    }
}
