//! Association maps: how a presenter turns collection names into records.
//!
//! Each presenter declares, per collection name a client may include, which
//! associations of the primary records produce that collection and under
//! which condition the collection may be included at all.
//!
//! ## Example
//!
//! ```rust
//! use prax_presenter_core::{AssociationDescriptor, AssociationEntry, AssociationMap};
//!
//! struct User;
//!
//! let map: AssociationMap<User> = AssociationMap::new()
//!     .with(
//!         "categories",
//!         AssociationEntry::new(AssociationDescriptor::nested("sub_category", "category")),
//!     )
//!     .with("sub_categories", AssociationEntry::new("sub_category"))
//!     .with(
//!         "users",
//!         AssociationEntry::new(AssociationDescriptor::sequence(["creator", "publisher"]))
//!             .when_named("admin"),
//!     );
//!
//! assert_eq!(map.len(), 3);
//! assert!(map.contains("users"));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::include::CollectionName;
use crate::presenter::Presenter;

/// Name of an association on a record (e.g. `sub_category`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssociationKey(SmolStr);

impl AssociationKey {
    /// Create an association key.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(SmolStr::new(key))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssociationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AssociationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AssociationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssociationKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for AssociationKey {
    fn from(key: String) -> Self {
        Self(SmolStr::from(key))
    }
}

impl From<&AssociationKey> for AssociationKey {
    fn from(key: &AssociationKey) -> Self {
        key.clone()
    }
}

/// How to reach the records of one collection from a set of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssociationDescriptor {
    /// Follow a single association.
    Key(AssociationKey),
    /// Follow each descriptor from the same starting records.
    Sequence(Vec<AssociationDescriptor>),
    /// Follow an association, then apply the inner descriptor to the records
    /// reached.
    Nested(AssociationKey, Box<AssociationDescriptor>),
}

impl AssociationDescriptor {
    /// Follow a single association.
    pub fn key(key: impl Into<AssociationKey>) -> Self {
        Self::Key(key.into())
    }

    /// Follow several descriptors from the same starting records.
    pub fn sequence<I, D>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<AssociationDescriptor>,
    {
        Self::Sequence(descriptors.into_iter().map(Into::into).collect())
    }

    /// Follow `key`, then `inner` from the records it reaches.
    pub fn nested(key: impl Into<AssociationKey>, inner: impl Into<AssociationDescriptor>) -> Self {
        Self::Nested(key.into(), Box::new(inner.into()))
    }

    /// Outermost association keys, sequences flattened.
    ///
    /// These are the keys a record set is asked to preload.
    pub fn top_level_keys(&self) -> Vec<&AssociationKey> {
        let mut keys = Vec::new();
        self.collect_top_level_keys(&mut keys);
        keys
    }

    fn collect_top_level_keys<'a>(&'a self, keys: &mut Vec<&'a AssociationKey>) {
        match self {
            Self::Key(key) | Self::Nested(key, _) => keys.push(key),
            Self::Sequence(descriptors) => {
                for descriptor in descriptors {
                    descriptor.collect_top_level_keys(keys);
                }
            }
        }
    }
}

impl From<&str> for AssociationDescriptor {
    fn from(key: &str) -> Self {
        Self::Key(key.into())
    }
}

impl From<AssociationKey> for AssociationDescriptor {
    fn from(key: AssociationKey) -> Self {
        Self::Key(key)
    }
}

impl<D: Into<AssociationDescriptor>> From<Vec<D>> for AssociationDescriptor {
    fn from(descriptors: Vec<D>) -> Self {
        Self::sequence(descriptors)
    }
}

/// Predicate evaluated against the presenter.
pub type ConditionFn<U> = Arc<dyn Fn(&Presenter<U>) -> bool + Send + Sync>;

/// Gate on whether a collection may be included.
pub enum Condition<U> {
    /// A predicate evaluated with the presenter (current user, params).
    Predicate(ConditionFn<U>),
    /// A predicate defined by the presenter definition under this name.
    Named(SmolStr),
}

impl<U> Condition<U> {
    /// Create a predicate condition.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Presenter<U>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Create a named condition.
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::Named(SmolStr::new(name))
    }
}

impl<U> Clone for Condition<U> {
    fn clone(&self) -> Self {
        match self {
            Self::Predicate(f) => Self::Predicate(Arc::clone(f)),
            Self::Named(name) => Self::Named(name.clone()),
        }
    }
}

impl<U> fmt::Debug for Condition<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Condition::Predicate(..)"),
            Self::Named(name) => f.debug_tuple("Condition::Named").field(name).finish(),
        }
    }
}

/// Definition of one includable collection.
pub struct AssociationEntry<U> {
    /// Associations producing the collection.
    pub associations: AssociationDescriptor,
    /// Optional gate; absent means always permitted.
    pub condition: Option<Condition<U>>,
    /// Model checked for list permission; derived from the collection name
    /// when absent.
    pub target_model: Option<SmolStr>,
}

impl<U> AssociationEntry<U> {
    /// Create an entry with no condition.
    pub fn new(associations: impl Into<AssociationDescriptor>) -> Self {
        Self {
            associations: associations.into(),
            condition: None,
            target_model: None,
        }
    }

    /// Gate the entry on a predicate.
    pub fn when<F>(mut self, f: F) -> Self
    where
        F: Fn(&Presenter<U>) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Condition::predicate(f));
        self
    }

    /// Gate the entry on a predicate defined by the presenter.
    pub fn when_named(mut self, name: impl AsRef<str>) -> Self {
        self.condition = Some(Condition::named(name));
        self
    }

    /// Check list permission against this model instead of the classified
    /// collection name (for irregular plurals or aliased collections).
    pub fn target_model(mut self, model: impl AsRef<str>) -> Self {
        self.target_model = Some(SmolStr::new(model));
        self
    }
}

impl<U> Clone for AssociationEntry<U> {
    fn clone(&self) -> Self {
        Self {
            associations: self.associations.clone(),
            condition: self.condition.clone(),
            target_model: self.target_model.clone(),
        }
    }
}

impl<U> fmt::Debug for AssociationEntry<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssociationEntry")
            .field("associations", &self.associations)
            .field("condition", &self.condition)
            .field("target_model", &self.target_model)
            .finish()
    }
}

/// Collections a presenter can include, in declaration order.
///
/// Names absent from the map are never resolvable, whatever the client asks.
pub struct AssociationMap<U> {
    entries: IndexMap<CollectionName, AssociationEntry<U>>,
}

impl<U> AssociationMap<U> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert an entry.
    pub fn insert(&mut self, name: impl Into<CollectionName>, entry: AssociationEntry<U>) -> &mut Self {
        self.entries.insert(name.into(), entry);
        self
    }

    /// Insert an entry, builder style.
    pub fn with(mut self, name: impl Into<CollectionName>, entry: AssociationEntry<U>) -> Self {
        self.insert(name, entry);
        self
    }

    /// Get the entry for a collection.
    pub fn get(&self, name: &str) -> Option<&AssociationEntry<U>> {
        self.entries.get(name)
    }

    /// Check if a collection is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&CollectionName, &AssociationEntry<U>)> {
        self.entries.iter()
    }

    /// Number of declared collections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no collection is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<U> Default for AssociationMap<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> Clone for AssociationMap<U> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<U> fmt::Debug for AssociationMap<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<U, N: Into<CollectionName>> FromIterator<(N, AssociationEntry<U>)> for AssociationMap<U> {
    fn from_iter<T: IntoIterator<Item = (N, AssociationEntry<U>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(name, entry)| (name.into(), entry)).collect(),
        }
    }
}
