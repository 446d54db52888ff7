//! Included-collections resolution.

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::Resolver;
use crate::association::{AssociationDescriptor, AssociationEntry, AssociationMap, Condition};
use crate::error::{PresenterError, PresenterResult};
use crate::include::CollectionName;
use crate::presenter::Presenter;
use crate::record::{PreloadHint, RecordKey, RecordRef};

/// Resolved records per included collection, in request order.
pub type ResolvedCollections = IndexMap<CollectionName, Vec<RecordRef>>;

/// Resolves the collections a client asked to include.
///
/// Gating happens once, at construction: a requested name is kept only if
/// the presenter's association map declares it, the current user may list
/// its target model, and its condition (if any) holds. Names that fail any
/// of these are left out of the output without error.
pub struct IncludedCollectionsResolver<U> {
    whitelisted: AssociationMap<U>,
    preload_hint: PreloadHint,
    resolved: Option<ResolvedCollections>,
}

impl<U> IncludedCollectionsResolver<U> {
    /// Whitelist the presenter's requested names and preload their
    /// associations on the primary record set.
    ///
    /// Errors from the authorizer and unknown named conditions propagate.
    pub fn new(presenter: &mut Presenter<U>) -> PresenterResult<Self> {
        let whitelisted = whitelist(presenter)?;
        let preload_hint: PreloadHint = whitelisted
            .iter()
            .flat_map(|(_, entry)| entry.associations.top_level_keys())
            .collect();

        if !preload_hint.is_empty() {
            presenter.preload(&preload_hint);
        }

        Ok(Self {
            whitelisted,
            preload_hint,
            resolved: None,
        })
    }

    /// Names that passed gating, in request order.
    pub fn whitelisted_names(&self) -> impl Iterator<Item = &CollectionName> {
        self.whitelisted.iter().map(|(name, _)| name)
    }

    /// Associations requested from the primary record set at construction.
    pub fn preload_hint(&self) -> &PreloadHint {
        &self.preload_hint
    }

    /// Take the resolved collections; empty if `call` never ran.
    pub fn into_resolved(self) -> ResolvedCollections {
        self.resolved.unwrap_or_default()
    }
}

impl<U> Resolver<U> for IncludedCollectionsResolver<U> {
    type Output = ResolvedCollections;

    fn call(&mut self, presenter: &Presenter<U>) -> PresenterResult<&Self::Output> {
        let whitelisted = &self.whitelisted;
        let resolved = self.resolved.get_or_insert_with(|| {
            let records = presenter.relation().records();
            whitelisted
                .iter()
                .map(|(name, entry)| {
                    let mut collected = Vec::new();
                    collect(&records, &entry.associations, &mut collected);
                    let collected = dedup(collected);
                    trace!(collection = %name, records = collected.len(), "Resolved collection");
                    (name.clone(), collected)
                })
                .collect()
        });

        Ok(resolved)
    }

    fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

fn whitelist<U>(presenter: &Presenter<U>) -> PresenterResult<AssociationMap<U>> {
    let associations = presenter.definition().associations_map();
    let mut whitelisted = AssociationMap::new();

    for name in presenter.included_collection_names() {
        let Some(entry) = associations.get(name.as_str()) else {
            debug!(collection = %name, "Collection not declared, skipping");
            continue;
        };

        if !policy_permits(presenter, name, entry)? {
            debug!(collection = %name, "Collection not permitted, skipping");
            continue;
        }

        if !condition_permits(presenter, name, entry)? {
            debug!(collection = %name, "Collection condition failed, skipping");
            continue;
        }

        whitelisted.insert(name.clone(), entry.clone());
    }

    Ok(whitelisted)
}

fn policy_permits<U>(
    presenter: &Presenter<U>,
    name: &CollectionName,
    entry: &AssociationEntry<U>,
) -> PresenterResult<bool> {
    let model = match &entry.target_model {
        Some(model) => model.to_string(),
        None => name.target_model(),
    };

    presenter
        .authorizer()
        .policy_for_model(presenter.current_user(), &model)?
        .index()
}

fn condition_permits<U>(
    presenter: &Presenter<U>,
    name: &CollectionName,
    entry: &AssociationEntry<U>,
) -> PresenterResult<bool> {
    match &entry.condition {
        None => Ok(true),
        Some(Condition::Predicate(predicate)) => Ok(predicate(presenter)),
        Some(Condition::Named(condition)) => presenter
            .definition()
            .condition(condition, presenter)
            .ok_or_else(|| {
                warn!(collection = %name, condition = %condition, "Unknown collection condition");
                PresenterError::unknown_condition(name.as_str(), condition.as_str())
            }),
    }
}

/// Walk `descriptor` from `current`, appending every reached record.
fn collect(current: &[RecordRef], descriptor: &AssociationDescriptor, collected: &mut Vec<RecordRef>) {
    match descriptor {
        AssociationDescriptor::Key(key) => {
            for record in current {
                collected.extend(record.associated(key));
            }
        }
        AssociationDescriptor::Sequence(descriptors) => {
            for descriptor in descriptors {
                collect(current, descriptor, collected);
            }
        }
        AssociationDescriptor::Nested(key, inner) => {
            let next = dedup(current.iter().flat_map(|record| record.associated(key)).collect());
            trace!(association = %key, records = next.len(), "Descending into nested association");
            if !next.is_empty() {
                collect(&next, inner, collected);
            }
        }
    }
}

/// Drop repeated records, keeping first occurrences.
fn dedup(records: Vec<RecordRef>) -> Vec<RecordRef> {
    let mut seen: IndexMap<RecordKey, RecordRef> = IndexMap::with_capacity(records.len());
    for record in records {
        seen.entry(record.key()).or_insert(record);
    }
    seen.into_values().collect()
}
