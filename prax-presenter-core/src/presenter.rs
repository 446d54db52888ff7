//! The presenter: counts, included collections and policies for one request.
//!
//! A [`Presenter`] wraps the primary record set of a controller action and,
//! depending on the request parameters, either reduces the response to a
//! total count or resolves the requested related collections and the
//! current user's policies. It does not render anything; a downstream
//! serializer reads [`Presenter::collection`], [`Presenter::total_count`],
//! [`Presenter::included_collections`] and [`Presenter::policies`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use prax_presenter_core::prelude::*;
//!
//! #[derive(Debug)]
//! struct Post {
//!     id: i64,
//! }
//!
//! impl Record for Post {
//!     fn model_name(&self) -> &'static str {
//!         "Post"
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
//! struct User;
//!
//! let posts: RecordList = vec![Arc::new(Post { id: 1 }) as RecordRef].into_iter().collect();
//! let authorizer: Arc<dyn Authorizer<User>> = Arc::new(PolicyRegistry::new());
//!
//! let presenter = Presenter::new(posts, authorizer)
//!     .with_params(PresenterParams::new().count(true))
//!     .present()
//!     .unwrap();
//!
//! assert!(presenter.collection().is_empty());
//! assert_eq!(presenter.total_count(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::debug;

use crate::association::AssociationMap;
use crate::error::PresenterResult;
use crate::include::{CollectionName, parse_include_params};
use crate::params::PresenterParams;
use crate::policy::Authorizer;
use crate::record::{PreloadHint, RecordRef, RecordSet};
use crate::resolvers::{
    IncludedCollectionsResolver, PoliciesResolver, PolicyRecord, ResolvedCollections, Resolver,
};

/// Per-model presenter configuration.
///
/// Every method has a default, so a model that needs nothing special can use
/// [`BasePresenter`].
pub trait PresenterDefinition<U>: Send + Sync {
    /// Collections clients may include.
    fn associations_map(&self) -> AssociationMap<U> {
        AssociationMap::new()
    }

    /// Policy checks resolved for every primary record.
    fn policy_methods(&self) -> Vec<SmolStr> {
        Vec::new()
    }

    /// Associations to preload before policies are evaluated.
    fn policy_associations(&self) -> PreloadHint {
        PreloadHint::new()
    }

    /// Evaluate a named collection condition; `None` if the name is unknown.
    fn condition(&self, _name: &str, _presenter: &Presenter<U>) -> Option<bool> {
        None
    }
}

/// The generic presenter definition: no collections, no policies.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasePresenter;

impl<U> PresenterDefinition<U> for BasePresenter {}

/// Lifecycle of a presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenterStatus {
    /// Constructed, nothing resolved yet.
    #[default]
    Uninitialized,
    /// Resolution ran; results are final.
    Resolved,
}

/// Presents one primary record set for one request.
pub struct Presenter<U> {
    current_user: Option<U>,
    relation: Box<dyn RecordSet>,
    params: PresenterParams,
    definition: Arc<dyn PresenterDefinition<U>>,
    authorizer: Arc<dyn Authorizer<U>>,
    included_collection_names: Vec<CollectionName>,
    included_collections: ResolvedCollections,
    policies: Vec<PolicyRecord>,
    status: PresenterStatus,
}

impl<U> Presenter<U> {
    /// Create a presenter over a record set, with the generic definition,
    /// no current user and empty parameters.
    pub fn new<S>(relation: S, authorizer: Arc<dyn Authorizer<U>>) -> Self
    where
        S: RecordSet + 'static,
    {
        Self::from_boxed(Box::new(relation), authorizer)
    }

    /// Create a presenter over an already boxed record set.
    pub fn from_boxed(relation: Box<dyn RecordSet>, authorizer: Arc<dyn Authorizer<U>>) -> Self {
        Self {
            current_user: None,
            relation,
            params: PresenterParams::default(),
            definition: Arc::new(BasePresenter),
            authorizer,
            included_collection_names: Vec::new(),
            included_collections: ResolvedCollections::new(),
            policies: Vec::new(),
            status: PresenterStatus::Uninitialized,
        }
    }

    /// Set the model-specific definition.
    pub fn with_definition(mut self, definition: Arc<dyn PresenterDefinition<U>>) -> Self {
        self.definition = definition;
        self
    }

    /// Set the current user.
    pub fn with_current_user(mut self, current_user: Option<U>) -> Self {
        self.current_user = current_user;
        self
    }

    /// Set the request parameters.
    pub fn with_params(mut self, params: PresenterParams) -> Self {
        self.included_collection_names = parse_include_params(params.include.as_ref());
        self.params = params;
        self
    }

    /// Run resolution and return the presenter.
    pub fn present(mut self) -> PresenterResult<Self> {
        self.call()?;
        Ok(self)
    }

    /// Resolve counts, included collections and policies.
    ///
    /// Runs once; calling a resolved presenter again changes nothing.
    pub fn call(&mut self) -> PresenterResult<&mut Self> {
        if self.is_resolved() {
            return Ok(self);
        }

        if self.is_count_only() {
            debug!(model = ?self.relation.model_name(), "Count only, skipping resolvers");
            self.status = PresenterStatus::Resolved;
            return Ok(self);
        }

        // The fallible resolver is built first so a failed call leaves no
        // preload behind and a retry starts from the same record set.
        let included_collections_resolver = if self.resolve_included_collections() {
            Some(IncludedCollectionsResolver::new(self)?)
        } else {
            None
        };

        let policies_resolver = if self.resolve_policies() {
            Some(PoliciesResolver::new(self))
        } else {
            None
        };

        if let Some(mut resolver) = policies_resolver {
            Resolver::<U>::call(&mut resolver, self)?;
            self.policies = resolver.into_policies();
        }

        if let Some(mut resolver) = included_collections_resolver {
            resolver.call(self)?;
            self.included_collections = resolver.into_resolved();
        }

        self.status = PresenterStatus::Resolved;
        Ok(self)
    }

    /// Primary records; empty when only a count was requested.
    pub fn collection(&self) -> Vec<RecordRef> {
        if self.is_count_only() {
            Vec::new()
        } else {
            self.relation.records()
        }
    }

    /// Total number of primary records.
    ///
    /// Uses the pagination total when the record set carries one.
    pub fn total_count(&self) -> u64 {
        self.relation
            .as_pageable()
            .map(|pageable| pageable.total_count())
            .unwrap_or_else(|| self.relation.count())
    }

    /// Parsed include parameter.
    pub fn included_collection_names(&self) -> &[CollectionName] {
        &self.included_collection_names
    }

    /// Included collections by name; empty when none were resolved.
    pub fn included_collections(&self) -> &ResolvedCollections {
        &self.included_collections
    }

    /// Policy records of the primary records; empty when none were resolved.
    pub fn policies(&self) -> &[PolicyRecord] {
        &self.policies
    }

    /// Ask the primary record set to preload associations.
    ///
    /// Returns `false` when the record set cannot preload (e.g. a
    /// pre-materialized list), in which case nothing happens.
    pub fn preload(&mut self, hint: &PreloadHint) -> bool {
        if hint.is_empty() {
            return false;
        }

        match self.relation.as_preloadable() {
            Some(preloadable) => {
                debug!(keys = ?hint.keys().collect::<Vec<_>>(), "Preloading associations");
                preloadable.preload(hint);
                true
            }
            None => false,
        }
    }

    /// The current user, if any.
    pub fn current_user(&self) -> Option<&U> {
        self.current_user.as_ref()
    }

    /// The request parameters.
    pub fn params(&self) -> &PresenterParams {
        &self.params
    }

    /// The primary record set.
    pub fn relation(&self) -> &dyn RecordSet {
        self.relation.as_ref()
    }

    /// The model-specific definition.
    pub fn definition(&self) -> &dyn PresenterDefinition<U> {
        self.definition.as_ref()
    }

    /// The authorization oracle.
    pub fn authorizer(&self) -> &dyn Authorizer<U> {
        self.authorizer.as_ref()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> PresenterStatus {
        self.status
    }

    /// Whether resolution already ran.
    pub fn is_resolved(&self) -> bool {
        self.status == PresenterStatus::Resolved
    }

    /// Whether only a count was requested.
    pub fn is_count_only(&self) -> bool {
        self.params.count
    }

    fn resolve_policies(&self) -> bool {
        self.current_user.is_some() && self.params.policies
    }

    fn resolve_included_collections(&self) -> bool {
        !self.included_collection_names.is_empty()
    }
}

impl<U> fmt::Debug for Presenter<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("model", &self.relation.model_name())
            .field("params", &self.params)
            .field("has_current_user", &self.current_user.is_some())
            .field("status", &self.status)
            .field("included_collections", &self.included_collections.keys().collect::<Vec<_>>())
            .field("policies", &self.policies.len())
            .finish()
    }
}
