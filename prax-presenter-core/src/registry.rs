//! Presenter selection by model.
//!
//! Each model may register its own [`PresenterDefinition`]. When a record set
//! is presented, the definition is looked up along a fixed chain:
//!
//! 1. the record set's model (`FeaturedPost`)
//! 2. its base model (`Post`)
//! 3. the application default, if one is set
//! 4. [`BasePresenter`]
//!
//! ```rust
//! use std::sync::Arc;
//! use prax_presenter_core::prelude::*;
//!
//! struct User;
//! struct PostPresenter;
//!
//! impl PresenterDefinition<User> for PostPresenter {}
//!
//! let authorizer: Arc<dyn Authorizer<User>> = Arc::new(PolicyRegistry::new());
//! let registry = PresenterRegistry::new(authorizer).with("Post", PostPresenter);
//!
//! assert!(registry.has_presenter("Post"));
//! assert!(!registry.has_presenter("Comment"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::PresenterResult;
use crate::params::PresenterParams;
use crate::policy::Authorizer;
use crate::presenter::{BasePresenter, Presenter, PresenterDefinition};
use crate::record::{RecordList, RecordRef, RecordSet};

/// Shared presenter definition.
pub type SharedDefinition<U> = Arc<dyn PresenterDefinition<U>>;

/// Maps model names to presenter definitions and builds presenters.
pub struct PresenterRegistry<U> {
    authorizer: Arc<dyn Authorizer<U>>,
    definitions: HashMap<String, SharedDefinition<U>>,
    application_default: Option<SharedDefinition<U>>,
    base: SharedDefinition<U>,
}

impl<U> PresenterRegistry<U> {
    /// Create a registry with no model-specific presenters.
    pub fn new(authorizer: Arc<dyn Authorizer<U>>) -> Self {
        Self {
            authorizer,
            definitions: HashMap::new(),
            application_default: None,
            base: Arc::new(BasePresenter),
        }
    }

    /// Register the presenter of a model.
    pub fn register<D>(&mut self, model: impl Into<String>, definition: D) -> &mut Self
    where
        D: PresenterDefinition<U> + 'static,
    {
        self.register_shared(model, Arc::new(definition))
    }

    /// Register an already shared presenter definition.
    pub fn register_shared(&mut self, model: impl Into<String>, definition: SharedDefinition<U>) -> &mut Self {
        let model = model.into();
        debug!(model = %model, "Registered presenter");
        self.definitions.insert(model, definition);
        self
    }

    /// Register the presenter of a model, builder style.
    pub fn with<D>(mut self, model: impl Into<String>, definition: D) -> Self
    where
        D: PresenterDefinition<U> + 'static,
    {
        self.register(model, definition);
        self
    }

    /// Use `definition` for models without a presenter of their own.
    pub fn with_default<D>(mut self, definition: D) -> Self
    where
        D: PresenterDefinition<U> + 'static,
    {
        self.application_default = Some(Arc::new(definition));
        self
    }

    /// Check if a model has its own presenter.
    pub fn has_presenter(&self, model: &str) -> bool {
        self.definitions.contains_key(model)
    }

    /// The authorizer handed to every presenter.
    pub fn authorizer(&self) -> &Arc<dyn Authorizer<U>> {
        &self.authorizer
    }

    /// Select the definition for a model and its base model.
    pub fn definition_for(&self, model: Option<&str>, base_model: Option<&str>) -> SharedDefinition<U> {
        let selected = [model, base_model]
            .into_iter()
            .flatten()
            .find_map(|name| self.definitions.get(name))
            .or(self.application_default.as_ref())
            .unwrap_or(&self.base);

        Arc::clone(selected)
    }

    /// Build a presenter for a record set without resolving it.
    pub fn presenter<S>(&self, current_user: Option<U>, records: S, params: PresenterParams) -> Presenter<U>
    where
        S: RecordSet + 'static,
    {
        let definition = self.definition_for(records.model_name(), records.base_model_name());
        Presenter::new(records, Arc::clone(&self.authorizer))
            .with_definition(definition)
            .with_current_user(current_user)
            .with_params(params)
    }

    /// Build and resolve a presenter for a record set.
    pub fn present<S>(&self, current_user: Option<U>, records: S, params: PresenterParams) -> PresenterResult<Presenter<U>>
    where
        S: RecordSet + 'static,
    {
        self.presenter(current_user, records, params).present()
    }

    /// Build and resolve a presenter for a single record.
    pub fn present_record(
        &self,
        current_user: Option<U>,
        record: RecordRef,
        params: PresenterParams,
    ) -> PresenterResult<Presenter<U>> {
        self.present(current_user, RecordList::single(record), params)
    }
}

impl<U> fmt::Debug for PresenterRegistry<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenterRegistry")
            .field("presenters", &self.definitions.keys().collect::<Vec<_>>())
            .field("has_default", &self.application_default.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::association::{AssociationEntry, AssociationMap};
    use crate::fixtures::{self, Blog, Node, Reader};
    use smol_str::SmolStr;

    struct PostPresenter;

    impl PresenterDefinition<Reader> for PostPresenter {
        fn associations_map(&self) -> AssociationMap<Reader> {
            AssociationMap::new().with("users", AssociationEntry::new("creator"))
        }

        fn policy_methods(&self) -> Vec<SmolStr> {
            vec!["update".into()]
        }
    }

    struct ApplicationPresenter;

    impl PresenterDefinition<Reader> for ApplicationPresenter {
        fn policy_methods(&self) -> Vec<SmolStr> {
            vec!["index".into()]
        }
    }

    fn methods(definition: &SharedDefinition<Reader>) -> Vec<SmolStr> {
        definition.policy_methods()
    }

    #[test]
    fn test_lookup_chain() {
        let registry = PresenterRegistry::new(fixtures::authorizer()).with("Post", PostPresenter);

        assert_eq!(methods(&registry.definition_for(Some("Post"), Some("Post"))), ["update"]);
        assert_eq!(methods(&registry.definition_for(Some("FeaturedPost"), Some("Post"))), ["update"]);
        assert!(methods(&registry.definition_for(Some("Comment"), None)).is_empty());
        assert!(methods(&registry.definition_for(None, None)).is_empty());

        let registry = registry.with_default(ApplicationPresenter);
        assert_eq!(methods(&registry.definition_for(Some("Comment"), None)), ["index"]);
        assert_eq!(methods(&registry.definition_for(Some("Post"), None)), ["update"]);
    }

    #[test]
    fn test_present_selects_by_record_set_model() {
        let blog = Blog::new();
        let registry = PresenterRegistry::new(fixtures::authorizer()).with("Post", PostPresenter);

        let presenter = registry
            .present(
                Some(Reader::member()),
                blog.query(),
                PresenterParams::new().include("users").policies(true),
            )
            .unwrap();

        assert!(presenter.is_resolved());
        assert_eq!(presenter.included_collections()["users"].len(), 2);
        assert_eq!(presenter.policies().len(), 2);
    }

    #[test]
    fn test_present_record_falls_back_to_base_model() {
        let registry = PresenterRegistry::new(fixtures::authorizer()).with("Post", PostPresenter);
        let featured = Node::new("FeaturedPost", 4).base("Post").shared();

        let presenter = registry
            .present_record(Some(Reader::admin()), featured, PresenterParams::new().policies(true))
            .unwrap();

        assert_eq!(presenter.collection().len(), 1);
        assert_eq!(presenter.policies()[0].id_key(), "post_id");
        assert_eq!(presenter.policies()[0].get("update"), Some(true));
    }
}
